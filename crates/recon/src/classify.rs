use std::collections::BTreeSet;

use serde::Deserialize;

use crate::model::{IssueCounts, IssueStatus, ReconciledIssueRow, Reference};

/// Gaps strictly below this are reported as Close rather than Missed/Unique find/Mismatch.
pub const CLOSE_GAP: i64 = 3;

/// Presentation order of reconciled issue rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueOrder {
    /// Issue name ascending (byte order, case-sensitive).
    #[default]
    Name,
    /// Absolute gap descending, ties by name ascending.
    GapDescending,
}

/// `count_a - count_b`, saturating at the `i64` bounds.
pub fn signed_gap(count_a: u64, count_b: u64) -> i64 {
    let gap = i128::from(count_a) - i128::from(count_b);
    i64::try_from(gap).unwrap_or(if gap < 0 { i64::MIN } else { i64::MAX })
}

/// Classify one issue by its two counts. First matching rule wins:
///
/// 1. equal counts -> Perfect
/// 2. |gap| < 3 -> Close
/// 3. reference side > 0, other side == 0 -> Missed
/// 4. other side > 0, reference side == 0 -> Unique find
/// 5. otherwise -> Mismatch
///
/// With `Reference::Left`, rule 3 is `count_b == 0 && count_a > 0`.
pub fn classify(count_a: u64, count_b: u64, reference: Reference) -> IssueStatus {
    let diff = signed_gap(count_a, count_b);
    let (reference_count, other_count) = match reference {
        Reference::Left => (count_a, count_b),
        Reference::Right => (count_b, count_a),
    };

    if diff == 0 {
        IssueStatus::Perfect
    } else if diff.unsigned_abs() < CLOSE_GAP.unsigned_abs() {
        IssueStatus::Close
    } else if other_count == 0 && reference_count > 0 {
        IssueStatus::Missed
    } else if reference_count == 0 && other_count > 0 {
        IssueStatus::UniqueFind
    } else {
        IssueStatus::Mismatch
    }
}

/// Union of issue names from both sides, one row per name, sorted by name.
pub fn reconcile_issues(
    counts_a: &IssueCounts,
    counts_b: &IssueCounts,
    reference: Reference,
) -> Vec<ReconciledIssueRow> {
    let all_names: BTreeSet<&str> = counts_a.names().chain(counts_b.names()).collect();

    all_names
        .into_iter()
        .map(|name| {
            let count_a = counts_a.get(name);
            let count_b = counts_b.get(name);
            ReconciledIssueRow {
                name: name.to_string(),
                count_a,
                count_b,
                diff: signed_gap(count_a, count_b),
                status: classify(count_a, count_b, reference),
            }
        })
        .collect()
}

/// Reorder rows for presentation. Sorting is stable.
pub fn sort_rows(rows: &mut [ReconciledIssueRow], order: IssueOrder) {
    match order {
        IssueOrder::Name => rows.sort_by(|a, b| a.name.cmp(&b.name)),
        IssueOrder::GapDescending => rows.sort_by(|a, b| {
            b.diff
                .unsigned_abs()
                .cmp(&a.diff.unsigned_abs())
                .then_with(|| a.name.cmp(&b.name))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u64)]) -> IssueCounts {
        pairs.iter().map(|(n, c)| (*n, *c)).collect()
    }

    fn row<'a>(rows: &'a [ReconciledIssueRow], name: &str) -> &'a ReconciledIssueRow {
        rows.iter().find(|r| r.name == name).unwrap()
    }

    #[test]
    fn rule_order() {
        let r = Reference::Left;
        assert_eq!(classify(5, 5, r), IssueStatus::Perfect);
        assert_eq!(classify(0, 0, r), IssueStatus::Perfect);
        assert_eq!(classify(4, 6, r), IssueStatus::Close);
        assert_eq!(classify(2, 0, r), IssueStatus::Close);
        assert_eq!(classify(0, 2, r), IssueStatus::Close);
        assert_eq!(classify(3, 0, r), IssueStatus::Missed);
        assert_eq!(classify(0, 3, r), IssueStatus::UniqueFind);
        assert_eq!(classify(10, 7, r), IssueStatus::Mismatch);
        assert_eq!(classify(1, 9, r), IssueStatus::Mismatch);
    }

    #[test]
    fn right_reference_swaps_zero_rules() {
        let r = Reference::Right;
        assert_eq!(classify(0, 3, r), IssueStatus::Missed);
        assert_eq!(classify(3, 0, r), IssueStatus::UniqueFind);
        assert_eq!(classify(10, 7, r), IssueStatus::Mismatch);
        assert_eq!(classify(0, 2, r), IssueStatus::Close);
        assert_eq!(classify(6, 6, r), IssueStatus::Perfect);
    }

    #[test]
    fn classification_is_total_and_stable() {
        for a in 0..12u64 {
            for b in 0..12u64 {
                for r in [Reference::Left, Reference::Right] {
                    assert_eq!(classify(a, b, r), classify(a, b, r));
                }
            }
        }
    }

    #[test]
    fn union_and_zero_boundary() {
        let a = counts(&[("Missing Title", 5), ("Broken Link", 0)]);
        let b = counts(&[("Missing Title", 5), ("Thin Content", 2)]);
        let rows = reconcile_issues(&a, &b, Reference::Left);

        assert_eq!(rows.len(), 3);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Broken Link", "Missing Title", "Thin Content"]);

        assert_eq!(row(&rows, "Missing Title").status, IssueStatus::Perfect);

        let broken = row(&rows, "Broken Link");
        assert_eq!((broken.count_a, broken.count_b, broken.diff), (0, 0, 0));
        assert_eq!(broken.status, IssueStatus::Perfect);

        // gap of 2 is Close before any zero-side rule is considered
        let thin = row(&rows, "Thin Content");
        assert_eq!((thin.count_a, thin.count_b, thin.diff), (0, 2, -2));
        assert_eq!(thin.status, IssueStatus::Close);
    }

    #[test]
    fn mismatch_scenario() {
        let rows = reconcile_issues(
            &counts(&[("Thin Content", 10)]),
            &counts(&[("Thin Content", 7)]),
            Reference::Left,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].count_a, 10);
        assert_eq!(rows[0].count_b, 7);
        assert_eq!(rows[0].diff, 3);
        assert_eq!(rows[0].status, IssueStatus::Mismatch);
    }

    #[test]
    fn names_sorted_case_sensitive() {
        let rows = reconcile_issues(
            &counts(&[("b issue", 1), ("A issue", 1)]),
            &counts(&[("a issue", 1)]),
            Reference::Left,
        );
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A issue", "a issue", "b issue"]);
    }

    #[test]
    fn diff_is_exact() {
        let rows = reconcile_issues(&counts(&[("x", 0)]), &counts(&[("x", 1_000_000)]), Reference::Left);
        assert_eq!(rows[0].diff, -1_000_000);
    }

    #[test]
    fn gap_saturates_instead_of_wrapping() {
        assert_eq!(signed_gap(0, u64::MAX), i64::MIN);
        assert_eq!(signed_gap(u64::MAX, 0), i64::MAX);
        assert_eq!(classify(0, u64::MAX, Reference::Left), IssueStatus::UniqueFind);
        assert_eq!(classify(u64::MAX, u64::MAX - 1, Reference::Left), IssueStatus::Close);
    }

    #[test]
    fn gap_descending_order() {
        let mut rows = reconcile_issues(
            &counts(&[("a", 1), ("b", 10), ("c", 0)]),
            &counts(&[("a", 1), ("b", 4), ("c", 6)]),
            Reference::Left,
        );
        sort_rows(&mut rows, IssueOrder::GapDescending);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);

        sort_rows(&mut rows, IssueOrder::Name);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}

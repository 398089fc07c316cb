// Property-based tests for normalization, partitioning and issue classification.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::HashSet;

use crawlparity_recon::aggregate::aggregate_tags;
use crawlparity_recon::classify::{classify, reconcile_issues};
use crawlparity_recon::matcher::reconcile_records;
use crawlparity_recon::model::{CellValue, CrawledRecord, IssueCounts, IssueStatus, Reference};
use crawlparity_recon::normalize::{normalize_str, normalize_url};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// URL-shaped text: optional padding, mixed case, at most one trailing slash.
fn arb_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("http://"), Just("https://"), Just("HTTPS://"), Just("")],
        r"[A-Za-z0-9]{1,6}\.(com|org|IO)",
        r"(/[A-Za-z0-9_-]{1,5}){0,3}",
        prop::bool::ANY,
        prop_oneof![Just(""), Just(" "), Just("\t")],
    )
        .prop_map(|(scheme, host, path, slash, pad)| {
            format!("{pad}{scheme}{host}{path}{}{pad}", if slash { "/" } else { "" })
        })
}

fn arb_cell() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        6 => arb_url().prop_map(CellValue::Text),
        1 => Just(CellValue::Empty),
        1 => (0.0..1000.0f64).prop_map(CellValue::Number),
        1 => prop::bool::ANY.prop_map(CellValue::Bool),
    ]
}

fn arb_records(max: usize) -> impl Strategy<Value = Vec<CrawledRecord>> {
    proptest::collection::vec(arb_cell(), 0..=max)
        .prop_map(|cells| cells.into_iter().map(CrawledRecord::new).collect())
}

fn arb_counts() -> impl Strategy<Value = IssueCounts> {
    proptest::collection::vec((r"[A-Za-z ]{1,8}", 0u64..20), 0..8)
        .prop_map(|pairs| pairs.into_iter().collect())
}

fn identities(records: &[CrawledRecord]) -> HashSet<String> {
    records
        .iter()
        .map(|r| r.normalized_url.clone())
        .filter(|u| !u.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn normalize_is_idempotent(url in arb_url()) {
        let once = normalize_str(&url);
        prop_assert_eq!(normalize_str(&once), once);
    }

    #[test]
    fn normalize_non_text_is_empty(n in any::<f64>(), b in any::<bool>()) {
        prop_assert_eq!(normalize_url(&CellValue::Number(n)), "");
        prop_assert_eq!(normalize_url(&CellValue::Bool(b)), "");
        prop_assert_eq!(normalize_url(&CellValue::Empty), "");
    }

    #[test]
    fn partition_covers_union_and_is_disjoint(left in arb_records(12), right in arb_records(12)) {
        let out = reconcile_records(&left, &right);

        let matched: HashSet<String> = out.urls.matched.iter().cloned().collect();
        let left_only: HashSet<String> = out.urls.left_only.iter().cloned().collect();
        let right_only: HashSet<String> = out.urls.right_only.iter().cloned().collect();

        // no duplicates inside a partition
        prop_assert_eq!(matched.len(), out.urls.matched.len());
        prop_assert_eq!(left_only.len(), out.urls.left_only.len());
        prop_assert_eq!(right_only.len(), out.urls.right_only.len());

        prop_assert!(matched.is_disjoint(&left_only));
        prop_assert!(matched.is_disjoint(&right_only));
        prop_assert!(left_only.is_disjoint(&right_only));

        let left_ids = identities(&left);
        let right_ids = identities(&right);
        let union: HashSet<String> = left_ids.union(&right_ids).cloned().collect();
        let covered: HashSet<String> = matched.iter().chain(&left_only).chain(&right_only).cloned().collect();
        prop_assert_eq!(covered, union);

        let both: HashSet<String> = left_ids.intersection(&right_ids).cloned().collect();
        prop_assert_eq!(matched, both);

        prop_assert_eq!(out.left.rows, left.len());
        prop_assert_eq!(
            out.left.unique_urls + out.left.duplicates_dropped + out.left.unidentified,
            left.len()
        );
    }

    #[test]
    fn issue_rows_cover_both_sides(a in arb_counts(), b in arb_counts()) {
        let rows = reconcile_issues(&a, &b, Reference::Left);

        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(&names, &sorted);

        let expected: HashSet<&str> = a.names().chain(b.names()).collect();
        let got: HashSet<&str> = names.iter().copied().collect();
        prop_assert_eq!(got, expected);

        for r in &rows {
            prop_assert_eq!(r.count_a, a.get(&r.name));
            prop_assert_eq!(r.count_b, b.get(&r.name));
            prop_assert_eq!(r.diff, r.count_a as i64 - r.count_b as i64);
            prop_assert_eq!(r.status, classify(r.count_a, r.count_b, Reference::Left));
        }
    }

    #[test]
    fn perfect_iff_equal(a in 0u64..50, b in 0u64..50) {
        for reference in [Reference::Left, Reference::Right] {
            let status = classify(a, b, reference);
            prop_assert_eq!(status == IssueStatus::Perfect, a == b);
            if a != b && (a as i64 - b as i64).abs() < 3 {
                prop_assert_eq!(status, IssueStatus::Close);
            }
        }
    }

    #[test]
    fn reference_swap_mirrors_labels(a in 0u64..50, b in 0u64..50) {
        prop_assert_eq!(classify(a, b, Reference::Left), classify(b, a, Reference::Right));
    }

    #[test]
    fn tag_total_matches_pieces(rows in proptest::collection::vec(r"[A-C ;]{0,12}", 0..10)) {
        let counts = aggregate_tags(&rows);
        let pieces: u64 = rows
            .iter()
            .map(|r| r.split(';').filter(|p| !p.trim().is_empty()).count() as u64)
            .sum();
        prop_assert_eq!(counts.total(), pieces);
        for (name, _) in counts.iter() {
            prop_assert_eq!(name.trim(), name);
            prop_assert!(!name.is_empty());
        }
    }
}

use std::collections::BTreeMap;

use crate::model::{Field, IssueSummary, ReconciledIssueRow, RecordReconciliation, UrlSummary};

/// Per-label tallies plus total issue instances seen on each side.
pub fn summarize_issues(rows: &[ReconciledIssueRow]) -> IssueSummary {
    let mut status_counts = BTreeMap::new();
    let mut instances_a: u64 = 0;
    let mut instances_b: u64 = 0;

    for r in rows {
        *status_counts.entry(r.status).or_insert(0) += 1;
        instances_a = r.count_a.saturating_add(instances_a);
        instances_b = r.count_b.saturating_add(instances_b);
    }

    IssueSummary {
        total_names: rows.len(),
        instances_a,
        instances_b,
        status_counts,
    }
}

pub fn summarize_urls(result: &RecordReconciliation) -> UrlSummary {
    UrlSummary {
        matched: result.urls.matched.len(),
        left_only: result.urls.left_only.len(),
        right_only: result.urls.right_only.len(),
        status_mismatches: result.discrepancies_for(Field::StatusCode).count(),
        word_count_mismatches: result.discrepancies_for(Field::WordCount).count(),
    }
}

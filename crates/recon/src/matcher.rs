use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::model::{
    CellValue, CrawledRecord, Field, FieldDiscrepancy, MatchedPair, ReconciledUrlSet, RecordReconciliation,
    SideStats,
};

/// Word-count gaps above this many words are flagged. Exactly 100 is not.
pub const WORD_COUNT_THRESHOLD: u64 = 100;

/// Keep the first record per normalized URL, in input order.
///
/// Records without an identity (empty normalized URL) are dropped and counted separately.
pub fn dedup_first<'a>(records: &'a [CrawledRecord]) -> (Vec<&'a CrawledRecord>, SideStats) {
    let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());
    let mut kept = Vec::with_capacity(records.len());
    let mut stats = SideStats { rows: records.len(), ..SideStats::default() };

    for record in records {
        if record.normalized_url.is_empty() {
            stats.unidentified += 1;
            continue;
        }
        if !seen.insert(record.normalized_url.as_str()) {
            stats.duplicates_dropped += 1;
            continue;
        }
        kept.push(record);
    }

    stats.unique_urls = kept.len();
    (kept, stats)
}

/// Join two record sets by normalized URL and compare status code and word count on matches.
pub fn reconcile_records(left: &[CrawledRecord], right: &[CrawledRecord]) -> RecordReconciliation {
    let (left_kept, left_stats) = dedup_first(left);
    let (right_kept, right_stats) = dedup_first(right);

    if left_stats.duplicates_dropped > 0 || right_stats.duplicates_dropped > 0 {
        debug!(
            left = left_stats.duplicates_dropped,
            right = right_stats.duplicates_dropped,
            "dropped duplicate URLs (kept first occurrence)"
        );
    }

    let right_map: HashMap<&str, &CrawledRecord> = right_kept
        .iter()
        .map(|r| (r.normalized_url.as_str(), *r))
        .collect();

    let mut urls = ReconciledUrlSet::default();
    let mut pairs = Vec::new();
    let mut discrepancies = Vec::new();

    for left_rec in &left_kept {
        let key = left_rec.normalized_url.as_str();
        match right_map.get(key) {
            Some(right_rec) => {
                urls.matched.push(key.to_string());
                discrepancies.extend(compare_fields(key, left_rec, right_rec));
                pairs.push(MatchedPair {
                    url: key.to_string(),
                    left: (*left_rec).clone(),
                    right: (*right_rec).clone(),
                });
            }
            None => urls.left_only.push(key.to_string()),
        }
    }

    let left_keys: HashSet<&str> = left_kept.iter().map(|r| r.normalized_url.as_str()).collect();

    for right_rec in &right_kept {
        if !left_keys.contains(right_rec.normalized_url.as_str()) {
            urls.right_only.push(right_rec.normalized_url.clone());
        }
    }

    RecordReconciliation {
        urls,
        discrepancies,
        pairs,
        left: left_stats,
        right: right_stats,
    }
}

/// Absolute word-count gap. Saturated or hostile values never overflow.
pub fn word_gap(left: &CellValue, right: &CellValue) -> u64 {
    left.coerce_int().abs_diff(right.coerce_int())
}

/// Field-level discrepancies for one matched pair.
///
/// A field is compared only when both sides expose it.
pub fn compare_fields(url: &str, left: &CrawledRecord, right: &CrawledRecord) -> Vec<FieldDiscrepancy> {
    let mut out = Vec::new();

    if let (Some(a), Some(b)) = (&left.status_code, &right.status_code) {
        let a = a.coerce_text();
        let b = b.coerce_text();
        if a != b {
            out.push(FieldDiscrepancy {
                url: url.to_string(),
                field: Field::StatusCode,
                left: a,
                right: b,
                abs_diff: None,
            });
        }
    }

    if let (Some(a), Some(b)) = (&left.word_count, &right.word_count) {
        let gap = word_gap(a, b);
        if gap > WORD_COUNT_THRESHOLD {
            out.push(FieldDiscrepancy {
                url: url.to_string(),
                field: Field::WordCount,
                left: a.coerce_int().to_string(),
                right: b.coerce_int().to_string(),
                abs_diff: Some(gap),
            });
        }
    }

    out
}

use tracing::debug;

use crate::model::{CrawledRecord, IssueCounts, IssueTableRow};

/// Split one semicolon-joined tag cell into trimmed, non-empty tag names.
pub fn split_tags(cell: &str) -> Vec<String> {
    cell.split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Count tag occurrences across per-URL tag cells.
pub fn aggregate_tags<I, S>(rows: I) -> IssueCounts
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts = IssueCounts::new();
    for row in rows {
        for tag in split_tags(row.as_ref()) {
            counts.add(tag, 1);
        }
    }
    counts
}

/// Count the tags already split onto detailed records. Records without tags contribute nothing.
pub fn counts_from_records(records: &[CrawledRecord]) -> IssueCounts {
    let mut counts = IssueCounts::new();
    for tags in records.iter().filter_map(|r| r.issues.as_ref()) {
        for tag in tags {
            let tag = tag.trim();
            if !tag.is_empty() {
                counts.add(tag, 1);
            }
        }
    }
    counts
}

/// Build counts from a pre-aggregated (name, count) table.
///
/// Counts that are not numbers become 0; repeated names are summed.
pub fn aggregate_table(rows: &[IssueTableRow]) -> IssueCounts {
    let mut counts = IssueCounts::new();
    let mut coerced = 0usize;
    let mut skipped = 0usize;

    for row in rows {
        let name = row.name.coerce_text();
        if name.is_empty() {
            skipped += 1;
            continue;
        }
        if !row.count.is_numeric() {
            coerced += 1;
        }
        counts.add(name, row.count.coerce_count());
    }

    if coerced > 0 || skipped > 0 {
        debug!(coerced, skipped, "issue table rows needed coercion");
    }
    counts
}

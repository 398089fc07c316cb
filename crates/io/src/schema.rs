//! Column resolution: turns a loaded [`Table`] into crawl records or issue rows.
//!
//! Header lookup tries the explicit override first, then the canonical name, then
//! the reference crawler's export aliases (`Address`, `Title 1`, ...). All matching is
//! case-insensitive on trimmed headers.

use crawlparity_recon::aggregate::split_tags;
use crawlparity_recon::config::{ColumnOverrides, SourceConfig};
use crawlparity_recon::model::IssueTableRow;
use crawlparity_recon::{CellValue, CrawledRecord, ReconError};
use tracing::{debug, warn};

use crate::table::Table;

pub const URL_COLUMNS: &[&str] = &["URL", "Address"];
pub const STATUS_COLUMNS: &[&str] = &["Status Code"];
pub const TITLE_COLUMNS: &[&str] = &["Title", "Title 1"];
pub const META_COLUMNS: &[&str] = &["Meta Description", "Meta Description 1"];
pub const H1_COLUMNS: &[&str] = &["H1", "H1-1"];
pub const WORD_COUNT_COLUMNS: &[&str] = &["Word Count"];
pub const ISSUES_COLUMNS: &[&str] = &["Issues"];
pub const ISSUE_NAME_COLUMN: &str = "Issue Name";
pub const ISSUE_COUNT_COLUMN: &str = "URLs";

fn resolve(table: &Table, explicit: Option<&String>, defaults: &[&str]) -> Option<usize> {
    match explicit {
        Some(name) => table.column(name),
        None => table.first_column(defaults),
    }
}

/// Resolved column indexes for a per-URL crawl export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordColumns {
    pub url: usize,
    pub status_code: Option<usize>,
    pub title: Option<usize>,
    pub meta_description: Option<usize>,
    pub h1: Option<usize>,
    pub word_count: Option<usize>,
    pub issues: Option<usize>,
}

impl RecordColumns {
    pub fn resolve(table: &Table, overrides: &ColumnOverrides, source: &str) -> Result<Self, ReconError> {
        let url = resolve(table, overrides.url.as_ref(), URL_COLUMNS).ok_or_else(|| {
            ReconError::MissingColumn {
                source: source.into(),
                column: overrides.url.clone().unwrap_or_else(|| "URL".into()),
                available: table.headers.clone(),
            }
        })?;

        Ok(Self {
            url,
            status_code: resolve(table, overrides.status_code.as_ref(), STATUS_COLUMNS),
            title: resolve(table, overrides.title.as_ref(), TITLE_COLUMNS),
            meta_description: resolve(table, overrides.meta_description.as_ref(), META_COLUMNS),
            h1: resolve(table, overrides.h1.as_ref(), H1_COLUMNS),
            word_count: resolve(table, overrides.word_count.as_ref(), WORD_COUNT_COLUMNS),
            issues: resolve(table, overrides.issues.as_ref(), ISSUES_COLUMNS),
        })
    }
}

/// True when the table carries a per-row issue tag column.
pub fn has_issue_column(table: &Table, overrides: &ColumnOverrides) -> bool {
    resolve(table, overrides.issues.as_ref(), ISSUES_COLUMNS).is_some()
}

fn optional_text(table: &Table, row: usize, col: Option<usize>) -> Option<String> {
    col.map(|c| table.cell(row, c))
        .filter(|v| !v.is_empty())
        .map(CellValue::coerce_text)
}

/// One `CrawledRecord` per table row.
///
/// Columns the source lacks stay `None` on every record, so the reconciler can tell
/// "not exposed" from "blank".
pub fn records_from_table(table: &Table, config: &SourceConfig) -> Result<Vec<CrawledRecord>, ReconError> {
    let cols = RecordColumns::resolve(table, &config.columns, &config.name)?;
    debug!(source = %config.name, columns = ?cols, rows = table.len(), "resolved crawl columns");

    let records = (0..table.len())
        .map(|row| {
            let mut record = CrawledRecord::new(table.cell(row, cols.url).clone());
            if let Some(c) = cols.status_code {
                record = record.with_status(table.cell(row, c).clone());
            }
            if let Some(c) = cols.word_count {
                record = record.with_word_count(table.cell(row, c).clone());
            }
            if let Some(c) = cols.issues {
                let cell = table.cell(row, c);
                let tags = match cell {
                    CellValue::Text(s) => split_tags(s),
                    _ => Vec::new(),
                };
                record = record.with_issues(tags);
            }
            record.title = optional_text(table, row, cols.title);
            record.meta_description = optional_text(table, row, cols.meta_description);
            record.h1 = optional_text(table, row, cols.h1);
            record
        })
        .collect::<Vec<_>>();

    let unidentified = records.iter().filter(|r| r.normalized_url.is_empty()).count();
    if unidentified > 0 {
        warn!(source = %config.name, unidentified, "rows without a usable URL");
    }
    Ok(records)
}

/// Resolved (name, count) columns of a pre-aggregated issue table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueColumns {
    pub name: usize,
    pub count: usize,
}

impl IssueColumns {
    /// Name: `Issue Name`, else the first column. Count: `URLs`, else the first numeric column.
    pub fn resolve(table: &Table, overrides: &ColumnOverrides, source: &str) -> Result<Self, ReconError> {
        let missing = |column: &str| ReconError::MissingColumn {
            source: source.into(),
            column: column.into(),
            available: table.headers.clone(),
        };

        let name = match overrides.issue_name.as_ref() {
            Some(col) => table.column(col).ok_or_else(|| missing(col))?,
            None => table.column(ISSUE_NAME_COLUMN).unwrap_or(0),
        };
        if name >= table.headers.len() {
            return Err(missing(ISSUE_NAME_COLUMN));
        }

        let count = match overrides.issue_count.as_ref() {
            Some(col) => table.column(col).ok_or_else(|| missing(col))?,
            None => table
                .column(ISSUE_COUNT_COLUMN)
                .or_else(|| (0..table.headers.len()).find(|&c| c != name && table.is_numeric_column(c)))
                .ok_or_else(|| missing(ISSUE_COUNT_COLUMN))?,
        };

        Ok(Self { name, count })
    }
}

pub fn issue_rows_from_table(table: &Table, config: &SourceConfig) -> Result<Vec<IssueTableRow>, ReconError> {
    let cols = IssueColumns::resolve(table, &config.columns, &config.name)?;
    debug!(
        source = %config.name,
        name = %table.headers[cols.name],
        count = %table.headers[cols.count],
        "resolved issue table columns"
    );

    Ok((0..table.len())
        .map(|row| IssueTableRow {
            name: table.cell(row, cols.name).clone(),
            count: table.cell(row, cols.count).clone(),
        })
        .collect())
}

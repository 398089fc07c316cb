// Source loading: CSV and spreadsheet crawl exports into records and issue tables

pub mod csv;
pub mod schema;
pub mod table;
pub mod xlsx;

use std::path::Path;

use crawlparity_recon::aggregate::aggregate_table;
use crawlparity_recon::config::SourceConfig;
use crawlparity_recon::{CrawledRecord, IssueSource, ReconError};
use tracing::{info, warn};

pub use table::Table;

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Load a table from disk, choosing the reader by file extension.
pub fn load_table(path: &Path, sheet: Option<&str>, source: &str) -> Result<Table, ReconError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) {
        xlsx::load(path, sheet, source)
    } else {
        csv::load(path, source)
    }
}

/// Load one source's per-URL crawl export. Relative paths resolve against `base_dir`.
pub fn load_records(base_dir: &Path, config: &SourceConfig) -> Result<Vec<CrawledRecord>, ReconError> {
    let path = base_dir.join(&config.file);
    let table = load_table(&path, config.sheet.as_deref(), &config.name)?;
    let records = schema::records_from_table(&table, config)?;
    info!(source = %config.name, path = %path.display(), rows = records.len(), "loaded crawl export");
    Ok(records)
}

/// Load one source's issues: the pre-aggregated table when configured, otherwise the
/// per-row tags of its crawl export. An export without an issue column counts no issues.
///
/// Returns the issue source plus the crawl export's row count when that file was read.
pub fn load_issue_source(
    base_dir: &Path,
    config: &SourceConfig,
) -> Result<(IssueSource, Option<usize>), ReconError> {
    if let Some(ref issues_file) = config.issues_file {
        let path = base_dir.join(issues_file);
        let table = load_table(&path, config.issues_sheet.as_deref(), &config.name)?;
        let rows = schema::issue_rows_from_table(&table, config)?;
        info!(source = %config.name, path = %path.display(), issue_types = rows.len(), "loaded issue table");
        return Ok((IssueSource::Counts(aggregate_table(&rows)), None));
    }

    let path = base_dir.join(&config.file);
    let table = load_table(&path, config.sheet.as_deref(), &config.name)?;
    if !schema::has_issue_column(&table, &config.columns) {
        warn!(
            source = %config.name,
            column = config.columns.issues.as_deref().unwrap_or("Issues"),
            "no issue column, source reports no issues"
        );
    }
    let records = schema::records_from_table(&table, config)?;
    let rows = records.len();
    info!(source = %config.name, path = %path.display(), rows, "loaded per-URL issue tags");
    Ok((IssueSource::Records(records), Some(rows)))
}

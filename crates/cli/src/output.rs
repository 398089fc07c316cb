//! Report writer: persists rendered documents and companion tables, then echoes the
//! document to the console.

use std::io::{self, Write};
use std::path::Path;

use crawlparity_recon::classify::{sort_rows, IssueOrder};
use crawlparity_recon::config::ConsoleMode;
use crawlparity_recon::matcher;
use crawlparity_recon::model::{CrawledRecord, MatchedPair, ReconciledIssueRow};
use crawlparity_recon::report::ascii_safe;
use tracing::{info, warn};

use crate::exit_codes::EXIT_OUTPUT_WRITE;
use crate::CliError;

fn write_err(path: &Path, e: impl std::fmt::Display) -> CliError {
    CliError {
        code: EXIT_OUTPUT_WRITE,
        message: format!("cannot write {}: {e}", path.display()),
        hint: None,
    }
}

fn ensure_parent(path: &Path) -> Result<(), CliError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            std::fs::create_dir_all(dir).map_err(|e| write_err(path, e))
        }
        _ => Ok(()),
    }
}

/// Write the full UTF-8 document.
pub fn write_document(path: &Path, content: &str) -> Result<(), CliError> {
    ensure_parent(path)?;
    std::fs::write(path, content).map_err(|e| write_err(path, e))?;
    info!(path = %path.display(), bytes = content.len(), "wrote report");
    Ok(())
}

fn opt_text(value: Option<&crawlparity_recon::CellValue>) -> String {
    value.map(|v| v.coerce_text()).unwrap_or_default()
}

fn word_gap(left: &CrawledRecord, right: &CrawledRecord) -> String {
    match (&left.word_count, &right.word_count) {
        (Some(a), Some(b)) => matcher::word_gap(a, b).to_string(),
        _ => String::new(),
    }
}

/// Joined table of matched URL pairs.
pub fn write_url_table(
    path: &Path,
    pairs: &[MatchedPair],
    left_name: &str,
    right_name: &str,
) -> Result<(), CliError> {
    ensure_parent(path)?;
    let mut wtr = csv::Writer::from_path(path).map_err(|e| write_err(path, e))?;

    let mut header = vec!["Normalized URL".to_string()];
    for field in ["URL", "Status Code", "Title", "Meta Description", "Word Count"] {
        header.push(format!("{field} ({left_name})"));
        header.push(format!("{field} ({right_name})"));
    }
    header.push("Word Count Gap".to_string());
    wtr.write_record(&header).map_err(|e| write_err(path, e))?;

    for pair in pairs {
        let (l, r) = (&pair.left, &pair.right);
        let record = [
            pair.url.clone(),
            l.display_url(),
            r.display_url(),
            opt_text(l.status_code.as_ref()),
            opt_text(r.status_code.as_ref()),
            l.title.clone().unwrap_or_default(),
            r.title.clone().unwrap_or_default(),
            l.meta_description.clone().unwrap_or_default(),
            r.meta_description.clone().unwrap_or_default(),
            opt_text(l.word_count.as_ref()),
            opt_text(r.word_count.as_ref()),
            word_gap(l, r),
        ];
        wtr.write_record(&record).map_err(|e| write_err(path, e))?;
    }

    wtr.flush().map_err(|e| write_err(path, e))?;
    info!(path = %path.display(), rows = pairs.len(), "wrote url table");
    Ok(())
}

/// Issue rows as CSV, ordered by `order`.
pub fn write_issue_table(
    path: &Path,
    rows: &[ReconciledIssueRow],
    order: IssueOrder,
    left_name: &str,
    right_name: &str,
) -> Result<(), CliError> {
    let mut sorted = rows.to_vec();
    sort_rows(&mut sorted, order);

    ensure_parent(path)?;
    let mut wtr = csv::Writer::from_path(path).map_err(|e| write_err(path, e))?;
    wtr.write_record([
        "Issue Name".to_string(),
        format!("{left_name} Count"),
        format!("{right_name} Count"),
        "Difference".to_string(),
        "Status".to_string(),
    ])
    .map_err(|e| write_err(path, e))?;

    for row in &sorted {
        wtr.write_record([
            row.name.clone(),
            row.count_a.to_string(),
            row.count_b.to_string(),
            row.diff.to_string(),
            row.status.label().to_string(),
        ])
        .map_err(|e| write_err(path, e))?;
    }

    wtr.flush().map_err(|e| write_err(path, e))?;
    info!(path = %path.display(), rows = sorted.len(), "wrote issue table");
    Ok(())
}

/// One-line ASCII notice printed when the console rejects the document.
pub fn fallback_notice(doc_path: &Path) -> String {
    format!(
        "Report generated (Unicode characters suppressed in console). See {}",
        doc_path.display()
    )
}

/// Print `doc` to `out` according to `mode`.
///
/// A failed write of the document is not an error: the notice is printed instead,
/// and only a failure to print the notice itself is returned.
pub fn emit_to<W: Write>(out: &mut W, doc: &str, doc_path: &Path, mode: ConsoleMode) -> io::Result<()> {
    let text = match mode {
        ConsoleMode::Ascii => ascii_safe(doc),
        ConsoleMode::Auto | ConsoleMode::Unicode => doc.to_string(),
    };

    match out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
        Ok(()) => Ok(()),
        Err(e) => {
            warn!(error = %e, "console rejected report, printing notice instead");
            writeln!(out, "\n{}", fallback_notice(doc_path))?;
            out.flush()
        }
    }
}

/// [`emit_to`] on stdout. Console trouble never fails the run.
pub fn emit(doc: &str, doc_path: &Path, mode: ConsoleMode) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = emit_to(&mut handle, doc, doc_path, mode) {
        warn!(error = %e, "could not write to console");
    }
}

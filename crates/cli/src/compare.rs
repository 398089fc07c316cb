//! `crawlparity urls|issues|validate`: config-driven comparison of two crawls.

use std::path::{Path, PathBuf};

use crawlparity_io::{load_issue_source, load_records};
use crawlparity_recon::engine::{analysis_mode, report_context};
use crawlparity_recon::config::ConsoleMode;
use crawlparity_recon::report::{render_issue_report, render_url_summary, LabelStyle};
use crawlparity_recon::{run_issue_comparison, run_url_comparison, CompareConfig, ReconError};
use tracing::debug;

use crate::exit_codes::{recon_exit_code, EXIT_INVALID_CONFIG, EXIT_OUTPUT_WRITE};
use crate::output;
use crate::CliError;

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::MissingColumn { column, .. } => Some(format!(
                "map '{column}' to an existing header under [left.columns] or [right.columns]"
            )),
            ReconError::ConfigParse(_) => Some("check the TOML syntax near the reported line".into()),
            _ => None,
        };
        Self { code: recon_exit_code(&err), message: err.to_string(), hint }
    }
}

/// A validated config plus the directory its relative paths resolve against.
struct Loaded {
    config: CompareConfig,
    base_dir: PathBuf,
}

impl Loaded {
    fn path(&self, relative: &str) -> PathBuf {
        self.base_dir.join(relative)
    }
}

fn load_config(config_path: &Path) -> Result<Loaded, CliError> {
    let content = std::fs::read_to_string(config_path).map_err(|e| CliError {
        code: EXIT_INVALID_CONFIG,
        message: format!("cannot read config {}: {e}", config_path.display()),
        hint: Some("pass --config <path> or set CRAWLPARITY_CONFIG".into()),
    })?;
    let config = CompareConfig::from_toml(&content)?;

    let base_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    debug!(config = %config_path.display(), base_dir = %base_dir.display(), "loaded config");

    Ok(Loaded { config, base_dir })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CliError {
        code: EXIT_OUTPUT_WRITE,
        message: format!("JSON serialization error: {e}"),
        hint: None,
    })?;
    println!("{json}");
    Ok(())
}

pub fn cmd_urls(config_path: &Path, json: bool) -> Result<(), CliError> {
    let loaded = load_config(config_path)?;
    let config = &loaded.config;

    // Both sides load before anything is written
    let left = load_records(&loaded.base_dir, &config.left)?;
    let right = load_records(&loaded.base_dir, &config.right)?;

    let comparison = run_url_comparison(config, &left, &right);
    let ctx = report_context(config, Some(left.len()));
    let doc = render_url_summary(&comparison.result, &ctx);

    let doc_path = loaded.path(&config.output.url_report);
    output::write_document(&doc_path, &doc)?;
    output::write_url_table(
        &loaded.path(&config.output.url_table),
        &comparison.result.pairs,
        &config.left.name,
        &config.right.name,
    )?;

    if json {
        print_json(&comparison)
    } else {
        output::emit(&doc, &doc_path, config.output.console);
        Ok(())
    }
}

pub fn cmd_issues(config_path: &Path, json: bool) -> Result<(), CliError> {
    let loaded = load_config(config_path)?;
    let config = &loaded.config;

    let (left, pages_crawled) = load_issue_source(&loaded.base_dir, &config.left)?;
    let (right, _) = load_issue_source(&loaded.base_dir, &config.right)?;

    let comparison = run_issue_comparison(config, &left, &right);
    let mut ctx = report_context(config, pages_crawled);
    ctx.analysis_mode = Some(analysis_mode(&left, &right));
    let doc = render_issue_report(&comparison.rows, &ctx);

    let doc_path = loaded.path(&config.output.issue_report);
    output::write_document(&doc_path, &doc)?;
    output::write_issue_table(
        &loaded.path(&config.output.issue_table),
        &comparison.rows,
        config.issue_order,
        &config.left.name,
        &config.right.name,
    )?;

    if json {
        return print_json(&comparison);
    }

    // An ASCII console gets plain labels instead of emoji with the glyph stripped
    let console_doc = if config.output.console == ConsoleMode::Ascii && ctx.style != LabelStyle::Plain {
        let mut plain = ctx.clone();
        plain.style = LabelStyle::Plain;
        render_issue_report(&comparison.rows, &plain)
    } else {
        doc
    };
    output::emit(&console_doc, &doc_path, config.output.console);
    Ok(())
}

pub fn cmd_validate(config_path: &Path) -> Result<(), CliError> {
    let loaded = load_config(config_path)?;
    let config = &loaded.config;
    println!(
        "config ok: {} ({} vs {}, reference: {})",
        config.name,
        config.left.name,
        config.right.name,
        config.reference_name()
    );
    Ok(())
}

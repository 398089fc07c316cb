use serde::Deserialize;

use crate::classify::IssueOrder;
use crate::error::ReconError;
use crate::model::Reference;
use crate::report::LabelStyle;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CompareConfig {
    pub name: String,
    /// Crawled site, shown in the report header.
    #[serde(default)]
    pub target: Option<String>,
    /// Source A.
    pub left: SourceConfig,
    /// Source B.
    pub right: SourceConfig,
    #[serde(default)]
    pub reference: Reference,
    #[serde(default)]
    pub labels: LabelStyle,
    #[serde(default)]
    pub issue_order: IssueOrder,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Display name used in reports and error messages.
    pub name: String,
    /// Per-URL crawl export (CSV or spreadsheet).
    pub file: String,
    /// Sheet to read from a spreadsheet `file`. Defaults to the first sheet.
    #[serde(default)]
    pub sheet: Option<String>,
    /// Pre-aggregated issue table (name, count). When set, issue counts come from here.
    #[serde(default)]
    pub issues_file: Option<String>,
    #[serde(default)]
    pub issues_sheet: Option<String>,
    #[serde(default)]
    pub columns: ColumnOverrides,
}

/// Explicit header names. Unset entries fall back to well-known names and aliases.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColumnOverrides {
    pub url: Option<String>,
    pub status_code: Option<String>,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub h1: Option<String>,
    pub word_count: Option<String>,
    pub issues: Option<String>,
    pub issue_name: Option<String>,
    pub issue_count: Option<String>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleMode {
    /// Print as-is, fall back to a plain notice when the console rejects it.
    #[default]
    Auto,
    Unicode,
    /// Strip anything outside printable ASCII before printing.
    Ascii,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_url_report")]
    pub url_report: String,
    #[serde(default = "default_url_table")]
    pub url_table: String,
    #[serde(default = "default_issue_report")]
    pub issue_report: String,
    #[serde(default = "default_issue_table")]
    pub issue_table: String,
    #[serde(default)]
    pub console: ConsoleMode,
}

fn default_url_report() -> String {
    "URL_COMPARISON.txt".into()
}

fn default_url_table() -> String {
    "comparison_report.csv".into()
}

fn default_issue_report() -> String {
    "COMPARISON_REPORT.md".into()
}

fn default_issue_table() -> String {
    "comparison_results.csv".into()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            url_report: default_url_report(),
            url_table: default_url_table(),
            issue_report: default_issue_report(),
            issue_table: default_issue_table(),
            console: ConsoleMode::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading + validation
// ---------------------------------------------------------------------------

impl CompareConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: CompareConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        for (side, source) in [("left", &self.left), ("right", &self.right)] {
            if source.name.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!("{side}: name must not be empty")));
            }
            if source.file.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "{side} ('{}'): file must not be empty",
                    source.name
                )));
            }
            if matches!(&source.issues_file, Some(f) if f.trim().is_empty()) {
                return Err(ReconError::ConfigValidation(format!(
                    "{side} ('{}'): issues_file must not be empty when set",
                    source.name
                )));
            }
        }

        if self.left.name == self.right.name {
            return Err(ReconError::ConfigValidation(format!(
                "left and right sources share the name '{}'",
                self.left.name
            )));
        }

        let out = &self.output;
        for (key, path) in [
            ("url_report", &out.url_report),
            ("url_table", &out.url_table),
            ("issue_report", &out.issue_report),
            ("issue_table", &out.issue_table),
        ] {
            if path.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!("output.{key} must not be empty")));
            }
        }

        Ok(())
    }

    /// Name of the authoritative source.
    pub fn reference_name(&self) -> &str {
        match self.reference {
            Reference::Left => &self.left.name,
            Reference::Right => &self.right.name,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

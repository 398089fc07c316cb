use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::normalize::normalize_url;

// ---------------------------------------------------------------------------
// Raw values
// ---------------------------------------------------------------------------

/// A raw cell as handed over by a loader, before any coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Build from a CSV field: blank fields become `Empty`, everything else `Text`.
    pub fn from_field(s: &str) -> Self {
        if s.trim().is_empty() {
            Self::Empty
        } else {
            Self::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text form of the value, the way a status code is compared.
    ///
    /// Whole numbers drop their fractional part (`200.0` -> `"200"`), blanks are `""`.
    pub fn coerce_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) => format_number(*n),
            Self::Bool(b) => b.to_string(),
        }
    }

    /// Integer form of the value. Anything that is not a finite number coerces to 0.
    pub fn coerce_int(&self) -> i64 {
        match self {
            Self::Number(n) if n.is_finite() => n.trunc() as i64,
            Self::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|n| n.is_finite()).map(|n| n.trunc() as i64))
                    .unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// Non-negative count form. Negative or non-numeric values are 0.
    pub fn coerce_count(&self) -> u64 {
        self.coerce_int().max(0) as u64
    }

    /// True when the value parses as a number (used by loaders sniffing count columns).
    pub fn is_numeric(&self) -> bool {
        match self {
            Self::Number(n) => n.is_finite(),
            Self::Text(s) => s.trim().parse::<f64>().map(|n| n.is_finite()).unwrap_or(false),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coerce_text())
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ---------------------------------------------------------------------------
// Input records
// ---------------------------------------------------------------------------

/// One crawled URL row from one source.
///
/// `status_code` and `word_count` are `None` when the source has no such column at all,
/// and `Some(CellValue::Empty)` when the column exists but the cell is blank.
#[derive(Debug, Clone, Serialize)]
pub struct CrawledRecord {
    pub raw_url: CellValue,
    pub normalized_url: String,
    pub status_code: Option<CellValue>,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub h1: Option<String>,
    pub word_count: Option<CellValue>,
    pub issues: Option<Vec<String>>,
}

impl CrawledRecord {
    /// New record with only a URL; the normalized URL is derived here and never changes.
    pub fn new(raw_url: CellValue) -> Self {
        let normalized_url = normalize_url(&raw_url);
        Self {
            raw_url,
            normalized_url,
            status_code: None,
            title: None,
            meta_description: None,
            h1: None,
            word_count: None,
            issues: None,
        }
    }

    pub fn with_status(mut self, status: CellValue) -> Self {
        self.status_code = Some(status);
        self
    }

    pub fn with_word_count(mut self, words: CellValue) -> Self {
        self.word_count = Some(words);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_meta_description(mut self, meta: impl Into<String>) -> Self {
        self.meta_description = Some(meta.into());
        self
    }

    pub fn with_h1(mut self, h1: impl Into<String>) -> Self {
        self.h1 = Some(h1.into());
        self
    }

    pub fn with_issues(mut self, issues: Vec<String>) -> Self {
        self.issues = Some(issues);
        self
    }

    /// The raw URL as text, for display in reports.
    pub fn display_url(&self) -> String {
        self.raw_url.coerce_text()
    }
}

/// One row of a pre-aggregated issue table: a name and its (uncoerced) count.
#[derive(Debug, Clone)]
pub struct IssueTableRow {
    pub name: CellValue,
    pub count: CellValue,
}

impl IssueTableRow {
    pub fn new(name: impl Into<String>, count: CellValue) -> Self {
        Self { name: CellValue::Text(name.into()), count }
    }
}

// ---------------------------------------------------------------------------
// Issue counts
// ---------------------------------------------------------------------------

/// Issue name -> occurrence count for one source. Keys are unique, counts never negative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IssueCounts(BTreeMap<String, u64>);

impl IssueCounts {
    /// Largest stored count, so that any two counts have a representable signed gap.
    pub const MAX: u64 = i64::MAX as u64;

    pub fn new() -> Self {
        Self::default()
    }

    /// Add to `name`'s count. Counts saturate at [`IssueCounts::MAX`].
    pub fn add(&mut self, name: impl Into<String>, count: u64) {
        let slot = self.0.entry(name.into()).or_insert(0);
        *slot = slot.saturating_add(count).min(Self::MAX);
    }

    /// Count for `name`, 0 when absent.
    pub fn get(&self, name: &str) -> u64 {
        self.0.get(name).copied().unwrap_or(0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.0.values().fold(0u64, |acc, &c| acc.saturating_add(c))
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for IssueCounts {
    fn from_iter<T: IntoIterator<Item = (S, u64)>>(iter: T) -> Self {
        let mut counts = IssueCounts::new();
        for (name, count) in iter {
            counts.add(name, count);
        }
        counts
    }
}

// ---------------------------------------------------------------------------
// URL reconciliation
// ---------------------------------------------------------------------------

/// Three-way partition of normalized URLs. The partitions are pairwise disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciledUrlSet {
    pub matched: Vec<String>,
    pub left_only: Vec<String>,
    pub right_only: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    StatusCode,
    WordCount,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StatusCode => write!(f, "status_code"),
            Self::WordCount => write!(f, "word_count"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDiscrepancy {
    pub url: String,
    pub field: Field,
    pub left: String,
    pub right: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abs_diff: Option<u64>,
}

/// The first-encountered record from each side for one matched URL.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedPair {
    pub url: String,
    pub left: CrawledRecord,
    pub right: CrawledRecord,
}

/// Per-source bookkeeping from deduplication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SideStats {
    pub rows: usize,
    pub unique_urls: usize,
    pub duplicates_dropped: usize,
    pub unidentified: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordReconciliation {
    pub urls: ReconciledUrlSet,
    pub discrepancies: Vec<FieldDiscrepancy>,
    pub pairs: Vec<MatchedPair>,
    pub left: SideStats,
    pub right: SideStats,
}

impl RecordReconciliation {
    pub fn discrepancies_for(&self, field: Field) -> impl Iterator<Item = &FieldDiscrepancy> {
        self.discrepancies.iter().filter(move |d| d.field == field)
    }
}

// ---------------------------------------------------------------------------
// Issue reconciliation
// ---------------------------------------------------------------------------

/// Which source is authoritative when deciding Missed vs Unique find.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reference {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Perfect,
    Close,
    Missed,
    UniqueFind,
    Mismatch,
}

impl IssueStatus {
    pub const ALL: [IssueStatus; 5] = [
        Self::Perfect,
        Self::Close,
        Self::Missed,
        Self::UniqueFind,
        Self::Mismatch,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Perfect => "Perfect",
            Self::Close => "Close",
            Self::Missed => "Missed",
            Self::UniqueFind => "Unique find",
            Self::Mismatch => "Mismatch",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Perfect => "✅",
            Self::Close => "🟢",
            Self::Missed => "🔴",
            Self::UniqueFind => "🔵",
            Self::Mismatch => "⚠️",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciledIssueRow {
    pub name: String,
    pub count_a: u64,
    pub count_b: u64,
    /// Always `count_a - count_b`.
    pub diff: i64,
    pub status: IssueStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssueSummary {
    pub total_names: usize,
    pub instances_a: u64,
    pub instances_b: u64,
    pub status_counts: BTreeMap<IssueStatus, usize>,
}

impl IssueSummary {
    pub fn count(&self, status: IssueStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UrlSummary {
    pub matched: usize,
    pub left_only: usize,
    pub right_only: usize,
    pub status_mismatches: usize,
    pub word_count_mismatches: usize,
}

// ---------------------------------------------------------------------------
// Run output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Urls,
    Issues,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub config_name: String,
    pub mode: Mode,
    pub left: String,
    pub right: String,
    pub reference: Reference,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UrlComparison {
    pub meta: RunMeta,
    pub summary: UrlSummary,
    pub result: RecordReconciliation,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueComparison {
    pub meta: RunMeta,
    pub summary: IssueSummary,
    pub counts_a: IssueCounts,
    pub counts_b: IssueCounts,
    pub rows: Vec<ReconciledIssueRow>,
}

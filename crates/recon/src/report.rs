//! Text rendering of reconciliation results. Formatting only; nothing here decides a label.

use std::fmt::Write as _;

use serde::Deserialize;

use crate::classify::CLOSE_GAP;
use crate::matcher::WORD_COUNT_THRESHOLD;
use crate::model::{Field, IssueStatus, ReconciledIssueRow, RecordReconciliation, Reference};

/// Maximum example URLs listed per partition or discrepancy kind.
pub const MAX_EXAMPLES: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStyle {
    #[default]
    Plain,
    Emoji,
}

/// Names and labels a rendered document uses.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub title: String,
    pub left_name: String,
    pub right_name: String,
    pub reference: Reference,
    pub target: Option<String>,
    /// Rows in source A's crawl export, when it was loaded.
    pub pages_crawled: Option<usize>,
    pub analysis_mode: Option<String>,
    pub style: LabelStyle,
}

impl ReportContext {
    pub fn new(left_name: impl Into<String>, right_name: impl Into<String>) -> Self {
        let left_name = left_name.into();
        let right_name = right_name.into();
        Self {
            title: format!("{left_name} vs {right_name}: Issue Gap Analysis"),
            left_name,
            right_name,
            reference: Reference::default(),
            target: None,
            pages_crawled: None,
            analysis_mode: None,
            style: LabelStyle::default(),
        }
    }

    fn reference_and_other(&self) -> (&str, &str) {
        match self.reference {
            Reference::Left => (&self.left_name, &self.right_name),
            Reference::Right => (&self.right_name, &self.left_name),
        }
    }

    pub fn status_label(&self, status: IssueStatus) -> String {
        match self.style {
            LabelStyle::Plain => status.label().to_string(),
            LabelStyle::Emoji => format!("{} {}", status.emoji(), status.label()),
        }
    }
}

/// `+3`, `-2`, `0`.
pub fn format_gap(diff: i64) -> String {
    if diff == 0 {
        "0".to_string()
    } else {
        format!("{diff:+}")
    }
}

// ---------------------------------------------------------------------------
// Issue document
// ---------------------------------------------------------------------------

/// Markdown document: header, discrepancy matrix, legend.
pub fn render_issue_report(rows: &[ReconciledIssueRow], ctx: &ReportContext) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# {}", ctx.title);
    out.push('\n');
    if let Some(ref target) = ctx.target {
        let _ = writeln!(out, "**Target:** {target}");
    }
    if let Some(pages) = ctx.pages_crawled {
        let _ = writeln!(out, "**{} Pages Crawled:** {pages}", ctx.left_name);
    }
    if let Some(ref mode) = ctx.analysis_mode {
        let _ = writeln!(out, "**Analysis Mode:** {mode}");
    }

    out.push_str("\n## Discrepancy Matrix\n\n");
    let _ = writeln!(
        out,
        "| Issue Name | {} Count | {} Count | Gap | Status |",
        ctx.left_name, ctx.right_name
    );
    out.push_str("|---|---|---|---|---|\n");

    for r in rows {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            escape_cell(&r.name),
            r.count_a,
            r.count_b,
            format_gap(r.diff),
            ctx.status_label(r.status),
        );
    }
    if rows.is_empty() {
        out.push_str("| (no issues reported by either source) | 0 | 0 | 0 | - |\n");
    }

    out.push_str("\n## Legend\n\n");
    out.push_str(&render_legend(ctx));
    out
}

/// Legend lines explaining each label in terms of the configured sources.
pub fn render_legend(ctx: &ReportContext) -> String {
    let (reference, other) = ctx.reference_and_other();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "- **{}:** Issues {reference} found but {other} missed.",
        ctx.status_label(IssueStatus::Missed)
    );
    let _ = writeln!(
        out,
        "- **{}:** Issues {other} found but {reference} didn't report (or named differently).",
        ctx.status_label(IssueStatus::UniqueFind)
    );
    let _ = writeln!(
        out,
        "- **{}:** Counts differ by fewer than {CLOSE_GAP}.",
        ctx.status_label(IssueStatus::Close)
    );
    let _ = writeln!(
        out,
        "- **{}:** Both sources report the issue with a gap of {CLOSE_GAP} or more.",
        ctx.status_label(IssueStatus::Mismatch)
    );
    let _ = writeln!(
        out,
        "- **{}:** Counts matched exactly.",
        ctx.status_label(IssueStatus::Perfect)
    );
    out.push_str(
        "\nIssue names are matched exactly (no synonym or case folding). The same finding \
         reported under different names by each tool shows up as a Missed / Unique find pair.\n",
    );
    out
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

// ---------------------------------------------------------------------------
// URL summary
// ---------------------------------------------------------------------------

/// Plain-text summary of a URL-set reconciliation.
pub fn render_url_summary(result: &RecordReconciliation, ctx: &ReportContext) -> String {
    let left = &ctx.left_name;
    let right = &ctx.right_name;
    let urls = &result.urls;
    let mut out = String::new();

    out.push_str("--- URL Comparison ---\n");
    let _ = writeln!(out, "Total Unique URLs in {left}: {}", result.left.unique_urls);
    let _ = writeln!(out, "Total Unique URLs in {right}: {}", result.right.unique_urls);
    let _ = writeln!(out, "URLs in both: {}", urls.matched.len());
    let _ = writeln!(out, "URLs only in {left}: {}", urls.left_only.len());
    let _ = writeln!(out, "URLs only in {right}: {}", urls.right_only.len());

    for (name, side, stats) in [(left, &urls.left_only, &result.left), (right, &urls.right_only, &result.right)] {
        if stats.duplicates_dropped > 0 {
            let _ = writeln!(out, "Duplicate URLs dropped from {name}: {}", stats.duplicates_dropped);
        }
        if stats.unidentified > 0 {
            let _ = writeln!(out, "Rows without a usable URL in {name}: {}", stats.unidentified);
        }
        if !side.is_empty() {
            let _ = writeln!(out, "\nExamples in {name} only:");
            for u in side.iter().take(MAX_EXAMPLES) {
                let _ = writeln!(out, " - {u}");
            }
            out.push('\n');
        }
    }

    let _ = writeln!(out, "\n--- Data Discrepancies (Common URLs: {}) ---", urls.matched.len());

    let status: Vec<_> = result.discrepancies_for(Field::StatusCode).collect();
    let _ = writeln!(out, "Status Code Mismatches: {}", status.len());
    for d in status.iter().take(MAX_EXAMPLES) {
        let _ = writeln!(out, " - {}: {left}={} {right}={}", d.url, d.left, d.right);
    }

    let words: Vec<_> = result.discrepancies_for(Field::WordCount).collect();
    let _ = writeln!(
        out,
        "Significant Word Count Differences (> {WORD_COUNT_THRESHOLD} words): {}",
        words.len()
    );
    for d in words.iter().take(MAX_EXAMPLES) {
        let _ = writeln!(
            out,
            " - {}: {left}={} {right}={} (gap {})",
            d.url,
            d.left,
            d.right,
            d.abs_diff.unwrap_or(0)
        );
    }

    out
}

// ---------------------------------------------------------------------------
// Console safety
// ---------------------------------------------------------------------------

/// Drop everything outside printable ASCII, keeping newlines and tabs.
///
/// Surrounding text is left alone. Render with [`LabelStyle::Plain`] first when the
/// status labels should not carry an emoji prefix.
pub fn ascii_safe(text: &str) -> String {
    text.chars()
        .filter(|&ch| ch == '\n' || ch == '\t' || (' '..='~').contains(&ch))
        .collect()
}

use tracing::info;

use crate::aggregate::counts_from_records;
use crate::classify::reconcile_issues;
use crate::config::CompareConfig;
use crate::evidence::{summarize_issues, summarize_urls};
use crate::matcher::reconcile_records;
use crate::model::{
    CrawledRecord, IssueComparison, IssueCounts, Mode, RunMeta, UrlComparison,
};
use crate::report::ReportContext;

/// Issue counts for one side, already aggregated from whichever shape the source provides.
#[derive(Debug, Clone)]
pub enum IssueSource {
    /// Tags carried on per-URL records.
    Records(Vec<CrawledRecord>),
    /// Counts built from a pre-aggregated table.
    Counts(IssueCounts),
}

impl IssueSource {
    pub fn counts(&self) -> IssueCounts {
        match self {
            Self::Records(records) => counts_from_records(records),
            Self::Counts(counts) => counts.clone(),
        }
    }

    pub fn is_pre_aggregated(&self) -> bool {
        matches!(self, Self::Counts(_))
    }
}

fn meta(config: &CompareConfig, mode: Mode) -> RunMeta {
    RunMeta {
        config_name: config.name.clone(),
        mode,
        left: config.left.name.clone(),
        right: config.right.name.clone(),
        reference: config.reference,
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        run_at: chrono::Utc::now().to_rfc3339(),
    }
}

/// URL-set reconciliation of two loaded record sets.
pub fn run_url_comparison(
    config: &CompareConfig,
    left: &[CrawledRecord],
    right: &[CrawledRecord],
) -> UrlComparison {
    let result = reconcile_records(left, right);
    let summary = summarize_urls(&result);

    info!(
        matched = summary.matched,
        left_only = summary.left_only,
        right_only = summary.right_only,
        status_mismatches = summary.status_mismatches,
        word_count_mismatches = summary.word_count_mismatches,
        "url reconciliation complete"
    );

    UrlComparison { meta: meta(config, Mode::Urls), summary, result }
}

/// Issue-count reconciliation of two sources.
pub fn run_issue_comparison(
    config: &CompareConfig,
    left: &IssueSource,
    right: &IssueSource,
) -> IssueComparison {
    let counts_a = left.counts();
    let counts_b = right.counts();
    let rows = reconcile_issues(&counts_a, &counts_b, config.reference);
    let summary = summarize_issues(&rows);

    info!(
        names = summary.total_names,
        instances_a = summary.instances_a,
        instances_b = summary.instances_b,
        "issue reconciliation complete"
    );

    IssueComparison {
        meta: meta(config, Mode::Issues),
        summary,
        counts_a,
        counts_b,
        rows,
    }
}

/// Rendering context for a config. `pages_crawled` is source A's record count when known.
pub fn report_context(config: &CompareConfig, pages_crawled: Option<usize>) -> ReportContext {
    let mut ctx = ReportContext::new(config.left.name.clone(), config.right.name.clone());
    ctx.reference = config.reference;
    ctx.target = config.target.clone();
    ctx.pages_crawled = pages_crawled;
    ctx.style = config.labels;
    ctx
}

/// Analysis-mode line for the issue report header.
pub fn analysis_mode(left: &IssueSource, right: &IssueSource) -> String {
    if left.is_pre_aggregated() || right.is_pre_aggregated() {
        "Issue Summary Comparison (pre-aggregated table)".to_string()
    } else {
        "Per-URL tag comparison".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::split_tags;
    use crate::model::{CellValue, IssueStatus, Reference};

    const CONFIG: &str = r#"
name = "engine test"

[left]
name = "CrawlLogic"
file = "cl.csv"

[right]
name = "Screaming Frog"
file = "sf.xlsx"
"#;

    fn rec(url: &str, tags: &str) -> CrawledRecord {
        CrawledRecord::new(CellValue::Text(url.into())).with_issues(split_tags(tags))
    }

    #[test]
    fn issues_from_records_and_table() {
        let config = CompareConfig::from_toml(CONFIG).unwrap();
        let left = IssueSource::Records(vec![
            rec("https://a.com", "Thin Content; Missing H1"),
            rec("https://a.com/b", "Thin Content"),
        ]);
        let right = IssueSource::Counts(
            [("Thin Content", 2u64), ("Missing Meta Description", 9)].into_iter().collect(),
        );

        let out = run_issue_comparison(&config, &left, &right);
        assert_eq!(out.meta.mode, Mode::Issues);
        assert_eq!(out.meta.reference, Reference::Left);
        assert_eq!(out.rows.len(), 3);
        assert_eq!(out.summary.count(IssueStatus::Perfect), 1);
        assert_eq!(out.summary.count(IssueStatus::Close), 1);
        assert_eq!(out.summary.count(IssueStatus::UniqueFind), 1);
        assert_eq!(analysis_mode(&left, &right), "Issue Summary Comparison (pre-aggregated table)");
    }

    #[test]
    fn url_comparison_summary() {
        let config = CompareConfig::from_toml(CONFIG).unwrap();
        let left = vec![rec("https://a.com/", ""), rec("https://a.com/x", "")];
        let right = vec![rec("https://a.com", "")];
        let out = run_url_comparison(&config, &left, &right);
        assert_eq!(out.summary.matched, 1);
        assert_eq!(out.summary.left_only, 1);
        assert_eq!(out.summary.right_only, 0);

        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["meta"]["mode"], "urls");
        assert_eq!(json["result"]["urls"]["left_only"][0], "https://a.com/x");
    }

    #[test]
    fn context_from_config() {
        let config = CompareConfig::from_toml(CONFIG).unwrap();
        let ctx = report_context(&config, Some(12));
        assert_eq!(ctx.left_name, "CrawlLogic");
        assert_eq!(ctx.right_name, "Screaming Frog");
        assert_eq!(ctx.pages_crawled, Some(12));
        assert!(ctx.target.is_none());
    }
}

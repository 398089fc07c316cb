// Load the fixture exports from disk and run both reconciliations over them.

use std::path::PathBuf;

use crawlparity_io::{load_issue_source, load_records};
use crawlparity_recon::model::Field;
use crawlparity_recon::{run_issue_comparison, run_url_comparison, CompareConfig, IssueStatus};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn config() -> CompareConfig {
    CompareConfig::from_toml(
        r#"
name = "shop.example audit"

[left]
name = "CrawlLogic"
file = "crawllogic.csv"

[right]
name = "Screaming Frog"
file = "screaming_frog.csv"
issues_file = "issues_overview.csv"
"#,
    )
    .unwrap()
}

#[test]
fn url_reconciliation_from_fixtures() {
    let config = config();
    let left = load_records(&fixtures(), &config.left).unwrap();
    let right = load_records(&fixtures(), &config.right).unwrap();
    assert_eq!(left.len(), 5);
    assert_eq!(right.len(), 4);

    // reference crawler aliases resolved
    assert_eq!(right[0].meta_description.as_deref(), Some("Buy things"));
    assert_eq!(right[0].h1.as_deref(), Some("Welcome"));
    // semicolon-delimited file with a quoted tag cell
    assert_eq!(left[1].issues.as_ref().map(Vec::len), Some(2));

    let cmp = run_url_comparison(&config, &left, &right);
    let r = &cmp.result;
    assert_eq!(
        r.urls.matched,
        vec!["https://shop.example", "https://shop.example/cart", "https://shop.example/sale"]
    );
    assert!(r.urls.left_only.is_empty());
    assert_eq!(r.urls.right_only, vec!["https://shop.example/contact"]);
    assert_eq!(r.left.duplicates_dropped, 1);
    assert_eq!(r.left.unidentified, 1);
    assert_eq!(r.left.unique_urls, 3);

    let status: Vec<_> = r.discrepancies_for(Field::StatusCode).collect();
    assert_eq!(status.len(), 1);
    assert_eq!((status[0].left.as_str(), status[0].right.as_str()), ("500", "200"));

    let words: Vec<_> = r.discrepancies_for(Field::WordCount).map(|d| d.abs_diff).collect();
    assert_eq!(words, vec![Some(180), Some(300)]);
    assert_eq!(cmp.summary.word_count_mismatches, 2);
}

#[test]
fn issue_reconciliation_mixes_tags_and_table() {
    let config = config();
    let (left, pages) = load_issue_source(&fixtures(), &config.left).unwrap();
    let (right, right_pages) = load_issue_source(&fixtures(), &config.right).unwrap();
    assert_eq!(pages, Some(5));
    assert_eq!(right_pages, None);
    assert!(right.is_pre_aggregated());

    let cmp = run_issue_comparison(&config, &left, &right);
    // repeated "Thin Content" rows in the overview are summed
    assert_eq!(cmp.counts_b.get("Thin Content"), 5);

    let status = |name: &str| cmp.rows.iter().find(|r| r.name == name).map(|r| r.status);
    assert_eq!(status("Missing H1"), Some(IssueStatus::Close));
    assert_eq!(status("Server Error"), Some(IssueStatus::Close));
    assert_eq!(status("Missing Meta Description"), Some(IssueStatus::UniqueFind));
    assert_eq!(status("Thin Content"), Some(IssueStatus::Mismatch));
    assert_eq!(cmp.summary.total_names, 4);
}

#[test]
fn tag_mode_without_issue_column_counts_nothing() {
    let mut config = config();
    config.right.issues_file = None;
    let (right, pages) = load_issue_source(&fixtures(), &config.right).unwrap();
    assert_eq!(pages, Some(4));
    assert!(right.counts().is_empty());

    let (left, _) = load_issue_source(&fixtures(), &config.left).unwrap();
    let cmp = run_issue_comparison(&config, &left, &right);
    let status = |name: &str| cmp.rows.iter().find(|r| r.name == name).map(|r| r.status);
    // left is the reference: 2 vs 0 is within the close gap, nothing else is reported by the right
    assert_eq!(status("Missing H1"), Some(IssueStatus::Close));
    assert_eq!(cmp.counts_b.total(), 0);
}

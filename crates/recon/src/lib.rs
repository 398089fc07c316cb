//! `crawlparity-recon` — Crawl report reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded records and issue counts, returns partitions,
//! discrepancies, classified issue rows and rendered text. No file or console IO.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod report;

pub use config::CompareConfig;
pub use engine::{run_issue_comparison, run_url_comparison, IssueSource};
pub use error::ReconError;
pub use model::{CellValue, CrawledRecord, IssueCounts, IssueStatus, Reference};

// crawlparity - compare two crawlers' exports of the same site

mod compare;
mod exit_codes;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "crawlparity")]
#[command(about = "Reconcile two crawl reports: URL coverage and issue counts")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Comparison config; relative paths inside it resolve against its directory
    #[arg(long, global = true, env = "CRAWLPARITY_CONFIG", default_value = "crawlparity.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the URL sets of both crawls and the fields of shared URLs
    #[command(after_help = "\
Examples:
  crawlparity urls
  crawlparity --config audits/site.toml urls --json")]
    Urls {
        /// Print the full result as JSON instead of the text summary
        #[arg(long)]
        json: bool,
    },

    /// Compare per-issue counts and label each gap
    #[command(after_help = "\
Examples:
  crawlparity issues
  CRAWLPARITY_CONFIG=audits/site.toml crawlparity issues --json")]
    Issues {
        /// Print the full result as JSON instead of the markdown report
        #[arg(long)]
        json: bool,
    },

    /// Parse and validate the config without loading any source
    Validate,
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  crawlparity-recon ", env!("CARGO_PKG_VERSION"),
    )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("crawlparity=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Commands::Urls { json } => compare::cmd_urls(&cli.config, json),
        Commands::Issues { json } => compare::cmd_issues(&cli.config, json),
        Commands::Validate => compare::cmd_validate(&cli.config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

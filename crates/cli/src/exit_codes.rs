//! CLI Exit Code Registry
//!
//! Single source of truth for `crawlparity` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                               |
//! |------|-------------------------------------------------------|
//! | 0    | Report written (differences between crawls included)  |
//! | 2    | Usage error (bad arguments)                           |
//! | 3    | Configuration missing, unparsable or invalid          |
//! | 4    | A source could not be loaded                          |
//! | 5    | A report artifact could not be written                |
//!
//! Differences between the two crawls are the product of a run, never a failure.

use crawlparity_recon::ReconError;

/// Success - both sources loaded and every artifact written.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - clap reports these itself with the same code.
#[allow(dead_code)]
pub const EXIT_USAGE: u8 = 2;

/// Config file unreadable, not valid TOML, or failing validation.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Either source failed to open or parse, or lacks a required column.
pub const EXIT_SOURCE_LOAD: u8 = 4;

/// Report document or companion table could not be written.
pub const EXIT_OUTPUT_WRITE: u8 = 5;

/// Map a library error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        ReconError::SourceLoad { .. } | ReconError::MissingColumn { .. } => EXIT_SOURCE_LOAD,
        ReconError::Io(_) => EXIT_OUTPUT_WRITE,
    }
}

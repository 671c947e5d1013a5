//! Best-effort external formatter pass
//!
//! After a file is written, an external formatter (prettier by default)
//! can be run over it. The contract is best-effort: a missing or failing
//! formatter is reported by the caller but never aborts the run or rolls
//! back the written file.

use std::path::Path;
use std::process::Command;
use thiserror::Error;

/// Default formatter invocation, split on whitespace.
pub const DEFAULT_FORMATTER: &str = "prettier --write";

/// Error from the external formatter
#[derive(Debug, Error)]
pub enum FormatError {
    /// The formatter command was empty
    #[error("Empty formatter command")]
    EmptyCommand,
    /// The formatter could not be spawned
    #[error("Failed to run formatter '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    /// The formatter ran but exited unsuccessfully
    #[error("Formatter '{command}' exited with {status}")]
    Failed {
        command: String,
        status: std::process::ExitStatus,
    },
}

/// Run the formatter command over one file.
///
/// `command` is split on whitespace; the file path is appended as the
/// final argument. Stdout/stderr are inherited so formatter diagnostics
/// reach the user directly.
pub fn run_formatter(command: &str, path: &Path) -> Result<(), FormatError> {
    let mut parts = command.split_whitespace();
    let program = parts.next().ok_or(FormatError::EmptyCommand)?;

    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|source| FormatError::Spawn {
            command: command.to_string(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(FormatError::Failed {
            command: command.to_string(),
            status,
        })
    }
}

/// Run the formatter over one file, reporting any failure on stderr.
///
/// Formatter failure is non-fatal by contract. The warning is printed
/// immediately, so it still surfaces when a later write aborts the run.
pub fn format_best_effort(command: &str, path: &Path) {
    if let Err(e) = run_formatter(command, path) {
        eprintln!("Warning: {}", e);
    }
}

//! Splicing compiled schemas into template files
//!
//! A section template carries one schema region between the literal
//! `{% schema %}` and `{% endschema %}` markers. Merging replaces that
//! region with freshly generated JSON and only touches the file when the
//! content actually changed, so repeated runs with the same input are
//! no-ops.

use regex::{NoExpand, Regex};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// Opening marker of the schema region.
pub const SCHEMA_OPEN: &str = "{% schema %}";

/// Closing marker of the schema region.
pub const SCHEMA_CLOSE: &str = "{% endschema %}";

/// Error during template merging
#[derive(Debug, Error)]
pub enum MergeError {
    /// Failed to read the target file
    #[error("Failed to read '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    /// Failed to write the target file
    #[error("Failed to write '{}': {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    /// Existing file has no schema region to replace
    #[error("No schema region found in '{}' (expected {SCHEMA_OPEN} ... {SCHEMA_CLOSE})", .path.display())]
    NoSchemaRegion { path: PathBuf },
}

/// What a merge or write ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// File content changed and was written
    Written,
    /// File already had the desired content, nothing written
    Unchanged,
}

fn schema_region() -> &'static Regex {
    static REGION: OnceLock<Regex> = OnceLock::new();
    // Greedy: a region runs from the first opening marker to the last
    // closing marker, so stray markers inside the JSON cannot truncate it.
    REGION.get_or_init(|| {
        Regex::new(r"(?s)\{%\s*schema\s*%\}.*\{%\s*endschema\s*%\}")
            .expect("schema region pattern is valid")
    })
}

/// Merge a compiled section schema into its template file.
///
/// Reads the existing template (or synthesizes a stub for a missing one),
/// replaces the first schema region with `schema_json`, and writes the
/// result back only when it differs from what is on disk.
pub fn merge_section(path: &Path, name: &str, schema_json: &str) -> Result<MergeOutcome, MergeError> {
    let on_disk = if path.exists() {
        Some(fs::read_to_string(path).map_err(|source| MergeError::Read {
            path: path.to_path_buf(),
            source,
        })?)
    } else {
        None
    };

    let template = match &on_disk {
        Some(content) => content.clone(),
        None => section_stub(name),
    };

    if !schema_region().is_match(&template) {
        return Err(MergeError::NoSchemaRegion {
            path: path.to_path_buf(),
        });
    }

    let block = format!("{SCHEMA_OPEN}\n{schema_json}\n{SCHEMA_CLOSE}");
    // NoExpand: the JSON may legitimately contain `$`
    let merged = schema_region()
        .replacen(&template, 1, NoExpand(block.as_str()))
        .into_owned();

    if on_disk.as_deref() == Some(merged.as_str()) {
        return Ok(MergeOutcome::Unchanged);
    }

    write_file(path, &merged)?;
    Ok(MergeOutcome::Written)
}

/// Write `content` to `path` unless the file already holds it.
///
/// Used for the aggregate settings schema, which is a whole-file output
/// rather than a spliced region.
pub fn write_if_changed(path: &Path, content: &str) -> Result<MergeOutcome, MergeError> {
    if path.exists() {
        let on_disk = fs::read_to_string(path).map_err(|source| MergeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if on_disk == content {
            return Ok(MergeOutcome::Unchanged);
        }
    }

    write_file(path, content)?;
    Ok(MergeOutcome::Written)
}

/// Minimal template for a section that has no file yet: the bare section
/// name and an empty schema block for the merge to fill in.
fn section_stub(name: &str) -> String {
    format!("{name}\n\n{SCHEMA_OPEN}\n{SCHEMA_CLOSE}\n")
}

fn write_file(path: &Path, content: &str) -> Result<(), MergeError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| MergeError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    fs::write(path, content).map_err(|source| MergeError::Write {
        path: path.to_path_buf(),
        source,
    })
}

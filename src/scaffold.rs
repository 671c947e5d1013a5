//! Scaffolding for new template/section pairs
//!
//! `sgen new <name>` writes a minimal page template JSON and a matching
//! section Liquid file with an empty schema block. Both target paths are
//! checked before anything is written, so a collision never leaves a
//! half-created pair behind.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::{SECTIONS_DIR, TEMPLATES_DIR};

/// Error during template scaffolding
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// Target file already exists
    #[error("File already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    /// Failed to create directory
    #[error("Failed to create directory: {0}")]
    CreateDir(std::io::Error),
    /// Failed to write file
    #[error("Failed to write file: {0}")]
    WriteFile(std::io::Error),
    /// Invalid template name
    #[error("Invalid template name '{0}'. Use lowercase letters, numbers, and underscores, with optional '/' segments.")]
    InvalidName(String),
}

/// Validate a template name.
///
/// Names may contain `/`-separated segments (e.g. `customers/login`);
/// each segment must start with a lowercase letter and contain only
/// lowercase letters, numbers, and underscores.
fn validate_name(name: &str) -> Result<(), ScaffoldError> {
    if name.is_empty() {
        return Err(ScaffoldError::InvalidName(name.to_string()));
    }

    for segment in name.split('/') {
        let mut chars = segment.chars();
        match chars.next() {
            Some(first) if first.is_ascii_lowercase() => {}
            _ => return Err(ScaffoldError::InvalidName(name.to_string())),
        }
        for c in chars {
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '_' {
                return Err(ScaffoldError::InvalidName(name.to_string()));
            }
        }
    }

    Ok(())
}

/// Create a new empty template/section pair.
///
/// Writes `templates/<name>.json` and `sections/<base>.liquid` under
/// `root`, where `<base>` is the last segment of `name`. Fails with
/// `AlreadyExists` before any write if either file is present.
///
/// # Returns
/// * `Ok((template_path, section_path))` - Paths to the created files
/// * `Err(ScaffoldError)` - If validation or creation fails
pub fn new_template(root: &Path, name: &str) -> Result<(PathBuf, PathBuf), ScaffoldError> {
    validate_name(name)?;

    let section = name.rsplit('/').next().unwrap_or(name);
    let template_path = root.join(TEMPLATES_DIR).join(format!("{name}.json"));
    let section_path = root.join(SECTIONS_DIR).join(format!("{section}.liquid"));

    // Both guards run before either write
    if template_path.exists() {
        return Err(ScaffoldError::AlreadyExists(template_path));
    }
    if section_path.exists() {
        return Err(ScaffoldError::AlreadyExists(section_path));
    }

    for path in [&template_path, &section_path] {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ScaffoldError::CreateDir)?;
        }
    }

    fs::write(&template_path, template_stub(section)).map_err(ScaffoldError::WriteFile)?;
    fs::write(&section_path, section_stub(section)).map_err(ScaffoldError::WriteFile)?;

    Ok((template_path, section_path))
}

/// Generate the page template stub: one `main_<section>` entry.
fn template_stub(section: &str) -> String {
    format!(
        r#"{{
  "sections": {{
    "main_{section}": {{
      "type": "{section}"
    }}
  }},
  "order": [
    "main_{section}"
  ]
}}
"#
    )
}

/// Generate the section stub: placeholder body and an empty schema block.
fn section_stub(section: &str) -> String {
    format!(
        r#"Modify me on {SECTIONS_DIR}/{section}.liquid

{{% schema %}}
{{
  "name": "Main {section}"
}}
{{% endschema %}}
"#
    )
}

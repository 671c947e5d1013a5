//! Loading the YAML schema document
//!
//! The document is read once per run and held as a `serde_yaml::Mapping`,
//! which preserves the key order of the source file. Everything downstream
//! only reads from it.

use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error while loading the schema document
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Input file could not be read
    #[error("Cannot read schema file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Input file is not valid YAML
    #[error("Cannot parse schema file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    /// Document root is not a mapping
    #[error("Schema document '{}' must be a mapping at the top level", .path.display())]
    NotAMapping { path: PathBuf },
}

/// The loaded schema document.
#[derive(Debug, Clone)]
pub struct SchemaDoc {
    root: Mapping,
}

impl SchemaDoc {
    /// Load the schema document from a YAML file.
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let value: Value =
            serde_yaml::from_str(&content).map_err(|source| SchemaError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        match value {
            Value::Mapping(root) => Ok(SchemaDoc { root }),
            _ => Err(SchemaError::NotAMapping {
                path: path.to_path_buf(),
            }),
        }
    }

    /// The root mapping, in document order.
    pub fn root(&self) -> &Mapping {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_document() {
        let file = write_temp("theme:\n  name: Test\nsections: {}\n");
        let doc = SchemaDoc::load(file.path()).unwrap();
        assert!(doc.root().contains_key("theme"));
        assert!(doc.root().contains_key("sections"));
    }

    #[test]
    fn test_load_preserves_key_order() {
        let file = write_temp("b: 1\na: 2\nc: 3\n");
        let doc = SchemaDoc::load(file.path()).unwrap();
        let keys: Vec<_> = doc
            .root()
            .keys()
            .filter_map(|k| k.as_str())
            .collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_load_missing_file() {
        let result = SchemaDoc::load(Path::new("/nonexistent/schema.yml"));
        assert!(matches!(result, Err(SchemaError::Read { .. })));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let file = write_temp("theme: [unclosed\n");
        let result = SchemaDoc::load(file.path());
        assert!(matches!(result, Err(SchemaError::Parse { .. })));
    }

    #[test]
    fn test_load_scalar_root() {
        let file = write_temp("just a string\n");
        let result = SchemaDoc::load(file.path());
        assert!(matches!(result, Err(SchemaError::NotAMapping { .. })));
    }
}

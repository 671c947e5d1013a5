//! Schemagen - Library for compiling YAML theme schemas
//!
//! This library provides functionality to:
//! - Load a `schema.yml` document describing theme sections and settings
//! - Compile it into the aggregate settings schema and one JSON blob per section
//! - Splice each blob into its section template between schema markers
//! - Scaffold a new empty template/section pair

pub mod cli;
pub mod compile;
pub mod format;
pub mod merge;
pub mod scaffold;
pub mod schema;
pub mod text;

/// Input schema document, relative to the project root.
pub const SCHEMA_FILE: &str = "schema.yml";

/// Aggregate settings schema output, relative to the project root.
pub const CONFIG_SETTINGS_PATH: &str = "config/settings_schema.json";

/// Directory holding section templates.
pub const SECTIONS_DIR: &str = "sections";

/// Directory holding page templates.
pub const TEMPLATES_DIR: &str = "templates";

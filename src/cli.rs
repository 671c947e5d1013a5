//! Command-line interface implementation

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::compile::{compile_sections, compile_settings_schema};
use crate::format::{format_best_effort, DEFAULT_FORMATTER};
use crate::merge::{merge_section, write_if_changed, MergeOutcome};
use crate::scaffold::new_template;
use crate::schema::{SchemaDoc, SchemaError};
use crate::text::slugify;
use crate::{CONFIG_SETTINGS_PATH, SCHEMA_FILE, SECTIONS_DIR};

const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;
const EXIT_INVALID_ARGS: u8 = 2;

/// Schemagen - Compile a YAML theme schema into section templates
#[derive(Parser)]
#[command(name = "sgen")]
#[command(about = "Schemagen - Compile a YAML theme schema into section templates")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile the schema and splice the results into template files
    Generate {
        /// Project root holding schema.yml, config/, sections/
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Schema document to compile.
        /// If omitted: {root}/schema.yml
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Run the external formatter over written files
        #[arg(long)]
        format: bool,

        /// Formatter command; the file path is appended as the last argument
        #[arg(long, default_value = DEFAULT_FORMATTER)]
        formatter: String,
    },

    /// Scaffold a new empty template/section pair
    New {
        /// Template name, optionally with a subdirectory (customers/login)
        name: String,

        /// Project root to scaffold under
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            root,
            schema,
            format,
            formatter,
        } => run_generate(&root, schema.as_deref(), format, &formatter),
        Commands::New { name, root } => run_new(&root, &name),
    }
}

/// Execute the generate command
fn run_generate(root: &Path, schema: Option<&Path>, format: bool, formatter: &str) -> ExitCode {
    let schema_path = match schema {
        Some(path) => path.to_path_buf(),
        None => root.join(SCHEMA_FILE),
    };

    let doc = match SchemaDoc::load(&schema_path) {
        Ok(doc) => doc,
        Err(e @ SchemaError::Read { .. }) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    // Aggregate settings schema
    let settings_schema = match compile_settings_schema(doc.root()) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let settings_path = root.join(CONFIG_SETTINGS_PATH);
    if let Err(code) = emit(&settings_path, &settings_schema, None, format, formatter) {
        return code;
    }

    // One spliced schema per section, in document order
    let sections = match compile_sections(doc.root()) {
        Ok(sections) => sections,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    for (name, schema) in &sections {
        let path = root
            .join(SECTIONS_DIR)
            .join(format!("{}.liquid", slugify(name)));
        if let Err(code) = emit(&path, schema, Some(name), format, formatter) {
            return code;
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Serialize one compiled value and write or merge it into its target.
///
/// `section` selects the output mode: `Some(name)` splices into the
/// section's schema region, `None` overwrites the whole file.
fn emit(
    path: &Path,
    value: &serde_json::Value,
    section: Option<&str>,
    format: bool,
    formatter: &str,
) -> Result<(), ExitCode> {
    let json = match serde_json::to_string_pretty(value) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: Failed to serialize '{}': {}", path.display(), e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };

    let outcome = match section {
        Some(name) => merge_section(path, name, &json),
        None => write_if_changed(path, &format!("{json}\n")),
    };

    match outcome {
        Ok(MergeOutcome::Written) => {
            println!("Saved: {}", path.display());
            // warn right away; a later write error must not swallow this
            if format {
                format_best_effort(formatter, path);
            }
            Ok(())
        }
        Ok(MergeOutcome::Unchanged) => Ok(()),
        Err(e) => {
            eprintln!("Error: {}", e);
            Err(ExitCode::from(EXIT_ERROR))
        }
    }
}

/// Execute the new command
fn run_new(root: &Path, name: &str) -> ExitCode {
    match new_template(root, name) {
        Ok((template_path, section_path)) => {
            println!("Saved: {}", template_path.display());
            println!("Saved: {}", section_path.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

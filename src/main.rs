//! Schemagen - Command-line tool for compiling YAML theme schemas into section templates

use std::process::ExitCode;

use schemagen::cli;

fn main() -> ExitCode {
    cli::run()
}

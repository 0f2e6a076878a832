//! Command-line interface implementation for formplate.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for formplate.
#[derive(Parser, Debug)]
#[command(author, version, about = "formplate: render form submissions through wildcard templates", long_about = None)]
pub struct Args {
    /// Path to the form document, or a directory containing form.json / form.yml
    #[arg(value_name = "FORM")]
    pub form: PathBuf,

    /// Read the submission from a JSON or YAML file instead of prompting
    #[arg(long, value_name = "FILE")]
    pub submission: Option<PathBuf>,

    /// Read the submission from stdin
    #[arg(short, long)]
    pub stdin: bool,

    /// List the form's wildcards and check that the template can be saved
    #[arg(short, long)]
    pub wildcards: bool,

    /// Skip the confirmation asked for forms that look like they collect secrets
    #[arg(long)]
    pub skip_sensitive_check: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Returns
/// * `Args` - Parsed command line arguments
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                if let Err(err) = print_usage() {
                    eprintln!("{}", err);
                }
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}

/// Prints the help text shown when required arguments are missing.
pub fn print_usage() -> std::io::Result<()> {
    Args::command()
        .help_template(
            r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
        )
        .print_help()
}

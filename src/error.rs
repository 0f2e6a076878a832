//! Error handling for formplate.
//! Defines the error type returned at the edges (files, terminal, save gate)
//! and the recoverable issues the engine logs instead of returning.

use std::io;
use thiserror::Error;

/// Errors returned by formplate operations.
///
/// The template engine itself never fails; these cover loading documents,
/// reading submissions, interacting with the terminal and the save gate.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors that occur while loading or parsing a form document
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Represents a submission that could not be read or is not a key/value object
    #[error("Submission error: {0}.")]
    SubmissionError(String),

    /// Represents failures of the interactive terminal prompts
    #[error("Prompt error: {0}.")]
    PromptError(String),

    /// Raised when saving is attempted while repeating-group wildcards are unused
    #[error("Save blocked: dataset wildcards not used in the template: {}.", .unused.join(", "))]
    SaveBlocked { unused: Vec<String> },

    /// Raised when the user declines to continue with a form flagged as sensitive
    #[error("Sensitive content: {0}.")]
    SensitiveContent(String),
}

/// Convenience type alias for Results with Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Conditions the engine recovers from.
///
/// These are never returned as `Err`; callers see them through the log.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// A field that needs a key has none; it is skipped during extraction
    #[error("schema error: {field_type} field without a key skipped")]
    SchemaError { field_type: String },

    /// A block opener without a matching closer; left as literal text
    #[error("template syntax error: '{{@START_{key}@}}' has no matching '{{@END_{key}@}}'")]
    TemplateSyntaxError { key: String },

    /// An object value that is neither a checkbox group nor a single select
    #[error("normalization ambiguity: '{key}' treated as survey answers")]
    NormalizationAmbiguity { key: String },
}

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}

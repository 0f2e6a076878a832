//! formplate turns form submissions into text.
//! A form schema describes the fields, a template references them through
//! `{KEY}` wildcards and `{@START_KEY@}...{@END_KEY@}` blocks, and a submission
//! is normalized and expanded into the final content and title.

/// Command-line interface module for the formplate application
pub mod cli;

/// Stored form document loading
/// Supports JSON and YAML formats (form.json, form.yml, form.yaml)
pub mod config;

pub mod constants;

/// Error types and handling for the formplate application
pub mod error;

/// Template expansion: blocks, placeholders and entity decoding
pub mod expand;

/// Field key generation for the form builder
pub mod keygen;

pub mod logger;

/// Multi-value field rows
pub mod multi;

/// Submission normalization into a flat record
pub mod normalize;

/// Core orchestration
/// Combines normalization and expansion for one form document
pub mod processor;

/// User input and interaction handling
pub mod prompt;

/// Wildcard usage tracking and the save gate
pub mod registry;

/// Form schema model and tree walking
pub mod schema;

pub mod sensitive;

/// Submission sources: stdin, file, interactive
pub mod submission;

/// Wildcard extraction from a schema
pub mod wildcard;

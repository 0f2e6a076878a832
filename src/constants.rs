//! Common constants used throughout formplate.

/// Supported form document file names, tried in order when a directory is given
pub const FORM_FILES: [&str; 3] = ["form.json", "form.yml", "form.yaml"];

/// Key reserved for the submit action appended to every schema
pub const SUBMIT_KEY: &str = "submit";

/// Label used when a field has no usable label
pub const FALLBACK_LABEL: &str = "FIELD";

/// Maximum length of a survey question or select option before it becomes part of a key
pub const SHORT_TOKEN_LEN: usize = 15;

/// Prefix of the token opening a repeating-group block
pub const DATASET_START: &str = "@START_";

/// Prefix of the token closing a repeating-group block
pub const DATASET_END: &str = "@END_";

/// Length of the random part of a generated key suffix
pub const KEY_SUFFIX_LEN: usize = 4;

/// Separator used when a multi-value field is rendered outside of its block
pub const MULTI_VALUE_SEPARATOR: &str = ", ";

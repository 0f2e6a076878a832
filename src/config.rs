//! Form document handling.
//! A form document bundles a schema with its content template and optional
//! title template, as stored by the form builder. Documents are JSON, with
//! YAML accepted as a fallback.

use std::path::Path;

use log::debug;
use serde::Deserialize;
use serde_json::Value;

use crate::constants::FORM_FILES;
use crate::error::{Error, Result};
use crate::schema::FormSchema;

/// A stored form: schema plus templates and display settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDocument {
    pub schema: FormSchema,
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub template_title: String,
    #[serde(default)]
    pub template_link: String,
    #[serde(default)]
    pub enable_template_title: bool,
    #[serde(default)]
    pub enable_template_link: bool,
    #[serde(default)]
    pub form_name: String,
    #[serde(default)]
    pub form_style: Option<String>,
    #[serde(default)]
    pub form_width: Option<u32>,
    /// Schema exactly as stored, for content scans
    #[serde(skip)]
    pub raw_schema: Value,
}

impl FormDocument {
    /// Title template, when enabled and not empty.
    pub fn title_template(&self) -> Option<&str> {
        if self.enable_template_title && !self.template_title.trim().is_empty() {
            Some(&self.template_title)
        } else {
            None
        }
    }

    /// Link the rendered post should go to, when enabled and not empty.
    pub fn link(&self) -> Option<&str> {
        if self.enable_template_link && !self.template_link.trim().is_empty() {
            Some(&self.template_link)
        } else {
            None
        }
    }

    /// Display name of the form, falling back to the schema title.
    pub fn name(&self) -> &str {
        if self.form_name.is_empty() {
            &self.schema.title
        } else {
            &self.form_name
        }
    }
}

/// Reads a form document from a file, or from the first known file name in a directory.
///
/// # Arguments
/// * `path` - Document file, or a directory containing one
/// * `form_files` - File names to try inside a directory
///
/// # Returns
/// * `Result<String>` - Contents of the document
///
/// # Errors
/// * `Error::ConfigError` if no document exists
pub fn load_document<P: AsRef<Path>>(path: P, form_files: &[&str]) -> Result<String> {
    let path = path.as_ref();
    if path.is_file() {
        debug!("Loading form document from {}", path.display());
        return Ok(std::fs::read_to_string(path)?);
    }

    if path.is_dir() {
        for file in form_files {
            let document_path = path.join(file);
            if document_path.exists() {
                debug!("Loading form document from {}", document_path.display());
                return Ok(std::fs::read_to_string(&document_path)?);
            }
        }
    }

    Err(Error::ConfigError(format!(
        "No form document found at {} (tried: {})",
        path.display(),
        form_files.join(", ")
    )))
}

/// Parses document content, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither, or lacks a schema
pub fn parse_document(content: &str) -> Result<FormDocument> {
    let raw: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid document format: {}", e)))?,
    };

    let raw_schema = raw.get("schema").cloned().unwrap_or(Value::Null);
    let mut document: FormDocument = serde_json::from_value(raw)
        .map_err(|e| Error::ConfigError(format!("Invalid form document: {}", e)))?;
    document.raw_schema = raw_schema;

    debug!(
        "Parsed form '{}' with {} top-level components",
        document.name(),
        document.schema.components.len()
    );
    Ok(document)
}

/// Loads and parses the form document at `path`.
pub fn get_document<P: AsRef<Path>>(path: P) -> Result<FormDocument> {
    let content = load_document(path, &FORM_FILES)?;
    parse_document(&content)
}

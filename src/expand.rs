//! Template expansion.
//! Resolves `{@START_KEY@}...{@END_KEY@}` blocks and `{KEY}` placeholders of a
//! template against a normalized record.
//!
//! Blocks are matched left to right, first match wins, one level deep: a block
//! inside another block is not expanded. A block opener without its closer is
//! kept as literal text.

use std::sync::LazyLock;

use log::{debug, warn};
use regex::{Captures, Regex};
use serde_json::Value;

use crate::error::Issue;
use crate::normalize::{display_value, NormalizedRecord, NormalizedValue};

const START_OPEN: &str = "{@START_";
const MARKER_CLOSE: &str = "@}";

#[allow(clippy::expect_used)]
static START_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{@START_([A-Za-z0-9_]+)@\}").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("constant regex pattern is valid"));

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template against a normalized record.
    ///
    /// # Arguments
    /// * `template` - Template text
    /// * `record` - Normalized submission
    ///
    /// # Returns
    /// * `String` - Rendered text; missing values render empty
    fn render(&self, template: &str, record: &NormalizedRecord) -> String;
}

/// Renderer for the wildcard template language.
#[derive(Debug, Clone, Default)]
pub struct WildcardRenderer {}

impl WildcardRenderer {
    pub fn new() -> Self {
        Self {}
    }
}

impl TemplateRenderer for WildcardRenderer {
    fn render(&self, template: &str, record: &NormalizedRecord) -> String {
        expand(template, record)
    }
}

/// Content and optional title produced from one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedOutput {
    pub content: String,
    pub title: Option<String>,
}

/// Decodes HTML entities until the text stops changing.
///
/// Stored templates may be escaped more than once. Every decoding pass that
/// changes the text makes it shorter, so the loop ends.
pub fn decode_entities(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let decoded = html_escape::decode_html_entities(&current);
        if decoded.as_ref() == current.as_str() {
            return current;
        }
        current = decoded.into_owned();
    }
}

/// Expands `template` against `record`.
pub fn expand(template: &str, record: &NormalizedRecord) -> String {
    let template = decode_entities(template);
    let mut output = String::with_capacity(template.len());
    let mut cursor = 0;
    let mut search_from = 0;

    while let Some(start) = START_MARKER.find_at(&template, search_from) {
        let key = &template[start.start() + START_OPEN.len()..start.end() - MARKER_CLOSE.len()];
        let end_marker = format!("{{@END_{}@}}", key);

        let Some(body_len) = template[start.end()..].find(&end_marker) else {
            warn!("{}", Issue::TemplateSyntaxError { key: key.to_string() });
            search_from = start.end();
            continue;
        };

        let body = &template[start.end()..start.end() + body_len];
        output.push_str(&substitute(&template[cursor..start.start()], record));
        output.push_str(&expand_block(key, body, record));

        cursor = start.end() + body_len + end_marker.len();
        search_from = cursor;
    }

    output.push_str(&substitute(&template[cursor..], record));
    output
}

/// Expands a content template and an optional title template with the same record.
pub fn expand_all(content: &str, title: Option<&str>, record: &NormalizedRecord) -> RenderedOutput {
    RenderedOutput {
        content: expand(content, record),
        title: title.map(|title| expand(title, record)),
    }
}

fn expand_block(key: &str, body: &str, record: &NormalizedRecord) -> String {
    match record.get(key) {
        None | Some(NormalizedValue::Scalar(Value::Null)) => {
            debug!("Block {} has no data", key);
            String::new()
        }
        // The first row is the builder's hidden template row.
        Some(NormalizedValue::Rows(rows)) => rows
            .iter()
            .skip(1)
            .map(|row| substitute_row(body, row))
            .collect(),
        Some(NormalizedValue::Multi(values)) => values
            .iter()
            .enumerate()
            .filter(|(_, value)| !value.is_empty())
            .map(|(index, value)| substitute_multi(body, key, value, index, values.len(), record))
            .collect(),
        Some(_) => substitute(body, record),
    }
}

/// Replaces every `{KEY}` with the record's display text, empty when absent.
pub fn substitute(text: &str, record: &NormalizedRecord) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| record.display(&caps[1]).unwrap_or_default())
        .into_owned()
}

fn substitute_row(body: &str, row: &Value) -> String {
    let fields = row.as_object();
    PLACEHOLDER
        .replace_all(body, |caps: &Captures| {
            fields
                .and_then(|fields| fields.get(&caps[1]))
                .map(display_value)
                .unwrap_or_default()
        })
        .into_owned()
}

fn substitute_multi(
    body: &str,
    key: &str,
    value: &str,
    index: usize,
    count: usize,
    record: &NormalizedRecord,
) -> String {
    PLACEHOLDER
        .replace_all(body, |caps: &Captures| {
            let name = &caps[1];
            match name.strip_prefix(key).and_then(|rest| rest.strip_prefix('_')) {
                _ if name == key => value.to_string(),
                Some("value") => value.to_string(),
                Some("index") => index.to_string(),
                Some("count") => count.to_string(),
                _ => record.display(name).unwrap_or_default(),
            }
        })
        .into_owned()
}

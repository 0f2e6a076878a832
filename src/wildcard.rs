//! Wildcard extraction.
//! Walks a schema and lists, in document order, every placeholder a template
//! may reference. Repeating groups contribute a block opener and closer,
//! composite fields contribute one derived key per option or question.

use std::fmt;

use log::warn;

use crate::constants::{DATASET_END, DATASET_START, SHORT_TOKEN_LEN};
use crate::error::Issue;
use crate::schema::{walk, FieldDescriptor, FieldType, SchemaNode, Visit};

/// A placeholder token a template can reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Wildcard {
    /// `KEY`, written `{KEY}` in a template
    Flat(String),
    /// `@START_KEY@`, opens a repeating-group block
    DatasetStart(String),
    /// `@END_KEY@`, closes a repeating-group block
    DatasetEnd(String),
}

impl Wildcard {
    /// Parses a token as produced by [`Wildcard::token`].
    pub fn parse(token: &str) -> Self {
        let dataset_key = |prefix: &str| {
            token
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix('@'))
                .map(str::to_string)
        };
        if let Some(key) = dataset_key(DATASET_START) {
            Wildcard::DatasetStart(key)
        } else if let Some(key) = dataset_key(DATASET_END) {
            Wildcard::DatasetEnd(key)
        } else {
            Wildcard::Flat(token.to_string())
        }
    }

    /// Token text without braces.
    pub fn token(&self) -> String {
        match self {
            Wildcard::Flat(key) => key.clone(),
            Wildcard::DatasetStart(key) => format!("{}{}@", DATASET_START, key),
            Wildcard::DatasetEnd(key) => format!("{}{}@", DATASET_END, key),
        }
    }

    /// Token as written in a template.
    pub fn placeholder(&self) -> String {
        format!("{{{}}}", self.token())
    }

    /// Whether the token is a repeating-group boundary.
    pub fn is_dataset(&self) -> bool {
        !matches!(self, Wildcard::Flat(_))
    }

    /// Field key the token belongs to.
    pub fn key(&self) -> &str {
        match self {
            Wildcard::Flat(key) | Wildcard::DatasetStart(key) | Wildcard::DatasetEnd(key) => key,
        }
    }
}

impl fmt::Display for Wildcard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Shortens a survey question into a key fragment: first 15 characters,
/// letters and digits only.
pub fn short_question_token(question: &str) -> String {
    question
        .chars()
        .take(SHORT_TOKEN_LEN)
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Shortens a checkbox group option into a key fragment: first 15
/// characters, letters, digits and underscores only.
pub fn sanitize_option_token(option: &str) -> String {
    option
        .chars()
        .take(SHORT_TOKEN_LEN)
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Key of the numbered survey answer for the question at `index` (0-based).
pub fn survey_answer_key(field_key: &str, question: &str, index: usize) -> String {
    format!("{}_{}{}", field_key, short_question_token(question), index + 1)
}

/// Lists the wildcards of a schema, depth-first and in document order.
pub fn extract(components: &[FieldDescriptor]) -> Vec<Wildcard> {
    let mut wildcards = Vec::new();

    walk(components, &mut |node| {
        if node.is_layout_transparent() {
            return Visit::Descend;
        }
        if node.field_type == FieldType::Button {
            return Visit::Skip;
        }

        let Some(key) = node.key() else {
            warn!(
                "{}",
                Issue::SchemaError {
                    field_type: format!("{:?}", node.field_type)
                }
            );
            return Visit::Skip;
        };

        match node.field_type {
            FieldType::RepeatingGroup => {
                wildcards.push(Wildcard::DatasetStart(key.to_string()));
                wildcards.push(Wildcard::DatasetEnd(key.to_string()));
                Visit::Descend
            }
            FieldType::Survey => {
                for (index, question) in node.survey_questions().iter().enumerate() {
                    if let Some(question) = question {
                        wildcards.push(Wildcard::Flat(survey_answer_key(
                            key,
                            &question.value,
                            index,
                        )));
                    }
                }
                Visit::Skip
            }
            FieldType::SelectGroup => {
                for option in node.options() {
                    wildcards.push(Wildcard::Flat(format!(
                        "{}_{}",
                        key,
                        sanitize_option_token(&option.value)
                    )));
                }
                Visit::Skip
            }
            _ => {
                wildcards.push(Wildcard::Flat(key.to_string()));
                Visit::Skip
            }
        }
    });

    wildcards
}

/// Lists the wildcard tokens of a schema, depth-first and in document order.
pub fn extract_wildcards(components: &[FieldDescriptor]) -> Vec<String> {
    extract(components).iter().map(Wildcard::token).collect()
}

//! Submission sourcing.
//! A submission comes from stdin, from a file, or is collected field by field
//! through a [`Prompter`].

use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde_json::{Map, Value};
use url::Url;

use crate::error::{Error, Result};
use crate::multi::{MultiValueField, MultiValueSet};
use crate::normalize::SubmissionRecord;
use crate::prompt::Prompter;
use crate::schema::{walk, FieldDescriptor, FieldType, FormSchema, SchemaNode, Visit};

#[derive(Debug)]
pub enum SubmissionSource {
    Stdin,
    File(PathBuf),
    None,
}

/// Parses a submission, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::SubmissionError` if the content is neither or is not a key/value object
pub fn parse_submission(content: &str) -> Result<SubmissionRecord> {
    let value: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::SubmissionError(format!("Invalid submission format: {}", e)))?,
    };
    match value {
        Value::Object(record) => Ok(record),
        other => Err(Error::SubmissionError(format!(
            "expected a key/value object, found {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

pub fn load_from_stdin() -> Result<SubmissionRecord> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    parse_submission(buffer.trim())
}

pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<SubmissionRecord> {
    let path = path.as_ref();
    debug!("Loading submission from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    parse_submission(&content)
}

/// Reads a prepared submission, `None` when it should be collected interactively.
///
/// Stdin wins over a file when both are given.
pub fn get_submission_from(
    take_from_stdin: bool,
    path: Option<PathBuf>,
) -> Result<Option<SubmissionRecord>> {
    let source = match (take_from_stdin, path) {
        (true, _) => SubmissionSource::Stdin,
        (false, Some(path)) => SubmissionSource::File(path),
        (false, None) => SubmissionSource::None,
    };

    match source {
        SubmissionSource::Stdin => load_from_stdin().map(Some),
        SubmissionSource::File(path) => load_from_file(path).map(Some),
        SubmissionSource::None => Ok(None),
    }
}

/// Collects a submission by asking for every data field of `schema`.
///
/// # Arguments
/// * `prompter` - Source of answers
/// * `schema` - Form being filled in
///
/// # Returns
/// * `Result<SubmissionRecord>` - Answers keyed by field key, in form order with multi-value fields last
///
/// # Errors
/// * `Error::PromptError` if the terminal interaction fails
pub fn collect_submission(
    prompter: &dyn Prompter,
    schema: &FormSchema,
) -> Result<SubmissionRecord> {
    collect_fields(prompter, schema.data_fields())
}

fn collect_fields(
    prompter: &dyn Prompter,
    fields: Vec<&FieldDescriptor>,
) -> Result<SubmissionRecord> {
    let mut submission = SubmissionRecord::new();
    let mut multi = MultiValueSet::for_fields(fields.iter().copied());
    for field in fields {
        let Some(key) = field.key() else {
            continue;
        };
        if let Some(rows) = multi.field_mut(key) {
            collect_multi(prompter, field.display_label(), rows)?;
            continue;
        }
        let value = collect_field(prompter, field)?;
        debug!("Collected {}", key);
        submission.insert(key.to_string(), value);
    }
    multi.apply_to(&mut submission);
    Ok(submission)
}

fn collect_field(prompter: &dyn Prompter, field: &FieldDescriptor) -> Result<Value> {
    let label = field.display_label();
    let value = match field.field_type {
        FieldType::RepeatingGroup => collect_rows(prompter, field)?,
        FieldType::Checkbox => Value::Bool(prompter.confirm(label, false)?),
        FieldType::Select => collect_choice(prompter, field)?,
        FieldType::SelectGroup => collect_group(prompter, field)?,
        FieldType::Survey => collect_survey(prompter, field)?,
        FieldType::Url => Value::String(collect_url(prompter, label)?),
        _ => Value::String(prompter.text(label, "")?),
    };
    Ok(value)
}

fn collect_choice(prompter: &dyn Prompter, field: &FieldDescriptor) -> Result<Value> {
    let options = field.options();
    if options.is_empty() {
        return Ok(Value::String(prompter.text(field.display_label(), "")?));
    }
    let labels: Vec<String> = options.iter().map(|choice| choice.label.clone()).collect();
    let index = prompter.select(field.display_label(), &labels)?;
    Ok(options
        .get(index)
        .map(|choice| Value::String(choice.value.clone()))
        .unwrap_or(Value::Null))
}

fn collect_group(prompter: &dyn Prompter, field: &FieldDescriptor) -> Result<Value> {
    let options = field.options();
    let labels: Vec<String> = options.iter().map(|choice| choice.label.clone()).collect();
    let checked = prompter.multi_select(field.display_label(), &labels)?;
    Ok(Value::Object(
        options
            .iter()
            .enumerate()
            .map(|(index, choice)| {
                let flag = checked.get(index).copied().unwrap_or(false);
                (choice.value.clone(), Value::Bool(flag))
            })
            .collect(),
    ))
}

fn collect_survey(prompter: &dyn Prompter, field: &FieldDescriptor) -> Result<Value> {
    let answers = field.survey_answers();
    let labels: Vec<String> = answers.iter().map(|choice| choice.label.clone()).collect();
    let mut result = Map::new();
    for question in field.survey_questions().into_iter().flatten() {
        let answer = if answers.is_empty() {
            prompter.text(&question.label, "")?
        } else {
            let index = prompter.select(&question.label, &labels)?;
            answers
                .get(index)
                .map(|choice| choice.value.clone())
                .unwrap_or_default()
        };
        result.insert(question.value, Value::String(answer));
    }
    Ok(Value::Object(result))
}

fn collect_url(prompter: &dyn Prompter, label: &str) -> Result<String> {
    loop {
        let answer = prompter.text(label, "")?;
        if answer.trim().is_empty() || Url::parse(answer.trim()).is_ok() {
            return Ok(answer);
        }
        warn!("'{}' is not a valid URL", answer);
    }
}

/// Asks for rows until declined. The hidden first row the builder keeps is
/// materialised empty so the expander can skip it.
fn collect_rows(prompter: &dyn Prompter, field: &FieldDescriptor) -> Result<Value> {
    let label = field.display_label();
    let row_fields = row_fields(field);
    let mut rows = vec![Value::Object(Map::new())];

    while prompter.confirm(&format!("Add a row to {}?", label), rows.len() == 1)? {
        let row = collect_fields(prompter, row_fields.clone())?;
        rows.push(Value::Object(row));
    }
    debug!("Collected {} rows for {}", rows.len() - 1, label);
    Ok(Value::Array(rows))
}

fn row_fields(group: &FieldDescriptor) -> Vec<&FieldDescriptor> {
    let mut fields = Vec::new();
    walk(group.children(), &mut |node| {
        if node.is_layout_transparent() {
            return Visit::Descend;
        }
        if node.field_type != FieldType::Button {
            fields.push(node);
        }
        Visit::Skip
    });
    fields
}

/// Fills the rows of a multi-value field until another value is declined.
fn collect_multi(prompter: &dyn Prompter, label: &str, rows: &mut MultiValueField) -> Result<()> {
    rows.set_value(0, prompter.text(label, "")?);
    while prompter.confirm(&format!("Add another value to {}?", label), false)? {
        let value = prompter.text(label, "")?;
        rows.add_row(value);
    }
    Ok(())
}

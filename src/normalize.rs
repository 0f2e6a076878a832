//! Submission normalization.
//! Flattens a raw submission into a record where every value a template can
//! reference sits under its own key. Composite values (checkbox groups,
//! surveys, single selects, multi-value fields) are recognised by shape and
//! expanded into derived keys; repeating-group rows are kept as they are.

use indexmap::IndexMap;
use log::{debug, warn};
use serde_json::{json, Map, Value};

use crate::constants::MULTI_VALUE_SEPARATOR;
use crate::error::Issue;
use crate::schema::{FieldDescriptor, FieldType, FormSchema, TextCase};
use crate::wildcard::{sanitize_option_token, survey_answer_key};

/// A raw submission: field key to submitted value.
pub type SubmissionRecord = Map<String, Value>;

/// Shape of a submitted value, decided once at the normalization boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionShape<'a> {
    /// Repeating-group rows
    Rows(&'a [Value]),
    /// Ordered values of an `isMulti` field
    MultiValue(Vec<String>),
    /// Checkbox group: option to checked flag
    SelectGroup(&'a Map<String, Value>),
    /// Select result carrying a `value`
    SingleSelect(&'a Value),
    /// Any other object, read as question to answer
    Survey(&'a Map<String, Value>),
    Scalar(&'a Value),
}

impl<'a> SubmissionShape<'a> {
    /// Classifies `value`, using the schema field when one is known.
    pub fn classify(value: &'a Value, field: Option<&FieldDescriptor>) -> Self {
        match value {
            Value::Array(items) => {
                let multi_leaf = field.is_some_and(|field| {
                    field.is_multi && field.field_type != FieldType::RepeatingGroup
                });
                if multi_leaf && items.iter().all(|item| !item.is_object() && !item.is_array()) {
                    SubmissionShape::MultiValue(
                        items
                            .iter()
                            .map(display_value)
                            .filter(|value| !value.trim().is_empty())
                            .collect(),
                    )
                } else {
                    SubmissionShape::Rows(items)
                }
            }
            Value::Object(object) => {
                if object.get("isMulti") == Some(&Value::Bool(true)) {
                    if let Some(Value::Array(values)) = object.get("values") {
                        return SubmissionShape::MultiValue(
                            values.iter().map(display_value).collect(),
                        );
                    }
                }
                if is_boolean_map(object) {
                    SubmissionShape::SelectGroup(object)
                } else if let Some(selected) = object.get("value") {
                    SubmissionShape::SingleSelect(selected)
                } else {
                    SubmissionShape::Survey(object)
                }
            }
            _ => SubmissionShape::Scalar(value),
        }
    }
}

/// A value in a normalized record.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedValue {
    Scalar(Value),
    Rows(Vec<Value>),
    Multi(Vec<String>),
    Composite(Map<String, Value>),
}

impl NormalizedValue {
    /// Text value.
    pub fn text(value: impl Into<String>) -> Self {
        NormalizedValue::Scalar(Value::String(value.into()))
    }

    /// Text substituted for a flat placeholder.
    pub fn display(&self) -> String {
        match self {
            NormalizedValue::Scalar(value) => display_value(value),
            NormalizedValue::Multi(values) => values
                .iter()
                .filter(|value| !value.is_empty())
                .cloned()
                .collect::<Vec<_>>()
                .join(MULTI_VALUE_SEPARATOR),
            NormalizedValue::Rows(_) | NormalizedValue::Composite(_) => String::new(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            NormalizedValue::Scalar(value) => value.clone(),
            NormalizedValue::Rows(rows) => Value::Array(rows.clone()),
            NormalizedValue::Multi(values) => json!({ "values": values, "isMulti": true }),
            NormalizedValue::Composite(object) => Value::Object(object.clone()),
        }
    }
}

/// Flat key to value map produced by [`normalize`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRecord {
    entries: IndexMap<String, NormalizedValue>,
}

impl NormalizedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a key; an overwritten key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: NormalizedValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&NormalizedValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Display text of `key`, `None` when the key is absent.
    pub fn display(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(NormalizedValue::display)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &NormalizedValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect(),
        )
    }
}

/// Text form of a submitted value.
///
/// Strings are verbatim, numbers and booleans use their JSON text, null is
/// empty. A select result shows its `value`, a checkbox group its checked
/// options, a multi-value object its values; other composites are empty.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .filter(|item| !item.is_empty())
            .collect::<Vec<_>>()
            .join(MULTI_VALUE_SEPARATOR),
        Value::Object(_) => match SubmissionShape::classify(value, None) {
            SubmissionShape::SingleSelect(selected) => display_value(selected),
            SubmissionShape::SelectGroup(options) => checked_options(options).join(" "),
            SubmissionShape::MultiValue(values) => values
                .into_iter()
                .filter(|value| !value.is_empty())
                .collect::<Vec<_>>()
                .join(MULTI_VALUE_SEPARATOR),
            _ => String::new(),
        },
    }
}

fn is_boolean_map(object: &Map<String, Value>) -> bool {
    !object.is_empty() && object.values().all(Value::is_boolean)
}

fn checked_options(options: &Map<String, Value>) -> Vec<String> {
    options
        .iter()
        .filter(|(_, checked)| checked.as_bool() == Some(true))
        .map(|(option, _)| option.clone())
        .collect()
}

/// Applies the field's own value rules: checkbox strings and text case.
fn apply_field_rules(value: &Value, field: Option<&FieldDescriptor>) -> Value {
    let Some(field) = field else {
        return value.clone();
    };
    match (value, field.field_type, field.case) {
        (Value::Bool(checked), FieldType::Checkbox, _) => {
            let (positive, negative) = field.checkbox_values();
            Value::String(if *checked { positive } else { negative }.to_string())
        }
        (Value::String(text), _, Some(case)) => Value::String(apply_case(text, case)),
        _ => value.clone(),
    }
}

/// Applies a text case transform.
pub fn apply_case(text: &str, case: TextCase) -> String {
    match case {
        TextCase::Autogrammar => {
            let mut chars = text.chars();
            match chars.next() {
                Some(first) => {
                    let rest = chars.as_str().to_lowercase();
                    first.to_uppercase().chain(rest.chars()).collect()
                }
                None => String::new(),
            }
        }
        TextCase::Uppercase => text.to_uppercase(),
        TextCase::Lowercase => text.to_lowercase(),
        TextCase::Mixed => text.to_string(),
    }
}

/// Normalizes a submission against its schema.
///
/// Every submitted key is kept. Checkbox groups replace their own value with
/// the space-joined checked options and add `KEY_option` per option; single
/// selects are replaced by their `value`; survey answers add `KEY_question`
/// and the numbered `KEY_<short question><n>`, where `n` is the question's
/// position in a declared survey. Rows are left untouched.
pub fn normalize(schema: &FormSchema, submission: &SubmissionRecord) -> NormalizedRecord {
    let mut record = NormalizedRecord::new();
    let mut derived: Vec<(String, NormalizedValue)> = Vec::new();

    for (key, raw) in submission {
        let field = schema.find_field(key);
        let value = apply_field_rules(raw, field);

        let normalized = match SubmissionShape::classify(&value, field) {
            SubmissionShape::Rows(rows) => NormalizedValue::Rows(rows.to_vec()),
            SubmissionShape::MultiValue(values) => NormalizedValue::Multi(values),
            SubmissionShape::Scalar(value) => NormalizedValue::Scalar(value.clone()),
            SubmissionShape::SingleSelect(selected) => NormalizedValue::Scalar(selected.clone()),
            SubmissionShape::SelectGroup(options) => {
                for (option, checked) in options {
                    let text = if checked.as_bool() == Some(true) {
                        option.as_str()
                    } else {
                        ""
                    };
                    derived.push((format!("{}_{}", key, option), NormalizedValue::text(text)));
                    let sanitized = sanitize_option_token(option);
                    if sanitized != *option {
                        derived.push((
                            format!("{}_{}", key, sanitized),
                            NormalizedValue::text(text),
                        ));
                    }
                }
                NormalizedValue::text(checked_options(options).join(" "))
            }
            SubmissionShape::Survey(answers) => {
                let declared = field.filter(|field| field.field_type == FieldType::Survey);
                if declared.is_none() {
                    debug!("{}", Issue::NormalizationAmbiguity { key: key.clone() });
                }
                // A declared survey numbers answers by question position, like its wildcards.
                let questions = declared
                    .map(|field| field.survey_questions())
                    .unwrap_or_default();
                for (index, (question, answer)) in answers.iter().enumerate() {
                    if answer.is_null() || answer.as_str() == Some("") {
                        continue;
                    }
                    let position = questions
                        .iter()
                        .position(|choice| {
                            choice.as_ref().is_some_and(|choice| choice.value == *question)
                        })
                        .unwrap_or(index);
                    derived.push((
                        format!("{}_{}", key, question),
                        NormalizedValue::Scalar(answer.clone()),
                    ));
                    derived.push((
                        survey_answer_key(key, question, position),
                        NormalizedValue::Scalar(answer.clone()),
                    ));
                }
                NormalizedValue::Composite(answers.clone())
            }
        };
        record.insert(key.clone(), normalized);
    }

    for (key, value) in derived {
        if submission.contains_key(&key) {
            warn!("Derived key {} overwrites a submitted value", key);
        }
        record.insert(key, value);
    }

    debug!(
        "Normalized {} submitted keys into {} keys",
        submission.len(),
        record.len()
    );
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_shapes() {
        let rows = json!([{"A": 1}]);
        assert!(matches!(SubmissionShape::classify(&rows, None), SubmissionShape::Rows(_)));

        let group = json!({"red": true, "blue": false});
        assert!(matches!(
            SubmissionShape::classify(&group, None),
            SubmissionShape::SelectGroup(_)
        ));

        let select = json!({"value": "x", "label": "X"});
        assert_eq!(
            SubmissionShape::classify(&select, None),
            SubmissionShape::SingleSelect(&json!("x"))
        );

        let multi = json!({"values": ["a", ""], "isMulti": true});
        assert_eq!(
            SubmissionShape::classify(&multi, None),
            SubmissionShape::MultiValue(vec!["a".to_string(), String::new()])
        );

        let empty = json!({});
        assert!(matches!(SubmissionShape::classify(&empty, None), SubmissionShape::Survey(_)));
    }

    #[test]
    fn test_array_on_multi_field_is_multi_value() {
        let mut field = FieldDescriptor::new(FieldType::Text, "TAG");
        field.is_multi = true;
        let value = json!(["a", "  ", "b"]);
        assert_eq!(
            SubmissionShape::classify(&value, Some(&field)),
            SubmissionShape::MultiValue(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_apply_case() {
        assert_eq!(apply_case("hELLO wORLD", TextCase::Autogrammar), "Hello world");
        assert_eq!(apply_case("", TextCase::Autogrammar), "");
        assert_eq!(apply_case("abc", TextCase::Uppercase), "ABC");
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!(null)), "");
        assert_eq!(display_value(&json!(3.5)), "3.5");
        assert_eq!(display_value(&json!(true)), "true");
        assert_eq!(display_value(&json!({"value": "v", "label": "V"})), "v");
        assert_eq!(display_value(&json!({"a": true, "b": false, "c": true})), "a c");
        assert_eq!(display_value(&json!({"q1": "yes"})), "");
    }
}

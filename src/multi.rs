//! Multi-value field controller.
//! An `isMulti` field holds an ordered list of rows. Rows are always numbered
//! 0..n without gaps, and collecting them yields the `{values, isMulti}`
//! shape the normalizer recognises.

use serde_json::{json, Value};

use crate::normalize::SubmissionRecord;
use crate::schema::{FieldDescriptor, FieldType, FormSchema};

/// One row of a multi-value field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiValueRow {
    pub position: usize,
    pub value: String,
}

/// Rows of one `isMulti` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiValueField {
    key: String,
    rows: Vec<MultiValueRow>,
}

impl MultiValueField {
    /// Creates a field with its first, always present row.
    pub fn new(key: impl Into<String>) -> Self {
        let mut field = Self {
            key: key.into(),
            rows: Vec::new(),
        };
        field.add_row("");
        field
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn rows(&self) -> &[MultiValueRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row and returns its position.
    pub fn add_row(&mut self, value: impl Into<String>) -> usize {
        let position = self.rows.len();
        self.rows.push(MultiValueRow {
            position,
            value: value.into(),
        });
        position
    }

    /// Removes the row at `position` and renumbers the rows after it.
    ///
    /// Returns the removed value, `None` when there is no such row.
    pub fn remove_row(&mut self, position: usize) -> Option<String> {
        if position >= self.rows.len() {
            return None;
        }
        let removed = self.rows.remove(position);
        for (position, row) in self.rows.iter_mut().enumerate().skip(position) {
            row.position = position;
        }
        Some(removed.value)
    }

    /// Sets the value of the row at `position`; returns false when there is no such row.
    pub fn set_value(&mut self, position: usize, value: impl Into<String>) -> bool {
        match self.rows.get_mut(position) {
            Some(row) => {
                row.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Row values in order.
    pub fn values(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.value.clone()).collect()
    }

    /// Serializes non-blank rows as `{values, isMulti: true}`; `None` if every row is blank.
    pub fn collect(&self) -> Option<Value> {
        let values: Vec<&str> = self
            .rows
            .iter()
            .map(|row| row.value.as_str())
            .filter(|value| !value.trim().is_empty())
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(json!({ "values": values, "isMulti": true }))
        }
    }
}

/// Controllers for every `isMulti` field of a schema.
#[derive(Debug, Clone, Default)]
pub struct MultiValueSet {
    fields: Vec<MultiValueField>,
}

impl MultiValueSet {
    pub fn for_schema(schema: &FormSchema) -> Self {
        Self::for_fields(schema.multi_fields())
    }

    /// Controllers for the `isMulti` leaf fields among `fields`.
    pub fn for_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = &'a FieldDescriptor>,
    {
        Self {
            fields: fields
                .into_iter()
                .filter(|field| field.is_multi && field.field_type != FieldType::RepeatingGroup)
                .filter_map(|field| field.key())
                .map(MultiValueField::new)
                .collect(),
        }
    }

    pub fn field(&self, key: &str) -> Option<&MultiValueField> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn field_mut(&mut self, key: &str) -> Option<&mut MultiValueField> {
        self.fields.iter_mut().find(|field| field.key == key)
    }

    /// Writes collected values into `submission`; fields with only blank rows are left alone.
    pub fn apply_to(&self, submission: &mut SubmissionRecord) {
        for field in &self.fields {
            if let Some(collected) = field.collect() {
                submission.insert(field.key.clone(), collected);
            }
        }
    }
}

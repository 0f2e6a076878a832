//! Form schema model.
//! A schema is an ordered tree of field descriptors as written by the form
//! builder. Layout nodes (columns, panels, tables) only group other nodes and
//! are transparent to everything that works on fields.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::constants::SUBMIT_KEY;

/// Type of a schema node, as named by the form builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum FieldType {
    #[serde(rename = "textfield", alias = "text")]
    Text,
    #[serde(rename = "textarea", alias = "multilineText")]
    MultilineText,
    #[serde(rename = "select")]
    Select,
    #[serde(rename = "checkbox", alias = "enhancedCheckbox")]
    Checkbox,
    #[serde(rename = "selectboxes", alias = "selectGroup")]
    SelectGroup,
    #[serde(rename = "survey")]
    Survey,
    #[serde(rename = "datetime", alias = "dateTime")]
    DateTime,
    #[serde(rename = "day", alias = "date")]
    Date,
    #[serde(rename = "time")]
    Time,
    #[serde(rename = "url")]
    Url,
    #[serde(rename = "datagrid", alias = "editgrid", alias = "repeatingGroup")]
    RepeatingGroup,
    #[serde(rename = "button", alias = "submitAction")]
    Button,
    #[serde(
        rename = "columns",
        alias = "panel",
        alias = "fieldset",
        alias = "well",
        alias = "container",
        alias = "table",
        alias = "tabs",
        alias = "content",
        alias = "htmlelement",
        alias = "layout"
    )]
    Layout,
    /// Any input type the engine has no special rules for
    #[default]
    #[serde(other)]
    Other,
}

/// Text case transform applied to a field's submitted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextCase {
    /// First letter uppercase, the rest lowercase
    Autogrammar,
    Uppercase,
    Lowercase,
    #[serde(other)]
    Mixed,
}

/// A group of nodes nested in a layout node (a column or a table cell).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Column {
    #[serde(default)]
    pub components: Vec<FieldDescriptor>,
}

/// Option list of a select field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectData {
    #[serde(default)]
    pub values: Vec<Value>,
}

/// A labelled value: a select option, a checkbox group option or a survey question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub value: String,
}

/// One node of the schema tree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Suppresses key regeneration when the label changes
    #[serde(default, rename = "uniqueKey", alias = "preserveKey")]
    pub preserve_key: bool,
    #[serde(default)]
    pub is_multi: bool,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub components: Vec<FieldDescriptor>,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Vec<Column>>,
    /// Checkbox group options, or the answer scale of a survey
    #[serde(default)]
    pub values: Vec<Value>,
    #[serde(default)]
    pub data: Option<SelectData>,
    #[serde(default)]
    pub questions: Vec<Value>,
    #[serde(default)]
    pub positive_value: Option<String>,
    #[serde(default)]
    pub negative_value: Option<String>,
    #[serde(default)]
    pub case: Option<TextCase>,
}

/// Root of a form schema.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormSchema {
    #[serde(default)]
    pub components: Vec<FieldDescriptor>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub display: String,
    #[serde(rename = "type", default)]
    pub schema_type: String,
}

/// Tree access shared by every walk over a schema.
pub trait SchemaNode {
    /// Nested nodes in document order.
    fn children(&self) -> Box<dyn Iterator<Item = &Self> + '_>;

    /// Whether the node only groups its children and has no data of its own.
    fn is_layout_transparent(&self) -> bool;
}

/// What a visitor wants done with the children of the node it just saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Descend,
    Skip,
}

/// Depth-first, pre-order walk over `nodes`.
pub fn walk<'a, N, I>(nodes: I, visitor: &mut dyn FnMut(&'a N) -> Visit)
where
    N: SchemaNode + 'a,
    I: IntoIterator<Item = &'a N>,
{
    for node in nodes {
        if visitor(node) == Visit::Descend {
            walk(node.children(), visitor);
        }
    }
}

impl SchemaNode for FieldDescriptor {
    fn children(&self) -> Box<dyn Iterator<Item = &Self> + '_> {
        Box::new(
            self.components
                .iter()
                .chain(self.columns.iter().flat_map(|column| column.components.iter()))
                .chain(
                    self.rows
                        .iter()
                        .flatten()
                        .flat_map(|cell| cell.components.iter()),
                ),
        )
    }

    fn is_layout_transparent(&self) -> bool {
        self.field_type == FieldType::Layout
    }
}

impl FieldDescriptor {
    /// Creates a node of the given type and key.
    pub fn new(field_type: FieldType, key: &str) -> Self {
        Self {
            key: Some(key.to_string()),
            field_type,
            ..Self::default()
        }
    }

    /// Adds a child node.
    pub fn with_child(mut self, child: FieldDescriptor) -> Self {
        self.components.push(child);
        self
    }

    /// The key, if the node has a non-empty one.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref().filter(|key| !key.is_empty())
    }

    /// The form's own submit button, excluded from every key and wildcard operation.
    pub fn is_submit_action(&self) -> bool {
        self.field_type == FieldType::Button
            && (self.action.as_deref() == Some("submit") || self.key() == Some(SUBMIT_KEY))
    }

    /// Options of a select or checkbox group, skipping entries without a value.
    pub fn options(&self) -> Vec<Choice> {
        let raw = match self.field_type {
            FieldType::Select => self.data.as_ref().map(|data| data.values.as_slice()),
            FieldType::SelectGroup => Some(self.values.as_slice()),
            _ => None,
        };
        raw.unwrap_or_default().iter().filter_map(to_choice).collect()
    }

    /// Survey questions in order; `None` marks a question without a usable value.
    pub fn survey_questions(&self) -> Vec<Option<Choice>> {
        self.questions.iter().map(to_choice).collect()
    }

    /// Answer scale of a survey.
    pub fn survey_answers(&self) -> Vec<Choice> {
        self.values.iter().filter_map(to_choice).collect()
    }

    /// Strings a checkbox submits when checked and unchecked.
    pub fn checkbox_values(&self) -> (&str, &str) {
        (
            self.positive_value.as_deref().unwrap_or("true"),
            self.negative_value.as_deref().unwrap_or("false"),
        )
    }

    /// Label used for prompts, falling back to the key.
    pub fn display_label(&self) -> &str {
        self.label
            .as_deref()
            .filter(|label| !label.trim().is_empty())
            .or(self.key())
            .unwrap_or_default()
    }
}

fn to_choice(value: &Value) -> Option<Choice> {
    let object = value.as_object()?;
    let value = match object.get("value")? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if value.is_empty() {
        return None;
    }
    let label = object
        .get("label")
        .and_then(Value::as_str)
        .unwrap_or(&value)
        .to_string();
    Some(Choice { label, value })
}

impl FormSchema {
    /// Builds a schema from top-level nodes.
    pub fn from_components(components: Vec<FieldDescriptor>) -> Self {
        Self {
            components,
            display: "form".to_string(),
            schema_type: "form".to_string(),
            ..Self::default()
        }
    }

    /// Finds a node anywhere in the tree by key.
    pub fn find_field(&self, key: &str) -> Option<&FieldDescriptor> {
        let mut found = None;
        walk(&self.components, &mut |node| {
            if found.is_some() {
                return Visit::Skip;
            }
            if node.key() == Some(key) {
                found = Some(node);
                return Visit::Skip;
            }
            Visit::Descend
        });
        found
    }

    /// Fields whose value lives at the top level of a submission: everything
    /// outside repeating groups, layout nodes excluded.
    pub fn data_fields(&self) -> Vec<&FieldDescriptor> {
        let mut fields = Vec::new();
        walk(&self.components, &mut |node| {
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

    /// Every field flagged `isMulti`, in document order.
    pub fn multi_fields(&self) -> Vec<&FieldDescriptor> {
        let mut fields = Vec::new();
        walk(&self.components, &mut |node| {
            if node.is_multi && node.key().is_some() {
                fields.push(node);
            }
            Visit::Descend
        });
        fields
    }

    /// Keys of fields that keep their key when relabelled.
    pub fn preserved_keys(&self) -> HashSet<String> {
        let mut keys = HashSet::new();
        walk(&self.components, &mut |node| {
            if node.preserve_key {
                if let Some(key) = node.key() {
                    keys.insert(key.to_string());
                }
            }
            Visit::Descend
        });
        keys
    }
}

//! Wildcard usage tracking for the template editor.
//! Keeps the wildcard inventory of the current schema, marks which tokens the
//! template text references, and gates saving on repeating-group usage.

use log::debug;

use crate::error::{Error, Result};
use crate::schema::FormSchema;
use crate::wildcard::{extract, Wildcard};

/// A wildcard and whether the current template references it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardEntry {
    pub wildcard: Wildcard,
    pub used: bool,
}

/// Wildcard inventory of one schema against one template text.
#[derive(Debug, Clone, Default)]
pub struct WildcardRegistry {
    entries: Vec<WildcardEntry>,
}

impl WildcardRegistry {
    /// Builds the inventory for `schema` and checks it against `template`.
    pub fn new(schema: &FormSchema, template: &str) -> Self {
        let mut registry = Self {
            entries: extract(&schema.components)
                .into_iter()
                .map(|wildcard| WildcardEntry {
                    wildcard,
                    used: false,
                })
                .collect(),
        };
        registry.update_template(template);
        registry
    }

    /// Replaces the inventory after a schema change, keeping the template check.
    pub fn update_schema(&mut self, schema: &FormSchema, template: &str) {
        *self = Self::new(schema, template);
    }

    /// Re-checks every wildcard against edited template text.
    pub fn update_template(&mut self, template: &str) {
        for entry in &mut self.entries {
            entry.used = template.contains(&entry.wildcard.placeholder());
        }
        debug!(
            "{} of {} wildcards used",
            self.entries.iter().filter(|entry| entry.used).count(),
            self.entries.len()
        );
    }

    pub fn entries(&self) -> &[WildcardEntry] {
        &self.entries
    }

    /// Whether `token` is in the inventory and referenced by the template.
    pub fn is_used(&self, token: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.used && entry.wildcard.token() == token)
    }

    /// Whether the schema has any repeating group.
    pub fn has_dataset_wildcards(&self) -> bool {
        self.entries.iter().any(|entry| entry.wildcard.is_dataset())
    }

    /// Repeating-group tokens missing from the template.
    pub fn unused_dataset_wildcards(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.wildcard.is_dataset() && !entry.used)
            .map(|entry| entry.wildcard.token())
            .collect()
    }

    /// True when every repeating-group token is referenced. Flat tokens never count.
    pub fn all_dataset_wildcards_used(&self) -> bool {
        self.unused_dataset_wildcards().is_empty()
    }

    /// Fails with `SaveBlocked` while a repeating-group token is unused.
    pub fn ensure_saveable(&self) -> Result<()> {
        let unused = self.unused_dataset_wildcards();
        if unused.is_empty() {
            Ok(())
        } else {
            Err(Error::SaveBlocked { unused })
        }
    }
}

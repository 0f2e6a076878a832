//! Placeholder key generation.
//! Every field gets a key derived from its label plus a session-unique suffix.
//! One `KeyGenerator` lives for one authoring session.

use std::collections::HashSet;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{FALLBACK_LABEL, KEY_SUFFIX_LEN};
use crate::schema::{walk, FieldDescriptor, FormSchema, Visit};

const SUFFIX_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// How a label is cleaned before it becomes a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyCase {
    /// Uppercased, `[A-Z0-9_]` only
    #[default]
    Upper,
    /// Case kept, `[A-Za-z0-9_]` only
    Preserve,
}

/// Session-scoped key generator.
pub struct KeyGenerator {
    case: KeyCase,
    counter: u64,
    rng: StdRng,
    issued: HashSet<String>,
    predefined: HashSet<String>,
}

impl KeyGenerator {
    /// Creates a generator seeded from the operating system.
    pub fn new(case: KeyCase) -> Self {
        Self::from_rng(case, 0, StdRng::from_entropy())
    }

    /// Creates a reproducible generator.
    ///
    /// # Arguments
    /// * `seed` - Seed of the random suffix
    /// * `counter_start` - Counter value before the first key; the first key uses `counter_start + 1`
    pub fn with_seed(case: KeyCase, seed: u64, counter_start: u64) -> Self {
        Self::from_rng(case, counter_start, StdRng::seed_from_u64(seed))
    }

    fn from_rng(case: KeyCase, counter: u64, rng: StdRng) -> Self {
        Self {
            case,
            counter,
            rng,
            issued: HashSet::new(),
            predefined: HashSet::new(),
        }
    }

    /// Registers the keys of a loaded schema.
    ///
    /// Keys already in the schema are never handed out again, and keys of
    /// preserved fields stay untouched by [`KeyGenerator::regenerate`].
    pub fn register_schema(&mut self, schema: &FormSchema) {
        self.predefined.extend(schema.preserved_keys());
        walk(&schema.components, &mut |node| {
            if let Some(key) = node.key() {
                self.issued.insert(key.to_string());
            }
            Visit::Descend
        });
    }

    /// Generates a new key for a label.
    ///
    /// A missing or blank label falls back to `FIELD`.
    pub fn generate_key(&mut self, label: Option<&str>) -> String {
        let raw = label
            .filter(|label| !label.trim().is_empty())
            .unwrap_or(FALLBACK_LABEL);
        let clean = clean_label(raw, self.case);

        loop {
            let key = format!("{}_{}", clean, self.unique_id());
            if self.issued.insert(key.clone()) {
                debug!("Generated key {} for label {:?}", key, raw);
                return key;
            }
        }
    }

    /// Regenerates a field's key from its label after an edit.
    ///
    /// Returns whether the key changed. Preserved fields, predefined keys and
    /// the submit action keep their key.
    pub fn regenerate(&mut self, field: &mut FieldDescriptor) -> bool {
        if field.is_submit_action() || field.preserve_key {
            return false;
        }
        if let Some(key) = field.key() {
            if self.predefined.contains(key) {
                return false;
            }
        }

        let label = field.label.clone().or_else(|| field.key.clone());
        let key = self.generate_key(label.as_deref());
        field.key = Some(key);
        true
    }

    fn unique_id(&mut self) -> String {
        self.counter += 1;
        let suffix: String = (0..KEY_SUFFIX_LEN)
            .map(|_| SUFFIX_ALPHABET[self.rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
            .collect();
        format!("{}{}", self.counter, suffix)
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        KeyGenerator::new(KeyCase::default())
    }
}

/// Cleans a label into the key alphabet.
pub fn clean_label(label: &str, case: KeyCase) -> String {
    let trimmed = label.trim();
    let cased = match case {
        KeyCase::Upper => trimmed.to_uppercase(),
        KeyCase::Preserve => trimmed.to_string(),
    };
    cased
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_label() {
        assert_eq!(clean_label("  First name! ", KeyCase::Upper), "FIRST_NAME");
        assert_eq!(clean_label("First name!", KeyCase::Preserve), "First_name");
        assert_eq!(clean_label("Größe", KeyCase::Upper), "GRSSE");
    }

    #[test]
    fn test_seeded_generators_agree() {
        let mut a = KeyGenerator::with_seed(KeyCase::Upper, 7, 0);
        let mut b = KeyGenerator::with_seed(KeyCase::Upper, 7, 0);
        assert_eq!(a.generate_key(Some("Name")), b.generate_key(Some("Name")));
    }

    #[test]
    fn test_counter_start() {
        let mut generator = KeyGenerator::with_seed(KeyCase::Upper, 1, 41);
        let key = generator.generate_key(Some("Age"));
        assert!(key.starts_with("AGE_42"), "{}", key);
        assert_eq!(key.len(), "AGE_42".len() + KEY_SUFFIX_LEN);
    }
}

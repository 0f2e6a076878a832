//! User input and interaction handling.
//! All terminal interaction goes through the [`Prompter`] trait so the
//! submission collector can be driven by a script in tests.

use dialoguer::{Confirm, Input, MultiSelect, Select};

use crate::error::{Error, Result};

/// Terminal questions asked while collecting a submission.
pub trait Prompter {
    /// Asks for free text, offering `default` when it is not empty.
    fn text(&self, label: &str, default: &str) -> Result<String>;

    /// Asks a yes/no question.
    fn confirm(&self, label: &str, default: bool) -> Result<bool>;

    /// Asks to pick one of `items`; returns the chosen index.
    fn select(&self, label: &str, items: &[String]) -> Result<usize>;

    /// Asks to pick any number of `items`; returns one flag per item.
    fn multi_select(&self, label: &str, items: &[String]) -> Result<Vec<bool>>;
}

/// [`Prompter`] backed by dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter {}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {}
    }
}

fn prompt_error(e: dialoguer::Error) -> Error {
    Error::PromptError(e.to_string())
}

impl Prompter for DialoguerPrompter {
    fn text(&self, label: &str, default: &str) -> Result<String> {
        let mut input = Input::<String>::new().with_prompt(label).allow_empty(true);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        input.interact_text().map_err(prompt_error)
    }

    fn confirm(&self, label: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(label)
            .default(default)
            .interact()
            .map_err(prompt_error)
    }

    fn select(&self, label: &str, items: &[String]) -> Result<usize> {
        Select::new()
            .with_prompt(label)
            .default(0)
            .items(items)
            .interact()
            .map_err(prompt_error)
    }

    fn multi_select(&self, label: &str, items: &[String]) -> Result<Vec<bool>> {
        let chosen = MultiSelect::new()
            .with_prompt(label)
            .items(items)
            .interact()
            .map_err(prompt_error)?;
        Ok((0..items.len()).map(|index| chosen.contains(&index)).collect())
    }
}

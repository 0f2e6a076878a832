use log::debug;

use crate::{
    config::FormDocument,
    expand::{RenderedOutput, TemplateRenderer},
    normalize::{normalize, NormalizedRecord, SubmissionRecord},
};

/// Turns submissions of one form document into rendered text.
pub struct Processor<'a> {
    renderer: &'a dyn TemplateRenderer,
    document: &'a FormDocument,
}

impl<'a> Processor<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer, document: &'a FormDocument) -> Self {
        Self { renderer, document }
    }

    /// Normalizes a submission against the document's schema.
    pub fn normalize(&self, submission: &SubmissionRecord) -> NormalizedRecord {
        normalize(&self.document.schema, submission)
    }

    /// Renders the content template and, when enabled, the title template.
    ///
    /// # Arguments
    /// * `submission` - Raw submission for the document's form
    ///
    /// # Returns
    /// * `RenderedOutput` - Rendered content and optional title
    pub fn process(&self, submission: &SubmissionRecord) -> RenderedOutput {
        let record = self.normalize(submission);
        debug!("Rendering '{}' with {} keys", self.document.name(), record.len());

        RenderedOutput {
            content: self.renderer.render(&self.document.template, &record),
            title: self
                .document
                .title_template()
                .map(|title| self.renderer.render(title, &record)),
        }
    }
}

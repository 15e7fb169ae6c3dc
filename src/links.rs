//! Confirmation step before leaving for an external source.

use crate::content::Source;

/// Holds the source a reader asked to visit until they confirm or cancel.
#[derive(Debug, Clone, Default)]
pub struct ExternalLinkPrompt {
    selected: Option<Source>,
}

impl ExternalLinkPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the confirmation for `source`, replacing any earlier selection.
    pub fn request(&mut self, source: Source) {
        log::debug!("Confirm visit to {}", source.source);
        self.selected = Some(source);
    }

    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    pub fn selected(&self) -> Option<&Source> {
        self.selected.as_ref()
    }

    /// Close the confirmation and return the URL to open in a new context.
    pub fn confirm(&mut self) -> Option<String> {
        self.selected.take().map(|source| source.source)
    }

    pub fn cancel(&mut self) {
        self.selected = None;
    }
}

//! Transient, dismissable user-visible notices.
//!
//! The crate never shows UI itself. Components report through a [`Notifier`]
//! and the host turns notices into toasts.

use std::fmt;

/// A short message with a one-line description, shown as a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn unsupported() -> Self {
        Self::new(
            "Text-to-speech not supported",
            "Your browser doesn't support this feature",
        )
    }

    pub fn no_content() -> Self {
        Self::new("No text to read", "This content appears to be empty")
    }

    pub fn speech_failed() -> Self {
        Self::new("Speech error", "Failed to read the content aloud")
    }

    pub fn copied(message: Option<&str>, text: &str) -> Self {
        Self::new(message.unwrap_or("Copied to clipboard"), text)
    }

    pub fn copy_failed() -> Self {
        Self::new("Failed to copy", "Please try again")
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// Sink for user-visible notices.
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn notify(&mut self, notice: Notice) {
        (**self).notify(notice)
    }
}

/// Writes notices to the `log` facade at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notice: Notice) {
        log::info!("{notice}");
    }
}

/// Collects notices until the host drains them into its toast queue.
#[derive(Debug, Clone, Default)]
pub struct NoticeLog {
    notices: Vec<Notice>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Take every pending notice, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl Notifier for NoticeLog {
    fn notify(&mut self, notice: Notice) {
        log::debug!("Queued notice: {notice}");
        self.notices.push(notice);
    }
}

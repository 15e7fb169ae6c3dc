//! Copy-to-clipboard with short-lived "copied" feedback.

use std::time::{Duration, Instant};

use crate::error::ClipboardError;
use crate::notice::{Notice, Notifier};

/// Platform clipboard.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Default time a copied value is shown as copied.
pub const DEFAULT_FEEDBACK: Duration = Duration::from_secs(1);

/// Copies text to a [`Clipboard`] and remembers the last copied value for
/// a short feedback window, so the UI can swap a copy icon for a check mark.
pub struct CopyFeedback<C: Clipboard, N: Notifier> {
    clipboard: C,
    notifier: N,
    feedback: Duration,
    copied: Option<(String, Instant)>,
}

impl<C: Clipboard, N: Notifier> CopyFeedback<C, N> {
    pub fn new(clipboard: C, notifier: N) -> Self {
        Self::with_feedback(clipboard, notifier, DEFAULT_FEEDBACK)
    }

    pub fn with_feedback(clipboard: C, notifier: N, feedback: Duration) -> Self {
        Self {
            clipboard,
            notifier,
            feedback,
            copied: None,
        }
    }

    pub fn copy(&mut self, text: &str, success_message: Option<&str>) -> Result<(), ClipboardError> {
        self.copy_at(text, success_message, Instant::now())
    }

    /// Copy `text`, treating `now` as the current time.
    ///
    /// On failure the previous feedback state is kept and a failure notice
    /// is emitted.
    pub fn copy_at(
        &mut self,
        text: &str,
        success_message: Option<&str>,
        now: Instant,
    ) -> Result<(), ClipboardError> {
        match self.clipboard.write_text(text) {
            Ok(()) => {
                self.copied = Some((text.to_string(), now + self.feedback));
                self.notifier.notify(Notice::copied(success_message, text));
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to copy: {e}");
                self.notifier.notify(Notice::copy_failed());
                Err(e)
            }
        }
    }

    pub fn copied_text(&self) -> Option<&str> {
        self.copied_text_at(Instant::now())
    }

    pub fn copied_text_at(&self, now: Instant) -> Option<&str> {
        self.copied
            .as_ref()
            .filter(|(_, expires)| now < *expires)
            .map(|(text, _)| text.as_str())
    }

    pub fn is_copied(&self, text: &str) -> bool {
        self.is_copied_at(text, Instant::now())
    }

    pub fn is_copied_at(&self, text: &str, now: Instant) -> bool {
        self.copied_text_at(now) == Some(text)
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeLog;

    #[derive(Default)]
    struct MemoryClipboard {
        contents: Option<String>,
        deny: bool,
    }

    impl Clipboard for MemoryClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.deny {
                return Err(ClipboardError::Denied("document not focused".to_string()));
            }
            self.contents = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn copied_state_expires_after_feedback_window() {
        let mut feedback = CopyFeedback::new(MemoryClipboard::default(), NoticeLog::new());
        let t0 = Instant::now();

        feedback
            .copy_at("https://www.gov.uk", Some("URL copied to clipboard"), t0)
            .unwrap();
        assert!(feedback.is_copied_at("https://www.gov.uk", t0 + Duration::from_millis(999)));
        assert!(!feedback.is_copied_at("https://other.example", t0));
        assert!(!feedback.is_copied_at("https://www.gov.uk", t0 + Duration::from_secs(1)));
        assert_eq!(
            feedback.notifier().notices(),
            [Notice::new("URL copied to clipboard", "https://www.gov.uk")]
        );
    }

    #[test]
    fn newer_copy_replaces_the_copied_value() {
        let mut feedback = CopyFeedback::new(MemoryClipboard::default(), NoticeLog::new());
        let t0 = Instant::now();

        feedback.copy_at("first", None, t0).unwrap();
        feedback.copy_at("second", None, t0).unwrap();
        assert_eq!(feedback.copied_text_at(t0), Some("second"));
        assert!(!feedback.is_copied_at("first", t0));
    }

    #[test]
    fn failed_copy_notifies_and_keeps_state() {
        let clipboard = MemoryClipboard {
            deny: true,
            ..Default::default()
        };
        let mut feedback = CopyFeedback::new(clipboard, NoticeLog::new());

        assert!(feedback.copy("text", None).is_err());
        assert_eq!(feedback.copied_text(), None);
        assert_eq!(feedback.notifier().notices(), [Notice::copy_failed()]);
    }
}

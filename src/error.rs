use std::path::PathBuf;

use crate::EngineErrorKind;

/// Outcome of a failed playback request or engine callback.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("Text-to-speech is not supported on this platform")]
    Unsupported,
    #[error("No readable text in the requested content")]
    NoContent,
    /// Expected consequence of an intentional cancel or supersession. Never shown to the user.
    #[error("Speech was cancelled ({0})")]
    Cancelled(EngineErrorKind),
    #[error("Speech engine failed: {0}")]
    EngineFailure(EngineErrorKind),
}

impl SpeechError {
    /// Whether this error is surfaced to the user as a notice.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::Cancelled(_))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ContentError {
    #[error("Content file not found at {0}")]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON data: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Incomplete configuration: {0}")]
    Builder(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("Clipboard is not available")]
    Unavailable,
    #[error("Clipboard write was denied: {0}")]
    Denied(String),
}

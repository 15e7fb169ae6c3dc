//! # readaloud
//!
//! A Rust library backing a reader for categorized, source-cited content,
//! with read-aloud playback driven by a platform speech engine.
//!
//! ## Features
//!
//! - **Playback control**: start, pause, resume and stop read-aloud of a content block
//! - **Citations**: resolve `<ref>ID</ref>` markers into cited and additional sources
//! - **Navigation**: table of contents and active-section tracking
//! - **Clipboard feedback**: copy source URLs with transient notices
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! readaloud = "2026.2"
//! ```
//!
//! ```ignore
//! use readaloud::{controller::PlaybackController, notice::LogNotifier};
//!
//! let mut controller = PlaybackController::new(my_engine, LogNotifier);
//! controller.request_speech("<p>Hello, world!</p>", 0)?;
//!
//! // Forward engine callbacks as they arrive on the UI thread.
//! controller.handle_event(event);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod clipboard;
pub mod config;
pub mod content;
pub mod controller;
pub mod error;
pub mod links;
pub mod notice;
pub mod text;
pub mod toc;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use config::{ControllerConfig, ReaderConfig, SpeechParams};
pub use controller::{ActiveRequest, PlaybackController, PlaybackState, Transition};
pub use error::SpeechError;
pub use notice::{Notice, Notifier};

/// Handle to one in-flight job owned by a [`SpeechEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(pub u64);

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "utterance#{}", self.0)
    }
}

/// Error kinds a speech engine can report for a job.
///
/// Names follow the Web Speech API `SpeechSynthesisErrorEvent.error` values;
/// anything else is carried verbatim in [`EngineErrorKind::Other`].
/// Serialized as the plain code string, so configuration can list any
/// platform code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EngineErrorKind {
    Canceled,
    Interrupted,
    AudioBusy,
    AudioHardware,
    Network,
    SynthesisUnavailable,
    SynthesisFailed,
    LanguageUnavailable,
    VoiceUnavailable,
    TextTooLong,
    InvalidArgument,
    NotAllowed,
    Other(String),
}

impl EngineErrorKind {
    /// Parse an engine-reported error code. Unknown codes map to `Other`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "canceled" => Self::Canceled,
            "interrupted" => Self::Interrupted,
            "audio-busy" => Self::AudioBusy,
            "audio-hardware" => Self::AudioHardware,
            "network" => Self::Network,
            "synthesis-unavailable" => Self::SynthesisUnavailable,
            "synthesis-failed" => Self::SynthesisFailed,
            "language-unavailable" => Self::LanguageUnavailable,
            "voice-unavailable" => Self::VoiceUnavailable,
            "text-too-long" => Self::TextTooLong,
            "invalid-argument" => Self::InvalidArgument,
            "not-allowed" => Self::NotAllowed,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Canceled => "canceled",
            Self::Interrupted => "interrupted",
            Self::AudioBusy => "audio-busy",
            Self::AudioHardware => "audio-hardware",
            Self::Network => "network",
            Self::SynthesisUnavailable => "synthesis-unavailable",
            Self::SynthesisFailed => "synthesis-failed",
            Self::LanguageUnavailable => "language-unavailable",
            Self::VoiceUnavailable => "voice-unavailable",
            Self::TextTooLong => "text-too-long",
            Self::InvalidArgument => "invalid-argument",
            Self::NotAllowed => "not-allowed",
            Self::Other(code) => code,
        }
    }
}

impl From<String> for EngineErrorKind {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<EngineErrorKind> for String {
    fn from(kind: EngineErrorKind) -> Self {
        match kind {
            EngineErrorKind::Other(code) => code,
            known => known.code().to_string(),
        }
    }
}

impl fmt::Display for EngineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Lifecycle notification for a job, as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEventKind {
    Started,
    Ended,
    Failed(EngineErrorKind),
}

/// A lifecycle notification tagged with the job it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineEvent {
    pub utterance: UtteranceId,
    pub kind: EngineEventKind,
}

impl EngineEvent {
    pub fn started(utterance: UtteranceId) -> Self {
        Self {
            utterance,
            kind: EngineEventKind::Started,
        }
    }

    pub fn ended(utterance: UtteranceId) -> Self {
        Self {
            utterance,
            kind: EngineEventKind::Ended,
        }
    }

    pub fn failed(utterance: UtteranceId, kind: EngineErrorKind) -> Self {
        Self {
            utterance,
            kind: EngineEventKind::Failed(kind),
        }
    }
}

/// Common interface for platform speech synthesis engines.
///
/// The engine owns the jobs; callers only hold [`UtteranceId`] handles.
/// Lifecycle notifications are not returned from these calls. The host
/// forwards them to [`PlaybackController::handle_event`] as they arrive on
/// the UI thread.
pub trait SpeechEngine {
    /// Whether speech synthesis is usable on this platform.
    fn is_available(&self) -> bool;

    /// Queue `text` for speaking with the given delivery parameters.
    fn speak(
        &mut self,
        text: &str,
        params: &SpeechParams,
    ) -> Result<UtteranceId, EngineErrorKind>;

    /// Pause the given job.
    fn pause(&mut self, utterance: UtteranceId);

    /// Resume the given job after a pause.
    fn resume(&mut self, utterance: UtteranceId);

    /// Cancel every queued and in-flight job.
    fn cancel(&mut self);
}

impl<E: SpeechEngine + ?Sized> SpeechEngine for Box<E> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn speak(
        &mut self,
        text: &str,
        params: &SpeechParams,
    ) -> Result<UtteranceId, EngineErrorKind> {
        (**self).speak(text, params)
    }

    fn pause(&mut self, utterance: UtteranceId) {
        (**self).pause(utterance)
    }

    fn resume(&mut self, utterance: UtteranceId) {
        (**self).resume(utterance)
    }

    fn cancel(&mut self) {
        (**self).cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::EngineErrorKind;

    #[test]
    fn error_codes_round_trip_through_known_kinds() {
        for code in ["canceled", "interrupted", "audio-busy", "not-allowed"] {
            assert_eq!(EngineErrorKind::from_code(code).code(), code);
        }
    }

    #[test]
    fn unknown_error_code_is_kept_verbatim() {
        assert_eq!(
            EngineErrorKind::from_code("mystery"),
            EngineErrorKind::Other("mystery".to_string())
        );
    }

    #[test]
    fn error_kinds_deserialize_from_plain_codes() {
        let kinds: Vec<EngineErrorKind> =
            serde_json::from_str(r#"["canceled", "audio-busy", "aborted"]"#).unwrap();
        assert_eq!(
            kinds,
            vec![
                EngineErrorKind::Canceled,
                EngineErrorKind::AudioBusy,
                EngineErrorKind::Other("aborted".to_string()),
            ]
        );
    }

    #[test]
    fn error_kinds_serialize_as_plain_codes() {
        let json = serde_json::to_string(&[
            EngineErrorKind::Interrupted,
            EngineErrorKind::Other("aborted".to_string()),
        ])
        .unwrap();
        assert_eq!(json, r#"["interrupted","aborted"]"#);
    }
}

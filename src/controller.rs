//! Read-aloud playback controller.
//!
//! The controller owns the playback state for one reader view and wraps a
//! platform [`SpeechEngine`]. Requests return immediately; the engine reports
//! job lifecycle later through [`PlaybackController::handle_event`].
//!
//! ```text
//!          request(i)             Started(job)
//!   Idle ──────────────▶ (pending) ───────────▶ Speaking ◀──┐
//!    ▲                                          │  request(i) │ request(i)
//!    │  stop / Ended / Failed                   ▼            │
//!    └───────────────────────────────────────  Paused ───────┘
//! ```
//!
//! Requesting a different block while one is playing cancels the current job
//! and returns to idle until the new job starts. The current job's handle is
//! its only observer: it is dropped before the engine is told to cancel, so
//! a cancel-induced error from that job never reaches the user. Events from
//! jobs other than the current one are ignored.

use serde::Serialize;

use crate::config::ControllerConfig;
use crate::error::SpeechError;
use crate::notice::{Notice, Notifier};
use crate::text::extract_text;
use crate::{EngineErrorKind, EngineEvent, EngineEventKind, SpeechEngine, UtteranceId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    #[default]
    Idle,
    Speaking,
    Paused,
}

/// The content block associated with the playing job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRequest {
    /// Position of the block in the rendered content list.
    pub content_index: usize,
    /// Markup of the block as passed to [`PlaybackController::request_speech`].
    pub raw_text: String,
}

/// What a successful [`PlaybackController::request_speech`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Paused,
    Resumed,
    /// A new job was handed to the engine. State stays idle until it starts.
    Pending(UtteranceId),
}

/// The current engine job. Holding it is what observes its callbacks:
/// once taken out of the controller, nothing it reports is acted on.
#[derive(Debug)]
struct Job {
    utterance: UtteranceId,
    request: ActiveRequest,
}

pub struct PlaybackController<E: SpeechEngine, N: Notifier> {
    engine: E,
    notifier: N,
    config: ControllerConfig,
    state: PlaybackState,
    active: Option<ActiveRequest>,
    job: Option<Job>,
}

impl<E: SpeechEngine, N: Notifier> PlaybackController<E, N> {
    pub fn new(engine: E, notifier: N) -> Self {
        Self::with_config(engine, notifier, ControllerConfig::default())
    }

    pub fn with_config(engine: E, notifier: N, config: ControllerConfig) -> Self {
        Self {
            engine,
            notifier,
            config,
            state: PlaybackState::Idle,
            active: None,
            job: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn active_request(&self) -> Option<&ActiveRequest> {
        self.active.as_ref()
    }

    /// Index of the block being spoken or paused, if any.
    pub fn speaking_index(&self) -> Option<usize> {
        self.active.as_ref().map(|request| request.content_index)
    }

    /// The job handed to the engine that has not reported its start yet.
    pub fn pending_utterance(&self) -> Option<UtteranceId> {
        match (&self.job, self.state) {
            (Some(job), PlaybackState::Idle) => Some(job.utterance),
            _ => None,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Toggle or start read-aloud of the block at `index`.
    ///
    /// Speaking the same block pauses it, and a paused block resumes.
    /// Anything else cancels the current job and hands the block's visible
    /// text to the engine. Errors are reported to the notifier before they
    /// are returned. `Unsupported` and `NoContent` leave the state untouched.
    pub fn request_speech(&mut self, html: &str, index: usize) -> Result<Transition, SpeechError> {
        if !self.engine.is_available() {
            log::warn!("Speech requested for block {index} but no engine is available");
            return Err(self.report(SpeechError::Unsupported));
        }

        let current = self
            .job
            .as_ref()
            .map(|job| job.utterance)
            .filter(|_| self.speaking_index() == Some(index));
        if let Some(utterance) = current {
            match self.state {
                PlaybackState::Speaking => {
                    self.engine.pause(utterance);
                    self.state = PlaybackState::Paused;
                    log::debug!("Paused {utterance} (block {index})");
                    self.check_invariant();
                    return Ok(Transition::Paused);
                }
                PlaybackState::Paused => {
                    self.engine.resume(utterance);
                    self.state = PlaybackState::Speaking;
                    log::debug!("Resumed {utterance} (block {index})");
                    self.check_invariant();
                    return Ok(Transition::Resumed);
                }
                PlaybackState::Idle => {}
            }
        }

        let text = extract_text(html);
        if text.is_empty() {
            log::debug!("Block {index} has no readable text");
            return Err(self.report(SpeechError::NoContent));
        }

        self.halt();

        let utterance = match self.engine.speak(&text, &self.config.params) {
            Ok(utterance) => utterance,
            Err(kind) => {
                log::error!("Speech engine refused block {index}: {kind}");
                let error = self.classify(kind);
                return Err(self.report(error));
            }
        };

        log::debug!(
            "Queued {utterance} for block {index} ({} chars)",
            text.chars().count()
        );
        self.job = Some(Job {
            utterance,
            request: ActiveRequest {
                content_index: index,
                raw_text: html.to_string(),
            },
        });
        self.check_invariant();
        Ok(Transition::Pending(utterance))
    }

    /// Stop playback from any state. A no-op when nothing is playing or pending.
    pub fn stop_speech(&mut self) {
        if self.job.is_none() && self.state == PlaybackState::Idle {
            return;
        }
        self.halt();
        log::debug!("Speech stopped");
    }

    /// Apply a lifecycle notification from the engine.
    ///
    /// Returns the error the notification carried, if any. Notifications for
    /// jobs that are no longer current are ignored and return `None`.
    pub fn handle_event(&mut self, event: EngineEvent) -> Option<SpeechError> {
        let request = match self.job.as_ref() {
            Some(job) if job.utterance == event.utterance => job.request.clone(),
            _ => {
                log::debug!("Ignoring {:?} from stale {}", event.kind, event.utterance);
                return None;
            }
        };

        match event.kind {
            EngineEventKind::Started => {
                if self.state == PlaybackState::Idle {
                    log::debug!("{} started (block {})", event.utterance, request.content_index);
                    self.state = PlaybackState::Speaking;
                    self.active = Some(request);
                }
                self.check_invariant();
                None
            }
            EngineEventKind::Ended => {
                log::debug!("{} ended", event.utterance);
                self.job = None;
                self.set_idle();
                None
            }
            EngineEventKind::Failed(kind) => {
                self.job = None;
                self.set_idle();
                let error = self.classify(kind);
                if error.is_user_visible() {
                    log::error!("Speech synthesis error on {}: {error}", event.utterance);
                } else {
                    log::debug!("{} {error}", event.utterance);
                }
                Some(self.report(error))
            }
        }
    }

    fn classify(&self, kind: EngineErrorKind) -> SpeechError {
        if self.config.is_suppressed(&kind) {
            SpeechError::Cancelled(kind)
        } else {
            SpeechError::EngineFailure(kind)
        }
    }

    fn report(&mut self, error: SpeechError) -> SpeechError {
        let notice = match &error {
            SpeechError::Unsupported => Some(Notice::unsupported()),
            SpeechError::NoContent => Some(Notice::no_content()),
            SpeechError::EngineFailure(_) => Some(Notice::speech_failed()),
            SpeechError::Cancelled(_) => None,
        };
        if let Some(notice) = notice {
            self.notifier.notify(notice);
        }
        error
    }

    /// Detach the current job, then cancel it, and reset to idle.
    ///
    /// The job is taken before `cancel` so that any error the cancellation
    /// provokes arrives for a handle that is no longer current.
    fn halt(&mut self) {
        if let Some(job) = self.job.take() {
            self.engine.cancel();
            log::debug!("Cancelled {}", job.utterance);
        }
        self.set_idle();
    }

    fn set_idle(&mut self) {
        self.state = PlaybackState::Idle;
        self.active = None;
        self.check_invariant();
    }

    fn check_invariant(&self) {
        debug_assert_eq!(
            self.active.is_some(),
            self.state != PlaybackState::Idle,
            "active request must exist exactly when not idle"
        );
    }
}

impl<E: SpeechEngine, N: Notifier> Drop for PlaybackController<E, N> {
    fn drop(&mut self) {
        if self.job.is_some() {
            self.halt();
        }
    }
}

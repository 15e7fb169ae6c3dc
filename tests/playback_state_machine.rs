//! Integration tests for the `PlaybackController` state machine.
//!
//! A scripted engine records every call and lets the test decide when (and
//! whether) lifecycle callbacks arrive, including callbacks from jobs that
//! were already cancelled.
//!
//! # What is tested
//!
//! - Supersession cancels the old job and waits for the new one to start
//! - Late callbacks from cancelled jobs never surface notices or change state
//! - `stop_speech` from every state
//! - The active-request invariant across a long mixed sequence of calls

use readaloud::{
    notice::NoticeLog, EngineErrorKind, EngineEvent, Notice, PlaybackController, PlaybackState,
    SpeechEngine, SpeechError, SpeechParams, Transition, UtteranceId,
};

// ── Scripted engine ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Speak(String),
    Pause(UtteranceId),
    Resume(UtteranceId),
    Cancel,
}

#[derive(Debug, Default)]
struct ScriptedEngine {
    next_id: u64,
    calls: Vec<Call>,
}

impl SpeechEngine for ScriptedEngine {
    fn is_available(&self) -> bool {
        true
    }

    fn speak(&mut self, text: &str, params: &SpeechParams) -> Result<UtteranceId, EngineErrorKind> {
        assert_eq!(params, &SpeechParams::default());
        self.next_id += 1;
        self.calls.push(Call::Speak(text.to_string()));
        Ok(UtteranceId(self.next_id))
    }

    fn pause(&mut self, utterance: UtteranceId) {
        self.calls.push(Call::Pause(utterance));
    }

    fn resume(&mut self, utterance: UtteranceId) {
        self.calls.push(Call::Resume(utterance));
    }

    fn cancel(&mut self) {
        self.calls.push(Call::Cancel);
    }
}

type Controller = PlaybackController<ScriptedEngine, NoticeLog>;

// ── Helpers ────────────────────────────────────────────────────────

fn controller() -> Controller {
    PlaybackController::new(ScriptedEngine::default(), NoticeLog::new())
}

fn assert_invariant(c: &Controller) {
    assert_eq!(
        c.active_request().is_some(),
        c.state() != PlaybackState::Idle,
        "active request present iff not idle (state {:?})",
        c.state()
    );
}

fn request(c: &mut Controller, html: &str, index: usize) -> UtteranceId {
    match c.request_speech(html, index) {
        Ok(Transition::Pending(id)) => id,
        other => panic!("expected a pending job, got {other:?}"),
    }
}

fn block(index: usize) -> String {
    format!("<p>Block number {index}</p>")
}

// ── Tests ──────────────────────────────────────────────────────────

#[test]
fn superseding_cancels_then_waits_for_new_start() {
    let mut c = controller();
    let first = request(&mut c, &block(0), 0);
    c.handle_event(EngineEvent::started(first));
    assert_eq!(c.speaking_index(), Some(0));

    let second = request(&mut c, &block(1), 1);
    assert_ne!(first, second);
    assert_eq!(c.state(), PlaybackState::Idle);
    assert!(c.active_request().is_none());
    assert_eq!(
        c.engine().calls,
        vec![
            Call::Speak("Block number 0".to_string()),
            Call::Cancel,
            Call::Speak("Block number 1".to_string()),
        ]
    );

    c.handle_event(EngineEvent::started(second));
    assert_eq!(c.state(), PlaybackState::Speaking);
    assert_eq!(c.speaking_index(), Some(1));
}

#[test]
fn late_cancel_error_from_superseded_job_is_ignored() {
    let mut c = controller();
    let first = request(&mut c, &block(0), 0);
    c.handle_event(EngineEvent::started(first));
    let second = request(&mut c, &block(1), 1);
    c.handle_event(EngineEvent::started(second));

    // The cancelled job reports its interruption after the new one started.
    for kind in [
        EngineErrorKind::Canceled,
        EngineErrorKind::Interrupted,
        EngineErrorKind::SynthesisFailed,
    ] {
        assert_eq!(c.handle_event(EngineEvent::failed(first, kind)), None);
    }
    assert_eq!(c.handle_event(EngineEvent::ended(first)), None);

    assert_eq!(c.state(), PlaybackState::Speaking);
    assert_eq!(c.speaking_index(), Some(1));
    assert!(c.notifier().is_empty());
}

#[test]
fn late_start_from_superseded_job_does_not_claim_playback() {
    let mut c = controller();
    let first = request(&mut c, &block(0), 0);
    let second = request(&mut c, &block(1), 1);

    c.handle_event(EngineEvent::started(first));
    assert_eq!(c.state(), PlaybackState::Idle);
    assert_eq!(c.pending_utterance(), Some(second));

    c.handle_event(EngineEvent::started(second));
    assert_eq!(c.speaking_index(), Some(1));
}

#[test]
fn late_error_after_stop_is_ignored() {
    let mut c = controller();
    let id = request(&mut c, &block(2), 2);
    c.handle_event(EngineEvent::started(id));

    c.stop_speech();
    assert_eq!(c.state(), PlaybackState::Idle);

    assert_eq!(
        c.handle_event(EngineEvent::failed(id, EngineErrorKind::AudioBusy)),
        None
    );
    assert_eq!(c.state(), PlaybackState::Idle);
    assert!(c.notifier().is_empty());
}

#[test]
fn stop_while_pending_drops_the_job() {
    let mut c = controller();
    let id = request(&mut c, &block(0), 0);
    c.stop_speech();
    assert!(c.pending_utterance().is_none());

    c.handle_event(EngineEvent::started(id));
    assert_eq!(c.state(), PlaybackState::Idle);
    assert_eq!(c.engine().calls.last(), Some(&Call::Cancel));
}

#[test]
fn repeated_stop_cancels_once() {
    let mut c = controller();
    let id = request(&mut c, &block(0), 0);
    c.handle_event(EngineEvent::started(id));

    c.stop_speech();
    c.stop_speech();
    let cancels = c
        .engine()
        .calls
        .iter()
        .filter(|call| **call == Call::Cancel)
        .count();
    assert_eq!(cancels, 1);
}

#[test]
fn same_index_while_pending_restarts() {
    let mut c = controller();
    let first = request(&mut c, &block(0), 0);
    let second = request(&mut c, &block(0), 0);
    assert_ne!(first, second);
    assert_eq!(c.pending_utterance(), Some(second));
}

#[test]
fn genuine_failure_during_playback_notifies_once() {
    let mut c = controller();
    let id = request(&mut c, &block(0), 0);
    c.handle_event(EngineEvent::started(id));
    c.request_speech(&block(0), 0).unwrap();
    assert_eq!(c.state(), PlaybackState::Paused);

    let error = c.handle_event(EngineEvent::failed(id, EngineErrorKind::Network));
    assert_eq!(error, Some(SpeechError::EngineFailure(EngineErrorKind::Network)));
    assert_eq!(c.handle_event(EngineEvent::ended(id)), None);

    assert_eq!(c.state(), PlaybackState::Idle);
    assert_eq!(c.notifier().notices(), [Notice::speech_failed()]);
}

#[test]
fn invariant_holds_across_mixed_sequence() {
    let mut c = controller();
    let mut last = None;

    // Deterministic walk over requests, starts, ends, errors and stops.
    for step in 0..200usize {
        match step % 7 {
            0 | 3 => {
                let index = (step / 7) % 3;
                if let Ok(Transition::Pending(id)) = c.request_speech(&block(index), index) {
                    last = Some(id);
                }
            }
            1 | 4 => {
                if let Some(id) = last {
                    c.handle_event(EngineEvent::started(id));
                }
            }
            2 => {
                if let Some(id) = last {
                    c.handle_event(EngineEvent::failed(id, EngineErrorKind::Interrupted));
                }
            }
            5 => c.stop_speech(),
            _ => {
                if let Some(id) = last {
                    c.handle_event(EngineEvent::ended(id));
                }
            }
        }
        assert_invariant(&c);
    }

    assert!(c.notifier().is_empty());
}

//! Integration tests for the `SynthesisJobController` state machine.
//!
//! These tests drive the controller through its transitions on a
//! `ManualScheduler`, so virtual time is advanced explicitly and no test
//! sleeps. Completed results are fed into a `HistoryLog` the way a
//! presentation layer would.
//!
//! # What is tested
//!
//! - A valid submit walks Idle → Validating → Pending → Completed
//! - Double submission is rejected until acknowledgment or cancellation
//! - Empty text is rejected and leaves the controller idle
//! - Cancel returns to Idle synchronously; a late completion is ignored
//! - Progress ticks arrive in order before the completion
//! - Timeout and backend failures land in Failed

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use voxforge_core::{
    HistoryLog, JobState, ParameterSet, RequestDefect, SubmissionError, SynthesisError,
    SynthesisEvent, SynthesisRequest, estimate_duration_seconds,
};
use voxforge_studio::{
    ControllerConfig, ManualScheduler, ScriptedBackend, SimulatedBackend, SynthesisJobController,
};

// ── Helpers ────────────────────────────────────────────────────────

struct Harness {
    controller: SynthesisJobController,
    events: UnboundedReceiver<SynthesisEvent>,
    scheduler: ManualScheduler,
    history: HistoryLog,
}

impl Harness {
    fn new() -> Self {
        Self::with(
            ControllerConfig::default(),
            ManualScheduler::new(),
            Arc::new(SimulatedBackend::new()),
        )
    }

    fn with(
        config: ControllerConfig,
        scheduler: ManualScheduler,
        backend: Arc<dyn voxforge_core::SynthesisBackend>,
    ) -> Self {
        let (controller, events) =
            SynthesisJobController::new(config, Box::new(scheduler.clone()), backend);
        Self {
            controller,
            events,
            scheduler,
            history: HistoryLog::new(),
        }
    }

    /// Advance virtual time, deliver due tickets and record completions.
    fn advance(&mut self, by: Duration) -> Vec<SynthesisEvent> {
        for ticket in self.scheduler.advance(by) {
            self.controller.fire(ticket);
        }
        let events = drain_events(&mut self.events);
        for event in &events {
            self.history.record(event);
        }
        events
    }
}

fn request(text: &str, voice: &str) -> SynthesisRequest {
    SynthesisRequest::new(text, ParameterSet::for_voice(voice))
}

/// Drain all pending events from the event receiver and return them.
fn drain_events(rx: &mut UnboundedReceiver<SynthesisEvent>) -> Vec<SynthesisEvent> {
    let mut events = Vec::new();
    while let Ok(e) = rx.try_recv() {
        events.push(e);
    }
    events
}

/// Collect only the `JobState` values from `StateChanged` events.
fn states_from(events: &[SynthesisEvent]) -> Vec<JobState> {
    events
        .iter()
        .filter_map(|e| {
            if let SynthesisEvent::StateChanged(s) = e {
                Some(*s)
            } else {
                None
            }
        })
        .collect()
}

fn progress_from(events: &[SynthesisEvent]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|e| match e {
            SynthesisEvent::Progress { percent, .. } => Some(*percent),
            _ => None,
        })
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────────

#[test]
fn hello_world_round_trip() {
    let mut h = Harness::new();

    h.controller.submit(request("Hello world", "v1")).unwrap();
    assert_eq!(h.controller.state(), JobState::Pending);
    let submitted = drain_events(&mut h.events);
    assert_eq!(
        states_from(&submitted),
        vec![JobState::Validating, JobState::Pending]
    );

    let events = h.advance(Duration::from_secs(2));
    assert_eq!(states_from(&events), vec![JobState::Completed]);
    assert_eq!(h.controller.state(), JobState::Completed);

    assert_eq!(h.history.len(), 1);
    let result = h.history.get(0).unwrap();
    assert_eq!(result.duration_estimate_seconds, 1);
    assert_eq!(result.source_request.text(), "Hello world");
    assert!(result.source_request.submitted_at().is_some());
}

#[test]
fn no_second_submit_until_acknowledged() {
    let mut h = Harness::new();
    h.controller.submit(request("First", "v1")).unwrap();

    assert_eq!(
        h.controller.submit(request("Second", "v1")),
        Err(SubmissionError::AlreadyInProgress)
    );

    h.advance(Duration::from_secs(2));
    assert_eq!(
        h.controller.submit(request("Second", "v1")),
        Err(SubmissionError::AlreadyInProgress)
    );

    assert!(h.controller.acknowledge());
    assert!(h.controller.submit(request("Second", "v1")).is_ok());
}

#[test]
fn submit_a_then_b_records_only_a() {
    let mut h = Harness::new();
    h.controller.submit(request("Request A", "v1")).unwrap();
    assert_eq!(
        h.controller.submit(request("Request B", "v1")),
        Err(SubmissionError::AlreadyInProgress)
    );

    h.advance(Duration::from_secs(5));

    let texts: Vec<_> = h.history.list().map(|r| r.source_request.text().to_string()).collect();
    assert_eq!(texts, vec!["Request A"]);
}

#[test]
fn empty_text_is_rejected_and_controller_stays_idle() {
    let mut h = Harness::new();

    for text in ["", "   \n\t"] {
        assert_eq!(
            h.controller.submit(request(text, "v1")),
            Err(SubmissionError::InvalidRequest {
                reason: RequestDefect::EmptyText
            })
        );
        assert_eq!(h.controller.state(), JobState::Idle);
    }

    assert_eq!(
        h.controller.submit(request("Hi", "")),
        Err(SubmissionError::InvalidRequest {
            reason: RequestDefect::MissingVoice
        })
    );
    assert!(drain_events(&mut h.events).is_empty());
}

#[test]
fn cancel_reaches_idle_synchronously() {
    let mut h = Harness::new();
    h.controller.submit(request("Hello", "v1")).unwrap();
    drain_events(&mut h.events);

    assert!(h.controller.cancel());
    assert_eq!(h.controller.state(), JobState::Idle);

    let events = drain_events(&mut h.events);
    assert_eq!(states_from(&events), vec![JobState::Idle]);
    assert!(matches!(events.last(), Some(SynthesisEvent::Cancelled { job: 1 })));

    // A fresh submit is accepted straight away.
    assert!(h.controller.submit(request("Again", "v1")).is_ok());
}

#[test]
fn stale_completion_after_cancel_is_ignored() {
    let scheduler = ManualScheduler::new().ignore_cancellations();
    let mut h = Harness::with(
        ControllerConfig::default(),
        scheduler,
        Arc::new(SimulatedBackend::new()),
    );

    h.controller.submit(request("Hello", "v1")).unwrap();
    h.advance(Duration::from_millis(500));
    assert!(h.controller.cancel());
    drain_events(&mut h.events);

    // The old job's completion ticket is still queued and now arrives.
    let stale = h.scheduler.advance(Duration::from_secs(5));
    assert!(!stale.is_empty());
    for ticket in stale {
        assert!(!h.controller.fire(ticket));
    }

    assert_eq!(h.controller.state(), JobState::Idle);
    assert!(drain_events(&mut h.events).is_empty());
    assert!(h.history.is_empty());
}

#[test]
fn stale_completion_does_not_finish_the_next_job() {
    let scheduler = ManualScheduler::new().ignore_cancellations();
    let mut h = Harness::with(
        ControllerConfig::default(),
        scheduler,
        Arc::new(SimulatedBackend::new()),
    );

    h.controller.submit(request("Old", "v1")).unwrap();
    h.advance(Duration::from_millis(1500));
    h.controller.cancel();
    h.controller.submit(request("New", "v1")).unwrap();

    // Old completion falls due 500 ms later; the new job is still pending.
    h.advance(Duration::from_millis(500));
    assert_eq!(h.controller.state(), JobState::Pending);
    assert!(h.history.is_empty());

    h.advance(Duration::from_millis(1500));
    assert_eq!(h.controller.state(), JobState::Completed);
    assert_eq!(h.history.len(), 1);
    assert_eq!(h.history.get(0).unwrap().source_request.text(), "New");
}

#[test]
fn progress_ticks_precede_completion() {
    let mut h = Harness::new();
    h.controller.submit(request("Hello", "v1")).unwrap();
    drain_events(&mut h.events);

    let mut events = Vec::new();
    for _ in 0..5 {
        events.extend(h.advance(Duration::from_millis(400)));
    }

    assert_eq!(progress_from(&events), vec![20, 40, 60, 80, 100]);
    assert!(matches!(events.last(), Some(SynthesisEvent::Completed { .. })));
}

#[test]
fn timeout_fails_pending_job() {
    let config = ControllerConfig {
        latency: Duration::from_secs(10),
        timeout: Some(Duration::from_secs(3)),
        progress_steps: 0,
        auto_acknowledge: false,
    };
    let mut h = Harness::with(config, ManualScheduler::new(), Arc::new(SimulatedBackend::new()));
    h.controller.submit(request("Slow", "v1")).unwrap();

    let events = h.advance(Duration::from_secs(3));
    assert_eq!(h.controller.state(), JobState::Failed);
    assert!(events.iter().any(|e| matches!(
        e,
        SynthesisEvent::Failed {
            error: SynthesisError::Timeout { .. },
            ..
        }
    )));

    // The completion never arrives for a timed-out job.
    h.advance(Duration::from_secs(10));
    assert!(h.history.is_empty());
}

#[test]
fn scripted_failure_requires_acknowledgment() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .then_fail(SynthesisError::VoiceUnavailable { voice_id: "v1".into() })
            .then_succeed("retry.mp3"),
    );
    let mut h = Harness::with(ControllerConfig::default(), ManualScheduler::new(), backend.clone());

    h.controller.submit(request("Hello", "v1")).unwrap();
    h.advance(Duration::from_secs(2));
    assert_eq!(h.controller.state(), JobState::Failed);
    assert!(matches!(
        h.controller.outcome(),
        Some(Err(SynthesisError::VoiceUnavailable { .. }))
    ));
    assert!(h.history.is_empty());

    h.controller.acknowledge();
    h.controller.submit(request("Hello", "v1")).unwrap();
    h.advance(Duration::from_secs(2));

    assert_eq!(backend.calls(), 2);
    assert_eq!(h.history.get(0).unwrap().audio_ref.as_str(), "retry.mp3");
}

#[test]
fn submitted_snapshot_is_owned() {
    let mut h = Harness::new();
    let mut text = String::from("Original text");
    h.controller
        .submit(SynthesisRequest::new(text.clone(), ParameterSet::for_voice("v1")))
        .unwrap();
    text.push_str(" edited later");

    h.advance(Duration::from_secs(2));
    assert_eq!(h.history.get(0).unwrap().source_request.text(), "Original text");
}

#[test]
fn duration_estimate_is_stable() {
    let text = "a".repeat(150);
    assert_eq!(estimate_duration_seconds(&text), 10);
    assert_eq!(estimate_duration_seconds(&text), 10);
    assert_eq!(estimate_duration_seconds(&"a".repeat(151)), 11);
}

//! Synthesis job controller: one request in flight, simulated latency.
//!
//! ```text
//!   Idle → Validating → Pending ──(complete)──→ Completed ─┐
//!    ▲                    │    └──(fail/timeout)→ Failed ──┤
//!    │                    └──(cancel)───────────────────┐  │ acknowledge
//!    └──────────────────────────────────────────────────┴──┘
//! ```
//!
//! The controller never sleeps. Accepting a request schedules its progress,
//! completion and timeout tickets on the injected [`Scheduler`]; the owner
//! feeds due tickets back through [`SynthesisJobController::fire`].
//!
//! Every accepted job gets a new generation number. `cancel()` bumps the
//! generation as well, so a ticket that was already in flight when the job
//! was cancelled no longer matches and is dropped on arrival.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use voxforge_core::domain::{SynthesisRequest, SynthesisResult};
use voxforge_core::errors::{SubmissionError, SynthesisError};
use voxforge_core::events::{JobState, SynthesisEvent};
use voxforge_core::ports::{JobTicket, Scheduler, SynthesisBackend, TicketKind};
use voxforge_core::settings::{DEFAULT_LATENCY_MS, DEFAULT_PROGRESS_STEPS, StudioSettings};

// ── Controller configuration ───────────────────────────────────────

/// Configuration for the synthesis job controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Simulated processing time per job.
    pub latency: Duration,

    /// Optional upper bound on processing time.
    pub timeout: Option<Duration>,

    /// Number of progress steps per job. Values of 0 or 1 disable the
    /// intermediate ticks.
    pub progress_steps: u8,

    /// Return to `Idle` immediately after a terminal state instead of
    /// waiting for [`acknowledge`](SynthesisJobController::acknowledge).
    pub auto_acknowledge: bool,
}

impl ControllerConfig {
    /// Build a controller configuration from effective settings.
    #[must_use]
    pub fn from_settings(settings: &StudioSettings) -> Self {
        Self {
            latency: settings.effective_latency(),
            timeout: settings.effective_timeout(),
            progress_steps: settings.effective_progress_steps(),
            auto_acknowledge: false,
        }
    }

    /// Percentages and offsets of the intermediate progress ticks.
    fn progress_schedule(&self) -> impl Iterator<Item = (u8, Duration)> + '_ {
        let steps = u32::from(self.progress_steps);
        (1..steps).map(move |step| {
            let percent = u8::try_from(step * 100 / steps).unwrap_or(100);
            (percent, self.latency * step / steps)
        })
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(DEFAULT_LATENCY_MS),
            timeout: None,
            progress_steps: DEFAULT_PROGRESS_STEPS,
            auto_acknowledge: false,
        }
    }
}

// ── Controller ─────────────────────────────────────────────────────

/// State machine for one synthesis surface.
///
/// Emits [`SynthesisEvent`]s via a channel for history and presentation
/// layers to consume.
pub struct SynthesisJobController {
    /// Current state.
    state: JobState,

    /// Generation of the current (or most recently cancelled) job.
    generation: u64,

    /// Owned snapshot of the accepted request while `Pending`.
    in_flight: Option<SynthesisRequest>,

    /// Outcome of the last job while `Completed` or `Failed`.
    outcome: Option<Result<SynthesisResult, SynthesisError>>,

    /// Deferred-callback source for job timers.
    scheduler: Box<dyn Scheduler>,

    /// Renders the request once the completion ticket fires.
    backend: Arc<dyn SynthesisBackend>,

    /// Event sender channel.
    event_tx: mpsc::UnboundedSender<SynthesisEvent>,

    config: ControllerConfig,
}

impl SynthesisJobController {
    /// Create a new controller in the `Idle` state.
    ///
    /// Returns the controller and a receiver for [`SynthesisEvent`]s.
    #[must_use]
    pub fn new(
        config: ControllerConfig,
        scheduler: Box<dyn Scheduler>,
        backend: Arc<dyn SynthesisBackend>,
    ) -> (Self, mpsc::UnboundedReceiver<SynthesisEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let controller = Self {
            state: JobState::Idle,
            generation: 0,
            in_flight: None,
            outcome: None,
            scheduler,
            backend,
            event_tx,
            config,
        };

        (controller, event_rx)
    }

    #[must_use]
    pub const fn state(&self) -> JobState {
        self.state
    }

    /// Generation of the current job. Zero before the first submission.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a job is pending or awaiting acknowledgment.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.state != JobState::Idle
    }

    /// The request being processed, while `Pending`.
    #[must_use]
    pub const fn in_flight(&self) -> Option<&SynthesisRequest> {
        self.in_flight.as_ref()
    }

    /// Outcome of the last job, while `Completed` or `Failed`.
    #[must_use]
    pub const fn outcome(&self) -> Option<&Result<SynthesisResult, SynthesisError>> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub const fn config(&self) -> &ControllerConfig {
        &self.config
    }

    // ── Inbound operations ─────────────────────────────────────────

    /// Accept `request` and start simulated processing.
    ///
    /// Only `Idle` accepts a submission. A rejected request leaves the
    /// controller untouched and emits nothing.
    pub fn submit(&mut self, request: SynthesisRequest) -> Result<(), SubmissionError> {
        if self.state != JobState::Idle {
            tracing::debug!(state = ?self.state, "Rejecting submission while busy");
            return Err(SubmissionError::AlreadyInProgress);
        }

        if let Err(reason) = request.validate() {
            tracing::debug!(?reason, "Rejecting invalid synthesis request");
            return Err(SubmissionError::InvalidRequest { reason });
        }

        self.set_state(JobState::Validating);

        self.generation += 1;
        let job = self.generation;
        let request = request.accepted_at(self.scheduler.now());

        tracing::info!(
            job,
            voice = %request.parameters().voice_id(),
            chars = request.char_count(),
            backend = self.backend.name(),
            "Accepted synthesis request"
        );

        self.in_flight = Some(request);
        self.outcome = None;
        self.set_state(JobState::Pending);
        self.schedule_job(job);

        Ok(())
    }

    /// Abandon the pending job and return to `Idle`.
    ///
    /// Returns `false` (and does nothing) unless the controller is `Pending`.
    pub fn cancel(&mut self) -> bool {
        if self.state != JobState::Pending {
            tracing::debug!(state = ?self.state, "Nothing to cancel");
            return false;
        }

        let job = self.generation;
        self.scheduler.cancel_generation(job);
        self.generation += 1;
        self.in_flight = None;

        tracing::info!(job, "Synthesis job cancelled");
        self.set_state(JobState::Idle);
        self.emit(SynthesisEvent::Cancelled { job });
        true
    }

    /// Return from `Completed` or `Failed` to `Idle`, discarding the outcome.
    ///
    /// Returns `false` in any other state.
    pub fn acknowledge(&mut self) -> bool {
        if !self.state.is_terminal() {
            return false;
        }
        self.outcome = None;
        self.set_state(JobState::Idle);
        true
    }

    /// Consume the outcome of a finished job and return to `Idle`.
    pub fn take_outcome(&mut self) -> Option<Result<SynthesisResult, SynthesisError>> {
        let outcome = self.outcome.take()?;
        self.acknowledge();
        Some(outcome)
    }

    /// Apply a due ticket. Returns whether it changed anything.
    ///
    /// Tickets from another generation, or arriving after the job left
    /// `Pending`, are ignored.
    pub fn fire(&mut self, ticket: JobTicket) -> bool {
        if ticket.generation != self.generation || self.state != JobState::Pending {
            tracing::debug!(
                ?ticket,
                current = self.generation,
                state = ?self.state,
                "Ignoring stale job ticket"
            );
            return false;
        }

        let job = ticket.generation;
        match ticket.kind {
            TicketKind::Progress(percent) => {
                self.emit(SynthesisEvent::Progress { job, percent });
                true
            }
            TicketKind::Complete => self.complete(job),
            TicketKind::Timeout => {
                let after = self.config.timeout.unwrap_or(self.config.latency);
                tracing::warn!(job, ?after, "Synthesis job timed out");
                self.finish(job, Err(SynthesisError::Timeout { after }));
                true
            }
        }
    }

    // ── Internal helpers ───────────────────────────────────────────

    fn schedule_job(&mut self, job: u64) {
        let ticks: Vec<_> = self.config.progress_schedule().collect();
        for (percent, after) in ticks {
            self.scheduler
                .schedule(JobTicket::new(job, TicketKind::Progress(percent)), after);
        }

        self.scheduler
            .schedule(JobTicket::new(job, TicketKind::Complete), self.config.latency);

        if let Some(timeout) = self.config.timeout {
            self.scheduler
                .schedule(JobTicket::new(job, TicketKind::Timeout), timeout);
        }
    }

    fn complete(&mut self, job: u64) -> bool {
        let Some(request) = self.in_flight.as_ref() else {
            tracing::warn!(job, "Completion fired without an in-flight request");
            return false;
        };

        let outcome = self
            .backend
            .render(request)
            .map(|audio| SynthesisResult::new(request.clone(), audio, self.scheduler.now()));

        if outcome.is_ok() {
            self.emit(SynthesisEvent::Progress { job, percent: 100 });
        }
        self.finish(job, outcome);
        true
    }

    /// Move to the terminal state matching `outcome` and publish it.
    fn finish(&mut self, job: u64, outcome: Result<SynthesisResult, SynthesisError>) {
        self.scheduler.cancel_generation(job);
        self.in_flight = None;

        match &outcome {
            Ok(result) => {
                tracing::info!(
                    job,
                    result = %result.id,
                    duration_estimate = result.duration_estimate_seconds,
                    "Synthesis job completed"
                );
                self.set_state(JobState::Completed);
                self.emit(SynthesisEvent::Completed {
                    job,
                    result: result.clone(),
                });
            }
            Err(error) => {
                tracing::warn!(job, %error, "Synthesis job failed");
                self.set_state(JobState::Failed);
                self.emit(SynthesisEvent::Failed {
                    job,
                    error: error.clone(),
                });
            }
        }

        self.outcome = Some(outcome);
        if self.config.auto_acknowledge {
            self.acknowledge();
        }
    }

    /// Transition to a new state and emit a state-change event.
    fn set_state(&mut self, new_state: JobState) {
        if self.state != new_state {
            tracing::debug!(old = ?self.state, new = ?new_state, "Synthesis state transition");
            self.state = new_state;
            self.emit(SynthesisEvent::StateChanged(new_state));
        }
    }

    /// Emit an event (best-effort: a dropped receiver is logged and ignored).
    fn emit(&self, event: SynthesisEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::warn!("Synthesis event receiver dropped");
        }
    }
}

impl Drop for SynthesisJobController {
    fn drop(&mut self) {
        if self.state == JobState::Pending {
            self.scheduler.cancel_generation(self.generation);
        }
    }
}

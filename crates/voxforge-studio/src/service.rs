//! Async studio service owning one controller, history, catalog and trainer.
//!
//! Synchronous state lives behind a `tokio::sync::Mutex` that is only held
//! for controller/trainer calls, never across an `.await` on an outcome.
//! Four background tasks keep it moving:
//!
//! - two timer drivers feeding scheduler tickets into `fire`;
//! - two event bridges that record history, register cloned voices,
//!   acknowledge terminal states, wake waiting callers and forward every
//!   event to the [`StudioEventEmitter`].
//!
//! The tasks are aborted when the service is dropped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;

use voxforge_core::domain::{
    ParameterSet, SynthesisRequest, SynthesisResult, VoiceFilter, VoiceId, VoiceProfile,
};
use voxforge_core::events::{StudioEvent, SynthesisEvent, TrainingEvent};
use voxforge_core::history::HistoryLog;
use voxforge_core::ports::{
    JobTicket, StudioError, StudioEventEmitter, StudioPort, StudioStatusDto, SynthesisBackend,
};
use voxforge_core::settings::StudioSettings;

use crate::catalog::VoiceCatalog;
use crate::controller::{ControllerConfig, SynthesisJobController};
use crate::scheduler::TokioScheduler;
use crate::training::{TrainerConfig, VoiceTrainer};

type SynthesisWaiter = oneshot::Sender<Result<SynthesisResult, StudioError>>;
type TrainingWaiter = oneshot::Sender<Result<VoiceProfile, StudioError>>;

struct StudioState {
    controller: SynthesisJobController,
    trainer: VoiceTrainer,
    history: HistoryLog,
    catalog: VoiceCatalog,
}

#[derive(Default)]
struct Waiters {
    synthesis: HashMap<u64, SynthesisWaiter>,
    training: HashMap<u64, TrainingWaiter>,
}

type SharedWaiters = Arc<StdMutex<Waiters>>;

fn lock_waiters(waiters: &SharedWaiters) -> std::sync::MutexGuard<'_, Waiters> {
    waiters.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Studio service implementing [`StudioPort`] on the Tokio runtime.
pub struct StudioService {
    state: Arc<Mutex<StudioState>>,
    waiters: SharedWaiters,
    settings: StudioSettings,
    tasks: Vec<JoinHandle<()>>,
}

impl StudioService {
    /// Build the service with the built-in voice catalog.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new(
        settings: StudioSettings,
        backend: Arc<dyn SynthesisBackend>,
        emitter: Box<dyn StudioEventEmitter>,
    ) -> Self {
        Self::with_catalog(settings, backend, emitter, VoiceCatalog::new())
    }

    /// Build the service around a prepared catalog.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn with_catalog(
        settings: StudioSettings,
        backend: Arc<dyn SynthesisBackend>,
        emitter: Box<dyn StudioEventEmitter>,
        catalog: VoiceCatalog,
    ) -> Self {
        let (synth_scheduler, synth_tickets) = TokioScheduler::new();
        let (train_scheduler, train_tickets) = TokioScheduler::new();

        let (controller, synth_events) = SynthesisJobController::new(
            ControllerConfig::from_settings(&settings),
            Box::new(synth_scheduler),
            backend,
        );
        let (trainer, train_events) =
            VoiceTrainer::new(TrainerConfig::from_settings(&settings), Box::new(train_scheduler));

        let state = Arc::new(Mutex::new(StudioState {
            controller,
            trainer,
            history: HistoryLog::with_capacity(settings.effective_history_capacity()),
            catalog,
        }));
        let waiters = SharedWaiters::default();

        let tasks = vec![
            spawn_timer_driver(synth_tickets, Arc::clone(&state), |s, t| {
                s.controller.fire(t)
            }),
            spawn_timer_driver(train_tickets, Arc::clone(&state), |s, t| s.trainer.fire(t)),
            spawn_synthesis_bridge(
                synth_events,
                Arc::clone(&state),
                Arc::clone(&waiters),
                emitter.clone_box(),
            ),
            spawn_training_bridge(
                train_events,
                Arc::clone(&state),
                Arc::clone(&waiters),
                emitter,
            ),
        ];

        tracing::info!(
            latency = ?settings.effective_latency(),
            history_capacity = settings.effective_history_capacity(),
            "Studio service started"
        );

        Self {
            state,
            waiters,
            settings,
            tasks,
        }
    }

    /// Settings the service was built with.
    #[must_use]
    pub const fn settings(&self) -> &StudioSettings {
        &self.settings
    }
}

impl Drop for StudioService {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

#[async_trait]
impl StudioPort for StudioService {
    async fn status(&self) -> StudioStatusDto {
        let state = self.state.lock().await;
        StudioStatusDto {
            state: state.controller.state(),
            generation: state.controller.generation(),
            history_len: state.history.len(),
            history_capacity: state.history.capacity(),
            voice_count: state.catalog.len(),
            training: state.trainer.status(),
            training_progress: state.trainer.progress(),
        }
    }

    async fn list_voices(&self, filter: &VoiceFilter) -> Vec<VoiceProfile> {
        self.state.lock().await.catalog.search(filter)
    }

    async fn generate(
        &self,
        text: String,
        parameters: ParameterSet,
    ) -> Result<SynthesisResult, StudioError> {
        let budget = self.settings.effective_character_budget();
        let request = SynthesisRequest::new(text, parameters);
        let len = request.char_count();
        if len > budget {
            return Err(StudioError::CharacterBudgetExceeded { len, budget });
        }

        let rx = {
            let mut state = self.state.lock().await;

            let voice_id = request.parameters().voice_id();
            if !voice_id.is_empty() && !state.catalog.contains(voice_id) {
                return Err(StudioError::UnknownVoice(voice_id.clone()));
            }

            state.controller.submit(request)?;
            let job = state.controller.generation();

            let (tx, rx) = oneshot::channel();
            lock_waiters(&self.waiters).synthesis.insert(job, tx);
            rx
        };

        rx.await.unwrap_or(Err(StudioError::ServiceStopped))
    }

    async fn cancel(&self) -> bool {
        self.state.lock().await.controller.cancel()
    }

    async fn history(&self) -> Vec<SynthesisResult> {
        self.state.lock().await.history.snapshot()
    }

    async fn clear_history(&self) {
        self.state.lock().await.history.clear();
    }

    async fn clone_voice(&self, name: String, sample: String) -> Result<VoiceProfile, StudioError> {
        let rx = {
            let mut state = self.state.lock().await;
            state.trainer.start(&name, &sample)?;
            let job = state.trainer.generation();

            let (tx, rx) = oneshot::channel();
            lock_waiters(&self.waiters).training.insert(job, tx);
            rx
        };

        rx.await.unwrap_or(Err(StudioError::ServiceStopped))
    }

    async fn cancel_training(&self) -> bool {
        self.state.lock().await.trainer.cancel()
    }

    async fn remove_voice(&self, id: &VoiceId) -> Result<VoiceProfile, StudioError> {
        Ok(self.state.lock().await.catalog.remove(id)?)
    }
}

// ── Background tasks ───────────────────────────────────────────────

fn spawn_timer_driver(
    mut tickets: mpsc::UnboundedReceiver<JobTicket>,
    state: Arc<Mutex<StudioState>>,
    fire: fn(&mut StudioState, JobTicket) -> bool,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(ticket) = tickets.recv().await {
            let mut guard = state.lock().await;
            if !fire(&mut guard, ticket) {
                tracing::trace!(?ticket, "Ticket had no effect");
            }
        }
        tracing::debug!("Timer driver stopped");
    })
}

/// Completed and failed jobs wait for acknowledgment; cancelled ones are
/// already idle.
const fn settles_job(event: &SynthesisEvent) -> bool {
    matches!(
        event,
        SynthesisEvent::Completed { .. } | SynthesisEvent::Failed { .. }
    )
}

/// Record a finished job and free the controller for the next request.
fn settle_synthesis(state: &mut StudioState, event: &SynthesisEvent) {
    if !settles_job(event) {
        return;
    }
    state.history.record(event);
    if !state.controller.acknowledge() {
        tracing::debug!(
            job = ?event.job(),
            state = ?state.controller.state(),
            "Nothing to acknowledge"
        );
    }
}

fn spawn_synthesis_bridge(
    mut events: mpsc::UnboundedReceiver<SynthesisEvent>,
    state: Arc<Mutex<StudioState>>,
    waiters: SharedWaiters,
    emitter: Box<dyn StudioEventEmitter>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if settles_job(&event) {
                settle_synthesis(&mut *state.lock().await, &event);
            }

            emitter.emit(StudioEvent::from(event.clone()));

            let (job, outcome) = match event {
                SynthesisEvent::Completed { job, result } => (job, Ok(result)),
                SynthesisEvent::Failed { job, error } => (job, Err(StudioError::Synthesis(error))),
                SynthesisEvent::Cancelled { job } => (job, Err(StudioError::Cancelled)),
                SynthesisEvent::StateChanged(_) | SynthesisEvent::Progress { .. } => continue,
            };

            let waiter = lock_waiters(&waiters).synthesis.remove(&job);
            if let Some(tx) = waiter {
                if tx.send(outcome).is_err() {
                    tracing::debug!(job, "Synthesis caller went away before the outcome");
                }
            }
        }
        tracing::debug!("Synthesis event bridge stopped");
    })
}

fn spawn_training_bridge(
    mut events: mpsc::UnboundedReceiver<TrainingEvent>,
    state: Arc<Mutex<StudioState>>,
    waiters: SharedWaiters,
    emitter: Box<dyn StudioEventEmitter>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            emitter.emit(StudioEvent::from(event.clone()));

            let (job, outcome) = match event {
                TrainingEvent::Completed { job, voice } => {
                    let mut guard = state.lock().await;
                    let registered = guard.catalog.insert(voice.clone());
                    guard.trainer.acknowledge();
                    (job, registered.map(|()| voice).map_err(StudioError::from))
                }
                TrainingEvent::Cancelled { job } => (job, Err(StudioError::Cancelled)),
                TrainingEvent::Progress { .. } => continue,
            };

            let waiter = lock_waiters(&waiters).training.remove(&job);
            if let Some(tx) = waiter {
                if tx.send(outcome).is_err() {
                    tracing::debug!(job, "Cloning caller went away before the outcome");
                }
            }
        }
        tracing::debug!("Training event bridge stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SimulatedBackend;
    use crate::scheduler::ManualScheduler;
    use std::time::Duration;
    use voxforge_core::events::JobState;
    use voxforge_core::ports::NoopEmitter;

    fn service() -> StudioService {
        StudioService::new(
            StudioSettings::with_defaults(),
            Arc::new(SimulatedBackend::new()),
            Box::new(NoopEmitter::new()),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn status_reflects_fresh_service() {
        let service = service();
        let status = service.status().await;
        assert_eq!(status.history_len, 0);
        assert_eq!(status.history_capacity, 50);
        assert_eq!(status.voice_count, 6);
        assert_eq!(status.generation, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_voice_is_rejected_before_submission() {
        let service = service();
        let err = service
            .generate("Hello".to_string(), ParameterSet::for_voice("ghost"))
            .await
            .unwrap_err();
        assert_eq!(err, StudioError::UnknownVoice(VoiceId::new("ghost")));
        assert_eq!(service.status().await.generation, 0);
    }

    #[test]
    fn cancel_event_does_not_acknowledge_a_later_job() {
        let scheduler = ManualScheduler::new();
        let (controller, mut events) = SynthesisJobController::new(
            ControllerConfig::default(),
            Box::new(scheduler.clone()),
            Arc::new(SimulatedBackend::new()),
        );
        let (trainer, _training) =
            VoiceTrainer::new(TrainerConfig::default(), Box::new(ManualScheduler::new()));
        let mut state = StudioState {
            controller,
            trainer,
            history: HistoryLog::new(),
            catalog: VoiceCatalog::new(),
        };

        let request = SynthesisRequest::new("First", ParameterSet::for_voice("preset_1"));
        state.controller.submit(request).unwrap();
        assert!(state.controller.cancel());
        let cancelled_job = state.controller.generation() - 1;

        let request = SynthesisRequest::new("Second", ParameterSet::for_voice("preset_1"));
        state.controller.submit(request).unwrap();
        for ticket in scheduler.advance(Duration::from_secs(10)) {
            state.controller.fire(ticket);
        }
        assert_eq!(state.controller.state(), JobState::Completed);

        // The first job's cancellation arrives late.
        settle_synthesis(&mut state, &SynthesisEvent::Cancelled { job: cancelled_job });
        assert_eq!(state.controller.state(), JobState::Completed);
        assert!(state.history.is_empty());

        let mut completed = None;
        while let Ok(event) = events.try_recv() {
            if matches!(event, SynthesisEvent::Completed { .. }) {
                completed = Some(event);
            }
        }
        settle_synthesis(&mut state, &completed.unwrap());
        assert_eq!(state.controller.state(), JobState::Idle);
        assert_eq!(state.history.len(), 1);
    }
}

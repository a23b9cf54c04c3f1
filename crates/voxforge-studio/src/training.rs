//! Simulated voice cloning.
//!
//! A run advances by a fixed increment every step until it reaches 100%.
//! Status reads `training` below 50%, `processing` from 50%, and
//! `completed` at 100%, when the new custom voice profile is emitted.
//! No audio is read; the sample name is only checked for a supported
//! extension.

use std::path::Path;
use std::time::Duration;

use tokio::sync::mpsc;

use voxforge_core::domain::VoiceProfile;
use voxforge_core::errors::TrainingError;
use voxforge_core::events::{TrainingEvent, TrainingStatus};
use voxforge_core::ports::{JobTicket, Scheduler, TicketKind};
use voxforge_core::settings::{DEFAULT_TRAINING_STEP_MS, StudioSettings};

use crate::catalog::{CUSTOM_VOICE_LANGUAGE, custom_voice};

/// Sample file extensions accepted for cloning.
pub const ALLOWED_SAMPLE_EXTENSIONS: [&str; 5] = ["wav", "mp3", "m4a", "flac", "ogg"];

/// Progress at which a run switches from `training` to `processing`.
const PROCESSING_THRESHOLD: u8 = 50;

/// Configuration for the voice trainer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerConfig {
    /// Interval between progress steps.
    pub step: Duration,

    /// Progress added per step, in percent.
    pub increment: u8,
}

impl TrainerConfig {
    #[must_use]
    pub fn from_settings(settings: &StudioSettings) -> Self {
        Self {
            step: settings.effective_training_step(),
            ..Self::default()
        }
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            step: Duration::from_millis(DEFAULT_TRAINING_STEP_MS),
            increment: 10,
        }
    }
}

/// Check that `sample` names a file with a supported audio extension.
pub fn validate_sample(sample: &str) -> Result<(), TrainingError> {
    let sample = sample.trim();
    if sample.is_empty() {
        return Err(TrainingError::MissingSample);
    }

    let extension = Path::new(sample)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if ALLOWED_SAMPLE_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(TrainingError::UnsupportedFormat(extension))
    }
}

#[derive(Debug, Clone)]
struct TrainingJob {
    name: String,
    sample: String,
}

/// State machine for simulated cloning runs.
pub struct VoiceTrainer {
    status: TrainingStatus,
    progress: u8,
    generation: u64,
    job: Option<TrainingJob>,
    trained: Option<VoiceProfile>,
    scheduler: Box<dyn Scheduler>,
    event_tx: mpsc::UnboundedSender<TrainingEvent>,
    config: TrainerConfig,
}

impl VoiceTrainer {
    /// Create an idle trainer and the receiver for its events.
    #[must_use]
    pub fn new(
        config: TrainerConfig,
        scheduler: Box<dyn Scheduler>,
    ) -> (Self, mpsc::UnboundedReceiver<TrainingEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        (
            Self {
                status: TrainingStatus::Idle,
                progress: 0,
                generation: 0,
                job: None,
                trained: None,
                scheduler,
                event_tx,
                config,
            },
            event_rx,
        )
    }

    #[must_use]
    pub const fn status(&self) -> TrainingStatus {
        self.status
    }

    #[must_use]
    pub const fn progress(&self) -> u8 {
        self.progress
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(
            self.status,
            TrainingStatus::Training | TrainingStatus::Processing
        )
    }

    /// Voice produced by the last completed run, until acknowledged.
    #[must_use]
    pub const fn trained_voice(&self) -> Option<&VoiceProfile> {
        self.trained.as_ref()
    }

    /// Start cloning a voice called `name` from `sample`.
    pub fn start(&mut self, name: &str, sample: &str) -> Result<(), TrainingError> {
        if self.is_running() {
            return Err(TrainingError::AlreadyTraining);
        }
        if name.trim().is_empty() {
            return Err(TrainingError::EmptyName);
        }
        validate_sample(sample)?;

        self.generation += 1;
        let job = self.generation;
        self.job = Some(TrainingJob {
            name: name.trim().to_string(),
            sample: sample.trim().to_string(),
        });
        self.trained = None;
        self.progress = 0;
        self.status = TrainingStatus::Training;

        tracing::info!(job, name = name.trim(), sample = sample.trim(), "Voice training started");
        self.emit(TrainingEvent::Progress {
            job,
            percent: 0,
            status: self.status,
        });

        let increment = self.config.increment.max(1);
        let mut step = 1u32;
        let mut percent = increment;
        loop {
            let percent_now = percent.min(100);
            self.scheduler.schedule(
                JobTicket::new(job, TicketKind::Progress(percent_now)),
                self.config.step * step,
            );
            if percent_now >= 100 {
                break;
            }
            step += 1;
            percent = percent.saturating_add(increment);
        }

        Ok(())
    }

    /// Abandon the running job. Returns `false` if nothing was running.
    pub fn cancel(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }

        let job = self.generation;
        self.scheduler.cancel_generation(job);
        self.generation += 1;
        self.job = None;
        self.progress = 0;
        self.status = TrainingStatus::Idle;

        tracing::info!(job, "Voice training cancelled");
        self.emit(TrainingEvent::Cancelled { job });
        true
    }

    /// Return a completed trainer to idle.
    pub fn acknowledge(&mut self) -> bool {
        if self.status != TrainingStatus::Completed {
            return false;
        }
        self.trained = None;
        self.progress = 0;
        self.status = TrainingStatus::Idle;
        true
    }

    /// Apply a due ticket. Returns whether it changed anything.
    pub fn fire(&mut self, ticket: JobTicket) -> bool {
        if ticket.generation != self.generation || !self.is_running() {
            tracing::debug!(?ticket, current = self.generation, "Ignoring stale training ticket");
            return false;
        }

        let TicketKind::Progress(percent) = ticket.kind else {
            return false;
        };

        let job = ticket.generation;
        self.progress = percent;

        if percent >= 100 {
            return self.complete(job);
        }

        let status = if percent >= PROCESSING_THRESHOLD {
            TrainingStatus::Processing
        } else {
            TrainingStatus::Training
        };
        if status != self.status {
            tracing::debug!(old = ?self.status, new = ?status, "Training status transition");
            self.status = status;
        }
        self.emit(TrainingEvent::Progress {
            job,
            percent,
            status,
        });
        true
    }

    fn complete(&mut self, job: u64) -> bool {
        let Some(training) = self.job.take() else {
            return false;
        };

        let voice = custom_voice(
            &training.name,
            CUSTOM_VOICE_LANGUAGE,
            format!("Cloned from {}", training.sample),
            self.scheduler.now(),
        );

        tracing::info!(job, voice = %voice.id, name = %voice.name, "Voice training completed");
        self.status = TrainingStatus::Completed;
        self.trained = Some(voice.clone());
        self.emit(TrainingEvent::Progress {
            job,
            percent: 100,
            status: TrainingStatus::Completed,
        });
        self.emit(TrainingEvent::Completed { job, voice });
        true
    }

    fn emit(&self, event: TrainingEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::warn!("Training event receiver dropped");
        }
    }
}

impl Drop for VoiceTrainer {
    fn drop(&mut self) {
        if self.is_running() {
            self.scheduler.cancel_generation(self.generation);
        }
    }
}

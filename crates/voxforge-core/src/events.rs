//! Events emitted by synthesis controllers and cloning runs.
//!
//! # Wire Format
//!
//! [`StudioEvent`] is serialized with a `type` tag so observers outside the
//! process can dispatch on it:
//!
//! ```json
//! { "type": "synthesis_progress", "job": 3, "percent": 40 }
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{SynthesisResult, VoiceProfile};
use crate::errors::SynthesisError;

// ── Synthesis job state machine ────────────────────────────────────

/// State of a synthesis job controller.
///
/// ```text
///   Idle → Validating → Pending → Completed ──ack──┐
///    ▲                     │  └──→ Failed ────ack──┤
///    └──────── cancel ─────┘                       │
///    └─────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Ready to accept a submission.
    #[default]
    Idle,
    /// Request is being checked. Transient.
    Validating,
    /// Simulated processing in flight.
    Pending,
    /// A result was produced and awaits acknowledgment.
    Completed,
    /// The job failed and awaits acknowledgment.
    Failed,
}

impl JobState {
    /// Whether the state ends a job.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events emitted by a synthesis job controller.
///
/// `job` is the controller generation the event belongs to; it increases
/// with every accepted submission and every cancellation.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisEvent {
    /// Controller state changed.
    StateChanged(JobState),

    /// Simulated processing advanced.
    Progress { job: u64, percent: u8 },

    /// The job produced a result. Fired at most once per accepted request.
    Completed { job: u64, result: SynthesisResult },

    /// The job failed. Fired at most once per accepted request.
    Failed { job: u64, error: SynthesisError },

    /// The pending job was cancelled; nothing will be recorded for it.
    Cancelled { job: u64 },
}

impl SynthesisEvent {
    /// Generation the event refers to, if it is job-scoped.
    #[must_use]
    pub const fn job(&self) -> Option<u64> {
        match self {
            Self::StateChanged(_) => None,
            Self::Progress { job, .. }
            | Self::Completed { job, .. }
            | Self::Failed { job, .. }
            | Self::Cancelled { job } => Some(*job),
        }
    }

    /// Whether this event ends the job it refers to.
    #[must_use]
    pub const fn is_outcome(&self) -> bool {
        matches!(
            self,
            Self::Completed { .. } | Self::Failed { .. } | Self::Cancelled { .. }
        )
    }
}

// ── Voice cloning runs ─────────────────────────────────────────────

/// Status of a simulated voice cloning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrainingStatus {
    #[default]
    Idle,
    Training,
    Processing,
    Completed,
}

impl std::fmt::Display for TrainingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Training => "training",
            Self::Processing => "processing",
            Self::Completed => "completed",
        })
    }
}

/// Events emitted by a voice trainer.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainingEvent {
    Progress {
        job: u64,
        percent: u8,
        status: TrainingStatus,
    },
    Completed {
        job: u64,
        voice: VoiceProfile,
    },
    Cancelled {
        job: u64,
    },
}

// ── Cross-surface event union ──────────────────────────────────────

/// Observer-facing event union forwarded by the studio service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StudioEvent {
    SynthesisState {
        state: JobState,
    },
    SynthesisProgress {
        job: u64,
        percent: u8,
    },
    SynthesisCompleted {
        job: u64,
        result: SynthesisResult,
    },
    SynthesisFailed {
        job: u64,
        error: SynthesisError,
    },
    SynthesisCancelled {
        job: u64,
    },
    TrainingProgress {
        job: u64,
        percent: u8,
        status: TrainingStatus,
    },
    TrainingCompleted {
        job: u64,
        voice: VoiceProfile,
    },
    TrainingCancelled {
        job: u64,
    },
}

impl From<SynthesisEvent> for StudioEvent {
    fn from(event: SynthesisEvent) -> Self {
        match event {
            SynthesisEvent::StateChanged(state) => Self::SynthesisState { state },
            SynthesisEvent::Progress { job, percent } => Self::SynthesisProgress { job, percent },
            SynthesisEvent::Completed { job, result } => Self::SynthesisCompleted { job, result },
            SynthesisEvent::Failed { job, error } => Self::SynthesisFailed { job, error },
            SynthesisEvent::Cancelled { job } => Self::SynthesisCancelled { job },
        }
    }
}

impl From<TrainingEvent> for StudioEvent {
    fn from(event: TrainingEvent) -> Self {
        match event {
            TrainingEvent::Progress {
                job,
                percent,
                status,
            } => Self::TrainingProgress {
                job,
                percent,
                status,
            },
            TrainingEvent::Completed { job, voice } => Self::TrainingCompleted { job, voice },
            TrainingEvent::Cancelled { job } => Self::TrainingCancelled { job },
        }
    }
}

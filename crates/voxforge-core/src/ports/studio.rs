//! Studio port: async facade over one synthesis surface.
//!
//! # Design Rules
//!
//! - Signatures use only core domain types.
//! - The implementation lives in `voxforge-studio`; adapters (the CLI, tests)
//!   depend on this trait, not on the controller internals.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ParameterSet, SynthesisResult, VoiceFilter, VoiceId, VoiceProfile};
use crate::errors::{CatalogError, RequestDefect, SubmissionError, SynthesisError, TrainingError};
use crate::events::{JobState, TrainingStatus};

// ── DTOs ─────────────────────────────────────────────────────────────────────

/// Snapshot of a studio surface for status displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioStatusDto {
    /// Synthesis controller state.
    pub state: JobState,
    /// Current controller generation.
    pub generation: u64,
    /// Number of entries in the session history.
    pub history_len: usize,
    /// Maximum number of history entries retained.
    pub history_capacity: usize,
    /// Number of voices in the catalog.
    pub voice_count: usize,
    /// Status of the voice trainer.
    pub training: TrainingStatus,
    /// Last reported training progress, in percent.
    pub training_progress: u8,
}

// ── Error ─────────────────────────────────────────────────────────────────────

/// Errors returned by [`StudioPort`] operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StudioError {
    /// Another job is pending or awaiting acknowledgment.
    #[error("A synthesis job is already in progress")]
    Busy,

    /// The request failed validation.
    #[error("Invalid request: {0}")]
    InvalidRequest(RequestDefect),

    /// The requested voice is not in the catalog.
    #[error("Unknown voice '{0}'")]
    UnknownVoice(VoiceId),

    /// Text is longer than the configured character budget.
    #[error("Text is {len} characters; the budget is {budget}")]
    CharacterBudgetExceeded { len: usize, budget: usize },

    /// The accepted job failed.
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// The job was cancelled before it completed.
    #[error("Operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Training(#[from] TrainingError),

    /// Background tasks have shut down.
    #[error("Studio service has stopped")]
    ServiceStopped,
}

impl From<SubmissionError> for StudioError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::AlreadyInProgress => Self::Busy,
            SubmissionError::InvalidRequest { reason } => Self::InvalidRequest(reason),
        }
    }
}

// ── Port trait ────────────────────────────────────────────────────────────────

/// Port trait for one studio surface.
///
/// Implemented by `StudioService` in `voxforge-studio`.
#[async_trait]
pub trait StudioPort: Send + Sync {
    /// Current controller, history and trainer status.
    async fn status(&self) -> StudioStatusDto;

    /// Voices accepted by `filter`, in catalog order.
    async fn list_voices(&self, filter: &VoiceFilter) -> Vec<VoiceProfile>;

    /// Submit `text` and wait for the outcome.
    async fn generate(
        &self,
        text: String,
        parameters: ParameterSet,
    ) -> Result<SynthesisResult, StudioError>;

    /// Cancel the pending job, if any. Returns whether a job was cancelled.
    async fn cancel(&self) -> bool;

    /// Session history, most recent first.
    async fn history(&self) -> Vec<SynthesisResult>;

    /// Empty the session history.
    async fn clear_history(&self);

    /// Run a simulated cloning job and register the resulting voice.
    async fn clone_voice(&self, name: String, sample: String) -> Result<VoiceProfile, StudioError>;

    /// Cancel the running cloning job, if any. Returns whether one was cancelled.
    async fn cancel_training(&self) -> bool;

    /// Remove a custom voice from the catalog.
    async fn remove_voice(&self, id: &VoiceId) -> Result<VoiceProfile, StudioError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_errors_map_to_port_errors() {
        assert_eq!(
            StudioError::from(SubmissionError::AlreadyInProgress),
            StudioError::Busy
        );
        assert_eq!(
            StudioError::from(SubmissionError::InvalidRequest {
                reason: RequestDefect::EmptyText
            }),
            StudioError::InvalidRequest(RequestDefect::EmptyText)
        );
    }

    #[test]
    fn status_dto_is_camel_case() {
        let dto = StudioStatusDto {
            state: JobState::Idle,
            generation: 0,
            history_len: 0,
            history_capacity: 50,
            voice_count: 6,
            training: TrainingStatus::Idle,
            training_progress: 0,
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["historyCapacity"], 50);
        assert_eq!(json["state"], "idle");
    }
}

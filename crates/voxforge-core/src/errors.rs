//! Error taxonomy for synthesis jobs, the voice catalog and cloning runs.
//!
//! Every error here is terminal for the job it belongs to. Nothing retries
//! automatically; callers build a fresh request and submit again once the
//! controller is back to idle.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::VoiceId;

/// Why a request failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestDefect {
    /// Text was empty or whitespace only.
    EmptyText,
    /// No voice selected.
    MissingVoice,
}

impl std::fmt::Display for RequestDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::EmptyText => "text is empty",
            Self::MissingVoice => "no voice selected",
        })
    }
}

/// Rejection returned synchronously by `submit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// A job is pending or awaiting acknowledgment.
    #[error("A synthesis job is already in progress")]
    AlreadyInProgress,

    /// The request failed validation; the controller stays idle.
    #[error("Invalid synthesis request: {reason}")]
    InvalidRequest { reason: RequestDefect },
}

/// Failure of an accepted job, delivered through the completion event.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SynthesisError {
    /// Catch-all for failures without a more specific category.
    #[error("Speech synthesis failed: {message}")]
    Unspecified { message: String },

    /// The requested voice cannot be rendered.
    #[error("Voice '{voice_id}' is unavailable")]
    VoiceUnavailable { voice_id: VoiceId },

    /// The backend reported an error.
    #[error("Synthesis backend error: {message}")]
    Backend { message: String },

    /// No completion arrived within the configured bound.
    #[error("Synthesis timed out after {}ms", after.as_millis())]
    Timeout { after: Duration },
}

impl SynthesisError {
    pub fn unspecified(message: impl Into<String>) -> Self {
        Self::Unspecified {
            message: message.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Errors from voice catalog mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Voice '{0}' not found")]
    NotFound(VoiceId),

    #[error("Voice '{0}' is built in and cannot be removed")]
    ReadOnly(VoiceId),

    #[error("Voice name cannot be empty")]
    EmptyName,
}

/// Errors from starting a simulated cloning run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrainingError {
    #[error("A voice training job is already running")]
    AlreadyTraining,

    #[error("Voice name cannot be empty")]
    EmptyName,

    #[error("No audio sample provided")]
    MissingSample,

    #[error("Unsupported sample format '{0}' (expected wav, mp3, m4a, flac or ogg)")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_errors_render_reason() {
        let err = SubmissionError::InvalidRequest {
            reason: RequestDefect::MissingVoice,
        };
        assert_eq!(err.to_string(), "Invalid synthesis request: no voice selected");
    }

    #[test]
    fn timeout_reports_milliseconds() {
        let err = SynthesisError::Timeout {
            after: Duration::from_millis(2500),
        };
        assert_eq!(err.to_string(), "Synthesis timed out after 2500ms");
    }

    #[test]
    fn synthesis_error_is_tagged_on_the_wire() {
        let json = serde_json::to_value(SynthesisError::backend("boom")).unwrap();
        assert_eq!(json["kind"], "backend");
        assert_eq!(json["message"], "boom");
    }
}

//! Synthesis requests and the results they produce.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::parameters::ParameterSet;
use crate::errors::RequestDefect;

/// Characters of synthesized speech per second of audio.
pub const CHARS_PER_SECOND: usize = 15;

/// Number of characters shown in a history preview before truncation.
pub const PREVIEW_CHARS: usize = 50;

/// Estimated audio length for `text`, in whole seconds.
///
/// `ceil(chars / 15)`, counted in Unicode scalar values. Pure: the same
/// text always yields the same estimate.
#[must_use]
pub fn estimate_duration_seconds(text: &str) -> u32 {
    let chars = text.chars().count();
    u32::try_from(chars.div_ceil(CHARS_PER_SECOND)).unwrap_or(u32::MAX)
}

// ── Request ────────────────────────────────────────────────────────

/// Text plus the parameters to speak it with.
///
/// Built fresh for every submission attempt. The controller stamps
/// `submitted_at` when it accepts the request; after that the value is
/// only ever read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisRequest {
    text: String,
    parameters: ParameterSet,
    submitted_at: Option<DateTime<Utc>>,
}

impl SynthesisRequest {
    /// Combine text and parameters into an unsubmitted request.
    pub fn new(text: impl Into<String>, parameters: ParameterSet) -> Self {
        Self {
            text: text.into(),
            parameters,
            submitted_at: None,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    /// When the controller accepted this request, if it has.
    #[must_use]
    pub const fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    /// Character count of the text.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Check the preconditions the controller enforces on submission.
    pub fn validate(&self) -> Result<(), RequestDefect> {
        if self.text.trim().is_empty() {
            return Err(RequestDefect::EmptyText);
        }
        if self.parameters.voice_id().is_empty() {
            return Err(RequestDefect::MissingVoice);
        }
        Ok(())
    }

    /// Consume the request and return the accepted snapshot.
    #[must_use]
    pub fn accepted_at(self, at: DateTime<Utc>) -> Self {
        Self {
            submitted_at: Some(at),
            ..self
        }
    }
}

// ── Result ─────────────────────────────────────────────────────────

/// Unique identifier of a completed synthesis job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultId(Uuid);

impl ResultId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque handle standing in for generated audio.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioRef(String);

impl AudioRef {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AudioRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a successfully completed synthesis job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisResult {
    pub id: ResultId,
    pub audio_ref: AudioRef,
    pub duration_estimate_seconds: u32,
    pub source_request: SynthesisRequest,
    pub completed_at: DateTime<Utc>,
}

impl SynthesisResult {
    /// Assemble a result for `request`, generating a new id.
    ///
    /// The duration estimate is derived from the request text, never from
    /// elapsed time.
    #[must_use]
    pub fn new(
        request: SynthesisRequest,
        audio_ref: AudioRef,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ResultId::random(),
            audio_ref,
            duration_estimate_seconds: estimate_duration_seconds(request.text()),
            source_request: request,
            completed_at,
        }
    }

    /// Short form of the source text for list displays.
    #[must_use]
    pub fn preview(&self) -> String {
        let text = self.source_request.text();
        if text.chars().count() > PREVIEW_CHARS {
            let head: String = text.chars().take(PREVIEW_CHARS).collect();
            format!("{head}...")
        } else {
            text.to_string()
        }
    }
}

//! Studio settings and validation.
//!
//! All fields are optional so partial files and updates merge cleanly over
//! the defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::history::DEFAULT_HISTORY_CAPACITY;

/// Default simulated processing time for one synthesis job.
pub const DEFAULT_LATENCY_MS: u64 = 2000;

/// Default number of progress steps per job (20% increments).
pub const DEFAULT_PROGRESS_STEPS: u8 = 5;

/// Default per-request character budget.
pub const DEFAULT_CHARACTER_BUDGET: usize = 5000;

/// Default interval between cloning progress steps.
pub const DEFAULT_TRAINING_STEP_MS: u64 = 500;

/// Studio settings structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StudioSettings {
    /// Simulated processing time per synthesis job, in milliseconds.
    pub latency_ms: Option<u64>,

    /// Optional upper bound on processing time, in milliseconds.
    pub timeout_ms: Option<u64>,

    /// Number of progress steps per job (0 or 1 disables intermediate ticks).
    pub progress_steps: Option<u8>,

    /// Maximum number of history entries kept per session (1-1000).
    pub history_capacity: Option<usize>,

    /// Maximum characters accepted per request.
    pub character_budget: Option<usize>,

    /// Interval between cloning progress steps, in milliseconds.
    pub training_step_ms: Option<u64>,
}

impl StudioSettings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self {
            latency_ms: Some(DEFAULT_LATENCY_MS),
            timeout_ms: None,
            progress_steps: Some(DEFAULT_PROGRESS_STEPS),
            history_capacity: Some(DEFAULT_HISTORY_CAPACITY),
            character_budget: Some(DEFAULT_CHARACTER_BUDGET),
            training_step_ms: Some(DEFAULT_TRAINING_STEP_MS),
        }
    }

    /// Parse settings from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(json).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    /// Load settings from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self, SettingsError> {
        let raw = std::fs::read_to_string(path).map_err(|e| SettingsError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&raw)
    }

    #[must_use]
    pub fn effective_latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms.unwrap_or(DEFAULT_LATENCY_MS))
    }

    #[must_use]
    pub fn effective_timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    #[must_use]
    pub fn effective_progress_steps(&self) -> u8 {
        self.progress_steps.unwrap_or(DEFAULT_PROGRESS_STEPS)
    }

    #[must_use]
    pub fn effective_history_capacity(&self) -> usize {
        self.history_capacity.unwrap_or(DEFAULT_HISTORY_CAPACITY)
    }

    #[must_use]
    pub fn effective_character_budget(&self) -> usize {
        self.character_budget.unwrap_or(DEFAULT_CHARACTER_BUDGET)
    }

    #[must_use]
    pub fn effective_training_step(&self) -> Duration {
        Duration::from_millis(self.training_step_ms.unwrap_or(DEFAULT_TRAINING_STEP_MS))
    }

    /// Merge another settings into this one, only updating fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(latency) = other.latency_ms {
            self.latency_ms = latency;
        }
        if let Some(timeout) = other.timeout_ms {
            self.timeout_ms = timeout;
        }
        if let Some(steps) = other.progress_steps {
            self.progress_steps = steps;
        }
        if let Some(capacity) = other.history_capacity {
            self.history_capacity = capacity;
        }
        if let Some(budget) = other.character_budget {
            self.character_budget = budget;
        }
        if let Some(step) = other.training_step_ms {
            self.training_step_ms = step;
        }
    }

    /// Overlay the values set in `file` on top of `self`.
    pub fn overlay(&mut self, file: &Self) {
        self.merge(&SettingsUpdate::from_present(file));
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = reset field to its default
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub latency_ms: Option<Option<u64>>,
    pub timeout_ms: Option<Option<u64>>,
    pub progress_steps: Option<Option<u8>>,
    pub history_capacity: Option<Option<usize>>,
    pub character_budget: Option<Option<usize>>,
    pub training_step_ms: Option<Option<u64>>,
}

impl SettingsUpdate {
    /// Update that sets every field present in `settings` and leaves the rest.
    #[must_use]
    pub fn from_present(settings: &StudioSettings) -> Self {
        Self {
            latency_ms: settings.latency_ms.map(Some),
            timeout_ms: settings.timeout_ms.map(Some),
            progress_steps: settings.progress_steps.map(Some),
            history_capacity: settings.history_capacity.map(Some),
            character_budget: settings.character_budget.map(Some),
            training_step_ms: settings.training_step_ms.map(Some),
        }
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Latency must be between 1 and 60,000 ms, got {0}")]
    InvalidLatency(u64),

    #[error("Timeout ({timeout} ms) must be longer than the latency ({latency} ms)")]
    TimeoutTooShort { timeout: u64, latency: u64 },

    #[error("Progress steps must be at most 100, got {0}")]
    InvalidProgressSteps(u8),

    #[error("History capacity must be between 1 and 1000, got {0}")]
    InvalidHistoryCapacity(usize),

    #[error("Character budget must be at least 1")]
    EmptyCharacterBudget,

    #[error("Training step must be between 1 and 60,000 ms, got {0}")]
    InvalidTrainingStep(u64),

    #[error("Failed to read settings file {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse settings: {0}")]
    Parse(String),
}

/// Validate settings values.
pub fn validate_settings(settings: &StudioSettings) -> Result<(), SettingsError> {
    if let Some(latency) = settings.latency_ms {
        if !(1..=60_000).contains(&latency) {
            return Err(SettingsError::InvalidLatency(latency));
        }
    }

    if let Some(timeout) = settings.timeout_ms {
        let latency = settings.latency_ms.unwrap_or(DEFAULT_LATENCY_MS);
        if timeout <= latency {
            return Err(SettingsError::TimeoutTooShort { timeout, latency });
        }
    }

    if let Some(steps) = settings.progress_steps {
        if steps > 100 {
            return Err(SettingsError::InvalidProgressSteps(steps));
        }
    }

    if let Some(capacity) = settings.history_capacity {
        if !(1..=1000).contains(&capacity) {
            return Err(SettingsError::InvalidHistoryCapacity(capacity));
        }
    }

    if settings.character_budget == Some(0) {
        return Err(SettingsError::EmptyCharacterBudget);
    }

    if let Some(step) = settings.training_step_ms {
        if !(1..=60_000).contains(&step) {
            return Err(SettingsError::InvalidTrainingStep(step));
        }
    }

    Ok(())
}

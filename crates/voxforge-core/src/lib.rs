//! Core domain types and port definitions for the VoxForge synthesis studio.
//!
//! This crate has no runtime dependencies: the job controller, schedulers
//! and async service live in `voxforge-studio` and talk to the rest of the
//! system only through the ports defined here.
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod errors;
pub mod events;
pub mod history;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    AudioRef, Emotion, ParameterSet, ParameterSetBuilder, ResultId, SynthesisRequest,
    SynthesisResult, VoiceFilter, VoiceGender, VoiceId, VoiceKind, VoiceProfile,
    estimate_duration_seconds,
};
pub use errors::{CatalogError, RequestDefect, SubmissionError, SynthesisError, TrainingError};
pub use events::{JobState, StudioEvent, SynthesisEvent, TrainingEvent, TrainingStatus};
pub use history::{DEFAULT_HISTORY_CAPACITY, HistoryLog};
pub use ports::{
    JobTicket, NoopEmitter, Scheduler, StudioError, StudioEventEmitter, StudioPort,
    StudioStatusDto, SynthesisBackend, TicketKind,
};
pub use settings::{SettingsError, SettingsUpdate, StudioSettings, validate_settings};

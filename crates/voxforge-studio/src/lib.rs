//! Synthesis job controller, schedulers, catalog and async studio service.
//!
//! The controller and trainer are synchronous state machines driven by a
//! [`Scheduler`](voxforge_core::ports::Scheduler). [`StudioService`] wires
//! them to the Tokio runtime behind the
//! [`StudioPort`](voxforge_core::ports::StudioPort) trait.
#![deny(unused_crate_dependencies)]

pub mod backend;
pub mod catalog;
pub mod controller;
pub mod scheduler;
pub mod service;
pub mod training;

// Re-export key types for convenience
pub use backend::{ScriptedBackend, SimulatedBackend};
pub use catalog::{VoiceCatalog, builtin_voices};
pub use controller::{ControllerConfig, SynthesisJobController};
pub use scheduler::{ManualScheduler, TokioScheduler};
pub use service::StudioService;
pub use training::{ALLOWED_SAMPLE_EXTENSIONS, TrainerConfig, VoiceTrainer, validate_sample};

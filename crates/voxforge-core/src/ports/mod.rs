//! Port definitions (trait abstractions) for external collaborators.
//!
//! Ports define the interfaces the core expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No tokio types in any signature
//! - Timers are expressed as tickets, never as futures or callbacks
//! - Backends see request snapshots, never live caller state

pub mod backend;
pub mod event_emitter;
pub mod scheduler;
pub mod studio;

pub use backend::SynthesisBackend;
pub use event_emitter::{NoopEmitter, StudioEventEmitter};
pub use scheduler::{JobTicket, Scheduler, TicketKind};
pub use studio::{StudioError, StudioPort, StudioStatusDto};

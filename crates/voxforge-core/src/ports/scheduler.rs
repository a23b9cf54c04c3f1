//! Scheduler port: deferred delivery of job timers.
//!
//! Controllers never sleep or spawn. They hand a [`JobTicket`] to a
//! [`Scheduler`] and are called back through their `fire` method once the
//! ticket is due. Tests drive a virtual clock; production drives
//! `tokio::time`.
//!
//! Cancellation through the scheduler is best-effort. A ticket may still be
//! delivered after its generation was cancelled, so receivers must compare
//! the ticket generation against their own before acting on it.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a due timer means to the job that scheduled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketKind {
    /// Intermediate progress checkpoint, in percent.
    Progress(u8),
    /// Processing finished; produce the outcome.
    Complete,
    /// Upper bound on processing time elapsed.
    Timeout,
}

/// A timer owned by one job generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobTicket {
    pub generation: u64,
    pub kind: TicketKind,
}

impl JobTicket {
    #[must_use]
    pub const fn new(generation: u64, kind: TicketKind) -> Self {
        Self { generation, kind }
    }
}

/// Deferred-callback source used by controllers.
pub trait Scheduler: Send {
    /// Current wall-clock time as the scheduler sees it.
    fn now(&self) -> DateTime<Utc>;

    /// Deliver `ticket` once `after` has elapsed.
    fn schedule(&mut self, ticket: JobTicket, after: Duration);

    /// Drop pending tickets for `generation`, where supported.
    fn cancel_generation(&mut self, generation: u64);
}

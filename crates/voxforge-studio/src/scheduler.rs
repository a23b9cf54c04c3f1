//! Scheduler implementations.
//!
//! - [`ManualScheduler`]: virtual time, advanced explicitly. Deterministic,
//!   used by tests and by any host that owns its own event loop.
//! - [`TokioScheduler`]: one `tokio::time::sleep` task per timer; due
//!   tickets arrive on an unbounded channel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use voxforge_core::ports::{JobTicket, Scheduler};

// ── Manual (virtual time) ──────────────────────────────────────────

#[derive(Debug)]
struct PendingTimer {
    due: Duration,
    seq: u64,
    ticket: JobTicket,
}

#[derive(Debug)]
struct ManualClock {
    origin: DateTime<Utc>,
    elapsed: Duration,
    next_seq: u64,
    timers: Vec<PendingTimer>,
    honour_cancellations: bool,
}

/// Scheduler driven by explicit calls to [`advance`](Self::advance).
///
/// Clones share the same clock and timer queue, so a test can keep one
/// handle while the controller owns another.
#[derive(Debug, Clone)]
pub struct ManualScheduler {
    clock: Arc<Mutex<ManualClock>>,
}

impl ManualScheduler {
    /// Virtual clock starting at the current wall-clock time.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Virtual clock starting at `origin`.
    #[must_use]
    pub fn starting_at(origin: DateTime<Utc>) -> Self {
        Self {
            clock: Arc::new(Mutex::new(ManualClock {
                origin,
                elapsed: Duration::ZERO,
                next_seq: 0,
                timers: Vec::new(),
                honour_cancellations: true,
            })),
        }
    }

    /// Keep cancelled timers queued so they are still delivered.
    ///
    /// Simulates a completion callback racing a cancellation.
    #[must_use]
    pub fn ignore_cancellations(self) -> Self {
        self.lock().honour_cancellations = false;
        self
    }

    /// Move virtual time forward and return every ticket that fell due,
    /// ordered by due time and then by scheduling order.
    pub fn advance(&self, by: Duration) -> Vec<JobTicket> {
        let mut clock = self.lock();
        clock.elapsed += by;
        let now = clock.elapsed;

        let (mut due, pending): (Vec<_>, Vec<_>) =
            clock.timers.drain(..).partition(|t| t.due <= now);
        clock.timers = pending;

        due.sort_by_key(|t| (t.due, t.seq));
        due.into_iter().map(|t| t.ticket).collect()
    }

    /// Time until the earliest queued ticket, if any.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        let clock = self.lock();
        clock
            .timers
            .iter()
            .map(|t| t.due.saturating_sub(clock.elapsed))
            .min()
    }

    /// Virtual time elapsed since the origin.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.lock().elapsed
    }

    /// Number of queued tickets.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.lock().timers.len()
    }

    fn lock(&self) -> MutexGuard<'_, ManualClock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> DateTime<Utc> {
        let clock = self.lock();
        let offset =
            chrono::Duration::from_std(clock.elapsed).unwrap_or_else(|_| chrono::Duration::zero());
        clock.origin + offset
    }

    fn schedule(&mut self, ticket: JobTicket, after: Duration) {
        let mut clock = self.lock();
        let due = clock.elapsed + after;
        let seq = clock.next_seq;
        clock.next_seq += 1;
        clock.timers.push(PendingTimer { due, seq, ticket });
    }

    fn cancel_generation(&mut self, generation: u64) {
        let mut clock = self.lock();
        if clock.honour_cancellations {
            clock.timers.retain(|t| t.ticket.generation != generation);
        }
    }
}

// ── Tokio ──────────────────────────────────────────────────────────

/// Scheduler backed by `tokio::time`.
///
/// Must be used from within a Tokio runtime: every [`schedule`](Scheduler::schedule)
/// call spawns a sleeping task.
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<JobTicket>,
    timers: HashMap<u64, Vec<AbortHandle>>,
}

impl TokioScheduler {
    /// Create a scheduler and the receiver its due tickets arrive on.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<JobTicket>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                timers: HashMap::new(),
            },
            rx,
        )
    }

    /// Number of timer tasks that have not finished yet.
    #[must_use]
    pub fn active_timers(&self) -> usize {
        self.timers
            .values()
            .flatten()
            .filter(|h| !h.is_finished())
            .count()
    }

    fn prune_finished(&mut self) {
        self.timers.retain(|_, handles| {
            handles.retain(|h| !h.is_finished());
            !handles.is_empty()
        });
    }
}

impl Scheduler for TokioScheduler {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn schedule(&mut self, ticket: JobTicket, after: Duration) {
        self.prune_finished();

        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            if tx.send(ticket).is_err() {
                tracing::debug!(?ticket, "Ticket receiver dropped before delivery");
            }
        });

        self.timers
            .entry(ticket.generation)
            .or_default()
            .push(task.abort_handle());
    }

    fn cancel_generation(&mut self, generation: u64) {
        if let Some(handles) = self.timers.remove(&generation) {
            tracing::debug!(generation, timers = handles.len(), "Aborting scheduled timers");
            for handle in handles {
                handle.abort();
            }
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for handle in self.timers.values().flatten() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxforge_core::ports::TicketKind;

    fn ticket(generation: u64, kind: TicketKind) -> JobTicket {
        JobTicket::new(generation, kind)
    }

    #[test]
    fn manual_delivers_in_due_order() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule(ticket(1, TicketKind::Complete), Duration::from_millis(300));
        scheduler.schedule(ticket(1, TicketKind::Progress(50)), Duration::from_millis(100));
        scheduler.schedule(ticket(1, TicketKind::Timeout), Duration::from_millis(300));

        assert!(scheduler.advance(Duration::from_millis(50)).is_empty());
        assert_eq!(
            scheduler.advance(Duration::from_millis(250)),
            vec![
                ticket(1, TicketKind::Progress(50)),
                ticket(1, TicketKind::Complete),
                ticket(1, TicketKind::Timeout),
            ]
        );
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn manual_clock_tracks_virtual_time() {
        let origin = Utc::now();
        let scheduler = ManualScheduler::starting_at(origin);
        scheduler.advance(Duration::from_secs(3));

        assert_eq!(scheduler.elapsed(), Duration::from_secs(3));
        assert_eq!(scheduler.now(), origin + chrono::Duration::seconds(3));
    }

    #[test]
    fn manual_cancel_drops_generation() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule(ticket(1, TicketKind::Complete), Duration::from_secs(1));
        scheduler.schedule(ticket(2, TicketKind::Complete), Duration::from_secs(1));
        scheduler.cancel_generation(1);

        assert_eq!(
            scheduler.advance(Duration::from_secs(1)),
            vec![ticket(2, TicketKind::Complete)]
        );
    }

    #[test]
    fn ignoring_cancellations_keeps_timers() {
        let mut scheduler = ManualScheduler::new().ignore_cancellations();
        scheduler.schedule(ticket(1, TicketKind::Complete), Duration::from_secs(1));
        scheduler.cancel_generation(1);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn next_due_reports_earliest_timer() {
        let mut scheduler = ManualScheduler::new();
        assert_eq!(scheduler.next_due(), None);
        scheduler.schedule(ticket(1, TicketKind::Complete), Duration::from_millis(900));
        scheduler.schedule(ticket(1, TicketKind::Progress(20)), Duration::from_millis(200));
        scheduler.advance(Duration::from_millis(150));
        assert_eq!(scheduler.next_due(), Some(Duration::from_millis(50)));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_scheduler_delivers_after_delay() {
        let (mut scheduler, mut rx) = TokioScheduler::new();
        scheduler.schedule(ticket(7, TicketKind::Complete), Duration::from_secs(2));

        let delivered = rx.recv().await;
        assert_eq!(delivered, Some(ticket(7, TicketKind::Complete)));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_scheduler_cancel_aborts_timers() {
        let (mut scheduler, mut rx) = TokioScheduler::new();
        scheduler.schedule(ticket(1, TicketKind::Complete), Duration::from_secs(1));
        scheduler.schedule(ticket(2, TicketKind::Complete), Duration::from_secs(2));
        scheduler.cancel_generation(1);

        assert_eq!(rx.recv().await, Some(ticket(2, TicketKind::Complete)));
        tokio::task::yield_now().await;
        assert_eq!(scheduler.active_timers(), 0);
    }
}

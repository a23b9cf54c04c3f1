//! Event emitter trait for broadcasting studio events.
//!
//! Implementations handle transport details (terminal progress bars,
//! channels, log sinks).

use crate::events::StudioEvent;

/// Trait for emitting studio events.
///
/// # Implementations
///
/// - `NoopEmitter` - For tests and contexts without an observer
/// - Adapter-specific implementations (CLI progress bars, etc.)
pub trait StudioEventEmitter: Send + Sync {
    /// Emit a studio event. Must not block.
    fn emit(&self, event: StudioEvent);

    /// Clone this emitter into a boxed trait object.
    fn clone_box(&self) -> Box<dyn StudioEventEmitter>;
}

/// A no-op event emitter for tests and headless contexts.
#[derive(Debug, Clone, Default)]
pub struct NoopEmitter;

impl NoopEmitter {
    /// Create a new no-op emitter.
    pub const fn new() -> Self {
        Self
    }
}

impl StudioEventEmitter for NoopEmitter {
    fn emit(&self, _event: StudioEvent) {
        // Intentionally do nothing
    }

    fn clone_box(&self) -> Box<dyn StudioEventEmitter> {
        Box::new(self.clone())
    }
}

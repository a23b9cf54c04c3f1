//! Synthesis backend port.
//!
//! The backend is consulted once per accepted job, when its completion
//! timer fires. It turns a request snapshot into an audio handle or a
//! [`SynthesisError`]; transport details never leak past this boundary.

use crate::domain::{AudioRef, SynthesisRequest};
use crate::errors::SynthesisError;

/// Engine-agnostic renderer for synthesis requests.
pub trait SynthesisBackend: Send + Sync {
    /// Produce audio for `request`.
    fn render(&self, request: &SynthesisRequest) -> Result<AudioRef, SynthesisError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

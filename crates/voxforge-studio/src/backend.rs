//! Synthesis backends.
//!
//! No real engine ships with the studio. [`SimulatedBackend`] hands out
//! opaque audio tokens; [`ScriptedBackend`] replays queued outcomes so
//! callers can exercise failure paths.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use uuid::Uuid;
use voxforge_core::domain::{AudioRef, SynthesisRequest};
use voxforge_core::errors::SynthesisError;
use voxforge_core::ports::SynthesisBackend;

/// Backend that always succeeds with a fresh `generated-audio-*.mp3` token.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedBackend;

impl SimulatedBackend {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn audio_token() -> AudioRef {
        AudioRef::new(format!("generated-audio-{}.mp3", Uuid::new_v4().simple()))
    }
}

impl SynthesisBackend for SimulatedBackend {
    fn render(&self, request: &SynthesisRequest) -> Result<AudioRef, SynthesisError> {
        let audio = Self::audio_token();
        tracing::debug!(
            voice = %request.parameters().voice_id(),
            chars = request.char_count(),
            audio = %audio,
            "Simulated render"
        );
        Ok(audio)
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

/// Backend that replays queued outcomes in order.
///
/// Once the script is exhausted it behaves like [`SimulatedBackend`].
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<AudioRef, SynthesisError>>>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful render returning `audio`.
    #[must_use]
    pub fn then_succeed(self, audio: impl Into<String>) -> Self {
        self.push(Ok(AudioRef::new(audio)));
        self
    }

    /// Queue a failed render.
    #[must_use]
    pub fn then_fail(self, error: SynthesisError) -> Self {
        self.push(Err(error));
        self
    }

    /// Number of render calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn push(&self, outcome: Result<AudioRef, SynthesisError>) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome);
    }
}

impl SynthesisBackend for ScriptedBackend {
    fn render(&self, _request: &SynthesisRequest) -> Result<AudioRef, SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Ok(SimulatedBackend::audio_token()))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

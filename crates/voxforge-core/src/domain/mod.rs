//! Domain types for the synthesis studio.
//!
//! These are pure data types with no runtime or scheduling dependencies.

pub mod parameters;
pub mod request;
pub mod voice;

pub use parameters::{
    DEFAULT_LANGUAGE, Emotion, PITCH_RANGE, ParameterSet, ParameterSetBuilder, SPEED_RANGE,
    UNIT_RANGE, UnknownEmotion, VoiceId,
};
pub use request::{
    AudioRef, CHARS_PER_SECOND, PREVIEW_CHARS, ResultId, SynthesisRequest, SynthesisResult,
    estimate_duration_seconds,
};
pub use voice::{VoiceFilter, VoiceGender, VoiceKind, VoiceProfile};

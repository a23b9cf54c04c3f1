//! Generation parameters captured for a single synthesis request.
//!
//! A [`ParameterSet`] is an immutable snapshot of every voice-shaping
//! control the studio exposes. It is built through [`ParameterSetBuilder`],
//! which clamps each numeric control to its documented range the same way
//! the slider inputs upstream do.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Valid range for stability, similarity, style and emphasis.
pub const UNIT_RANGE: RangeInclusive<f32> = 0.0..=1.0;

/// Valid range for the speed multiplier.
pub const SPEED_RANGE: RangeInclusive<f32> = 0.5..=2.0;

/// Valid range for the pitch shift, in semitones.
pub const PITCH_RANGE: RangeInclusive<f32> = -12.0..=12.0;

/// Default language tag for new parameter sets.
pub const DEFAULT_LANGUAGE: &str = "en";

// ── Voice identifier ───────────────────────────────────────────────

/// Identifier referencing a voice profile in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct VoiceId(String);

impl VoiceId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether no voice has been selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VoiceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for VoiceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// ── Emotion ────────────────────────────────────────────────────────

/// Emotional colouring applied to the generated speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    #[default]
    Neutral,
    Happy,
    Sad,
    Excited,
    Calm,
    Angry,
}

impl Emotion {
    /// Every emotion, in the order the studio lists them.
    pub const ALL: [Self; 6] = [
        Self::Neutral,
        Self::Happy,
        Self::Sad,
        Self::Excited,
        Self::Calm,
        Self::Angry,
    ];

    /// Lowercase label used on the wire and in the CLI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Excited => "excited",
            Self::Calm => "calm",
            Self::Angry => "angry",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an emotion label that is not in [`Emotion::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown emotion '{0}' (expected one of: neutral, happy, sad, excited, calm, angry)")]
pub struct UnknownEmotion(pub String);

impl FromStr for Emotion {
    type Err = UnknownEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == wanted)
            .ok_or_else(|| UnknownEmotion(s.to_string()))
    }
}

// ── Parameter set ──────────────────────────────────────────────────

/// Immutable snapshot of user-chosen generation parameters.
///
/// All numeric fields are guaranteed to lie within their ranges when the
/// value comes out of [`ParameterSetBuilder::build`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSet {
    voice_id: VoiceId,
    stability: f32,
    similarity: f32,
    style: f32,
    emphasis: f32,
    speed: f32,
    pitch: f32,
    emotion: Emotion,
    use_speaker_boost: bool,
    language: String,
}

impl ParameterSet {
    /// Start building a parameter set for the given voice, with studio defaults.
    pub fn builder(voice_id: impl Into<VoiceId>) -> ParameterSetBuilder {
        ParameterSetBuilder::new(voice_id)
    }

    /// Studio defaults for the given voice.
    pub fn for_voice(voice_id: impl Into<VoiceId>) -> Self {
        Self::builder(voice_id).build()
    }

    /// Derive a builder pre-filled with this set's values.
    #[must_use]
    pub fn to_builder(&self) -> ParameterSetBuilder {
        ParameterSetBuilder { inner: self.clone() }
    }

    #[must_use]
    pub const fn voice_id(&self) -> &VoiceId {
        &self.voice_id
    }

    #[must_use]
    pub const fn stability(&self) -> f32 {
        self.stability
    }

    #[must_use]
    pub const fn similarity(&self) -> f32 {
        self.similarity
    }

    #[must_use]
    pub const fn style(&self) -> f32 {
        self.style
    }

    #[must_use]
    pub const fn emphasis(&self) -> f32 {
        self.emphasis
    }

    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Pitch shift in semitones.
    #[must_use]
    pub const fn pitch(&self) -> f32 {
        self.pitch
    }

    #[must_use]
    pub const fn emotion(&self) -> Emotion {
        self.emotion
    }

    #[must_use]
    pub const fn use_speaker_boost(&self) -> bool {
        self.use_speaker_boost
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Check that every numeric control sits inside its range.
    ///
    /// Always true for values produced by the builder; values that arrive
    /// through deserialization are not clamped and can fail this check.
    #[must_use]
    pub fn is_within_bounds(&self) -> bool {
        [self.stability, self.similarity, self.style, self.emphasis]
            .iter()
            .all(|v| UNIT_RANGE.contains(v))
            && SPEED_RANGE.contains(&self.speed)
            && PITCH_RANGE.contains(&self.pitch)
    }
}

/// Builder for [`ParameterSet`].
///
/// Every setter clamps into range; non-finite input leaves the current
/// value untouched.
#[derive(Debug, Clone)]
pub struct ParameterSetBuilder {
    inner: ParameterSet,
}

impl ParameterSetBuilder {
    fn new(voice_id: impl Into<VoiceId>) -> Self {
        Self {
            inner: ParameterSet {
                voice_id: voice_id.into(),
                stability: 0.5,
                similarity: 0.75,
                style: 0.0,
                emphasis: 0.5,
                speed: 1.0,
                pitch: 0.0,
                emotion: Emotion::Neutral,
                use_speaker_boost: true,
                language: DEFAULT_LANGUAGE.to_string(),
            },
        }
    }

    #[must_use]
    pub fn voice(mut self, voice_id: impl Into<VoiceId>) -> Self {
        self.inner.voice_id = voice_id.into();
        self
    }

    #[must_use]
    pub fn stability(mut self, value: f32) -> Self {
        self.inner.stability = clamp_into(value, &UNIT_RANGE, self.inner.stability);
        self
    }

    #[must_use]
    pub fn similarity(mut self, value: f32) -> Self {
        self.inner.similarity = clamp_into(value, &UNIT_RANGE, self.inner.similarity);
        self
    }

    #[must_use]
    pub fn style(mut self, value: f32) -> Self {
        self.inner.style = clamp_into(value, &UNIT_RANGE, self.inner.style);
        self
    }

    #[must_use]
    pub fn emphasis(mut self, value: f32) -> Self {
        self.inner.emphasis = clamp_into(value, &UNIT_RANGE, self.inner.emphasis);
        self
    }

    #[must_use]
    pub fn speed(mut self, value: f32) -> Self {
        self.inner.speed = clamp_into(value, &SPEED_RANGE, self.inner.speed);
        self
    }

    #[must_use]
    pub fn pitch(mut self, semitones: f32) -> Self {
        self.inner.pitch = clamp_into(semitones, &PITCH_RANGE, self.inner.pitch);
        self
    }

    #[must_use]
    pub const fn emotion(mut self, emotion: Emotion) -> Self {
        self.inner.emotion = emotion;
        self
    }

    #[must_use]
    pub const fn speaker_boost(mut self, enabled: bool) -> Self {
        self.inner.use_speaker_boost = enabled;
        self
    }

    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.inner.language = language.into();
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> ParameterSet {
        self.inner
    }
}

fn clamp_into(value: f32, range: &RangeInclusive<f32>, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        fallback
    }
}

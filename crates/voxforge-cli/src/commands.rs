//! Main commands enum and primary subcommands.
//!
//! This module defines the available commands for the CLI tool.

use clap::{Args, Subcommand};

use voxforge_core::domain::{Emotion, ParameterSet, VoiceKind};

use crate::config_commands::ConfigCommand;

/// Available commands for the synthesis studio.
#[derive(Subcommand)]
pub enum Commands {
    /// List voices in the catalog
    Voices {
        /// Only show voices of this kind (preset, professional, custom)
        #[arg(short, long)]
        kind: Option<VoiceKind>,
        /// Case-insensitive search over name, description and tags
        #[arg(short, long)]
        search: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Generate speech for a piece of text and print the result
    Speak(SpeakArgs),

    /// Clone a voice from an audio sample (simulated training)
    Clone {
        /// Name for the new voice
        name: String,
        /// Audio sample file name (wav, mp3, m4a, flac or ogg)
        #[arg(short, long)]
        sample: String,
    },

    /// Interactive studio session with history
    Studio {
        /// Voice to start with
        #[arg(long, default_value = "rachel-premium")]
        voice: String,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `speak`.
#[derive(Args, Debug, Clone)]
pub struct SpeakArgs {
    /// Text to synthesize
    pub text: String,

    /// Voice id (see `voxforge voices`)
    #[arg(long, default_value = "rachel-premium")]
    pub voice: String,

    #[command(flatten)]
    pub tuning: TuningArgs,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Generation parameter flags shared by the one-shot and interactive surfaces.
///
/// Out-of-range values are clamped to the nearest bound.
#[derive(Args, Debug, Clone, Default)]
pub struct TuningArgs {
    /// Stability (0.0-1.0)
    #[arg(long)]
    pub stability: Option<f32>,
    /// Similarity boost (0.0-1.0)
    #[arg(long)]
    pub similarity: Option<f32>,
    /// Style exaggeration (0.0-1.0)
    #[arg(long)]
    pub style: Option<f32>,
    /// Emphasis (0.0-1.0)
    #[arg(long)]
    pub emphasis: Option<f32>,
    /// Speaking speed (0.5-2.0)
    #[arg(long)]
    pub speed: Option<f32>,
    /// Pitch shift in semitones (-12 to 12)
    #[arg(long, allow_hyphen_values = true)]
    pub pitch: Option<f32>,
    /// Emotion (neutral, happy, sad, excited, calm, angry)
    #[arg(long)]
    pub emotion: Option<Emotion>,
    /// Disable speaker boost
    #[arg(long)]
    pub no_speaker_boost: bool,
    /// Language tag
    #[arg(long)]
    pub language: Option<String>,
}

impl TuningArgs {
    /// Parameter set for `voice` with these flags applied over the defaults.
    #[must_use]
    pub fn to_parameters(&self, voice: &str) -> ParameterSet {
        let mut builder = ParameterSet::builder(voice);
        if let Some(v) = self.stability {
            builder = builder.stability(v);
        }
        if let Some(v) = self.similarity {
            builder = builder.similarity(v);
        }
        if let Some(v) = self.style {
            builder = builder.style(v);
        }
        if let Some(v) = self.emphasis {
            builder = builder.emphasis(v);
        }
        if let Some(v) = self.speed {
            builder = builder.speed(v);
        }
        if let Some(v) = self.pitch {
            builder = builder.pitch(v);
        }
        if let Some(emotion) = self.emotion {
            builder = builder.emotion(emotion);
        }
        if let Some(language) = &self.language {
            builder = builder.language(language.clone());
        }
        builder.speaker_boost(!self.no_speaker_boost).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Cli;
    use clap::Parser;

    #[test]
    fn speak_flags_build_parameters() {
        let cli = Cli::parse_from([
            "voxforge",
            "speak",
            "Hello there",
            "--voice",
            "adam-deep",
            "--speed",
            "3.5",
            "--pitch",
            "-4",
            "--emotion",
            "calm",
            "--no-speaker-boost",
        ]);
        let Some(Commands::Speak(args)) = cli.command else {
            panic!("expected speak command");
        };

        let params = args.tuning.to_parameters(&args.voice);
        assert_eq!(params.voice_id().as_str(), "adam-deep");
        assert!((params.speed() - 2.0).abs() < f32::EPSILON);
        assert!((params.pitch() + 4.0).abs() < f32::EPSILON);
        assert_eq!(params.emotion(), Emotion::Calm);
        assert!(!params.use_speaker_boost());
        assert!((params.stability() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn voices_kind_is_parsed() {
        let cli = Cli::parse_from(["voxforge", "voices", "--kind", "custom", "--json"]);
        let Some(Commands::Voices { kind, json, .. }) = cli.command else {
            panic!("expected voices command");
        };
        assert_eq!(kind, Some(VoiceKind::Custom));
        assert!(json);
    }

    #[test]
    fn unknown_emotion_is_rejected() {
        let result = Cli::try_parse_from(["voxforge", "speak", "Hi", "--emotion", "bored"]);
        assert!(result.is_err());
    }

    #[test]
    fn clone_requires_sample() {
        assert!(Cli::try_parse_from(["voxforge", "clone", "My Voice"]).is_err());
        let cli = Cli::parse_from(["voxforge", "clone", "My Voice", "--sample", "take.wav"]);
        assert!(matches!(cli.command, Some(Commands::Clone { .. })));
    }
}

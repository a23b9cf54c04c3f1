//! Interactive studio session.
//!
//! A line-oriented REPL over one studio: the session keeps a working
//! parameter set, generates with `say`, and shows the session history.
//! Input is read with `rustyline` on a blocking section of the runtime so
//! the studio's timer tasks keep running while the prompt is open.

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use voxforge_core::domain::{Emotion, ParameterSet, VoiceFilter, VoiceId};
use voxforge_core::ports::StudioError;

use crate::bootstrap::CliContext;
use crate::handlers::clone::clone_interruptible;
use crate::handlers::speak::generate_interruptible;
use crate::presentation::{print_history, print_result, print_voices};

const HELP: &str = "\
Commands:
  say <text>             Generate speech with the current settings
  voice <id>             Switch to another voice
  set <param> <value>    Change a parameter (stability, similarity, style,
                         emphasis, speed, pitch, emotion, boost, language)
  reset                  Restore default parameters for the current voice
  params                 Show the current parameters
  history                Show this session's generations, newest first
  clear                  Clear the session history
  voices [search]        List voices
  clone <name> <sample>  Train a custom voice from a sample file
  remove <id>            Remove a custom voice
  status                 Show studio status
  help                   Show this help
  quit | exit            Leave the studio";

/// One change to the working parameter set.
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    Stability(f32),
    Similarity(f32),
    Style(f32),
    Emphasis(f32),
    Speed(f32),
    Pitch(f32),
    Emotion(Emotion),
    SpeakerBoost(bool),
    Language(String),
}

impl Setting {
    /// Parse `set <name> <value>` arguments.
    fn parse(name: &str, value: &str) -> Result<Self, String> {
        let number = || {
            value
                .parse::<f32>()
                .map_err(|_| format!("'{value}' is not a number"))
        };
        match name.to_ascii_lowercase().as_str() {
            "stability" => number().map(Self::Stability),
            "similarity" => number().map(Self::Similarity),
            "style" => number().map(Self::Style),
            "emphasis" => number().map(Self::Emphasis),
            "speed" => number().map(Self::Speed),
            "pitch" => number().map(Self::Pitch),
            "emotion" => value
                .parse::<Emotion>()
                .map(Self::Emotion)
                .map_err(|e| e.to_string()),
            "boost" => match value.to_ascii_lowercase().as_str() {
                "on" | "true" | "yes" => Ok(Self::SpeakerBoost(true)),
                "off" | "false" | "no" => Ok(Self::SpeakerBoost(false)),
                _ => Err(format!("'{value}' is not on/off")),
            },
            "language" => Ok(Self::Language(value.to_string())),
            other => Err(format!("Unknown parameter '{other}'")),
        }
    }

    /// Apply this change; numeric values are clamped by the builder.
    #[must_use]
    pub fn apply(self, params: &ParameterSet) -> ParameterSet {
        let builder = params.to_builder();
        match self {
            Self::Stability(v) => builder.stability(v),
            Self::Similarity(v) => builder.similarity(v),
            Self::Style(v) => builder.style(v),
            Self::Emphasis(v) => builder.emphasis(v),
            Self::Speed(v) => builder.speed(v),
            Self::Pitch(v) => builder.pitch(v),
            Self::Emotion(e) => builder.emotion(e),
            Self::SpeakerBoost(on) => builder.speaker_boost(on),
            Self::Language(tag) => builder.language(tag),
        }
        .build()
    }
}

/// A parsed REPL line.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Say(String),
    Voice(String),
    Set(Setting),
    Reset,
    Params,
    History,
    Clear,
    Voices(Option<String>),
    Clone { name: String, sample: String },
    Remove(String),
    Status,
    Help,
    Quit,
    Empty,
}

/// Parse one line of REPL input.
pub fn parse_line(line: &str) -> Result<ReplCommand, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ReplCommand::Empty);
    }

    let (head, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(h, r)| (h, r.trim()));

    match head.to_ascii_lowercase().as_str() {
        "say" if rest.is_empty() => Err("Usage: say <text>".to_string()),
        "say" => Ok(ReplCommand::Say(rest.to_string())),
        "voice" if rest.is_empty() => Err("Usage: voice <id>".to_string()),
        "voice" => Ok(ReplCommand::Voice(rest.to_string())),
        "set" => {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(value), None) => {
                    Setting::parse(name, value).map(ReplCommand::Set)
                }
                _ => Err("Usage: set <param> <value>".to_string()),
            }
        }
        "reset" => Ok(ReplCommand::Reset),
        "params" => Ok(ReplCommand::Params),
        "history" => Ok(ReplCommand::History),
        "clear" => Ok(ReplCommand::Clear),
        "voices" => Ok(ReplCommand::Voices(
            (!rest.is_empty()).then(|| rest.to_string()),
        )),
        "clone" => match rest.rsplit_once(char::is_whitespace) {
            Some((name, sample)) if !name.trim().is_empty() => Ok(ReplCommand::Clone {
                name: name.trim().to_string(),
                sample: sample.to_string(),
            }),
            _ => Err("Usage: clone <name> <sample>".to_string()),
        },
        "remove" if rest.is_empty() => Err("Usage: remove <id>".to_string()),
        "remove" => Ok(ReplCommand::Remove(rest.to_string())),
        "status" => Ok(ReplCommand::Status),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" => Ok(ReplCommand::Quit),
        other => Err(format!("Unknown command '{other}' (try 'help')")),
    }
}

fn print_params(params: &ParameterSet) {
    println!("  voice:      {}", params.voice_id());
    println!("  stability:  {:.2}", params.stability());
    println!("  similarity: {:.2}", params.similarity());
    println!("  style:      {:.2}", params.style());
    println!("  emphasis:   {:.2}", params.emphasis());
    println!("  speed:      {:.2}x", params.speed());
    println!("  pitch:      {:+.1}", params.pitch());
    println!("  emotion:    {}", params.emotion());
    println!(
        "  boost:      {}",
        if params.use_speaker_boost() { "on" } else { "off" }
    );
    println!("  language:   {}", params.language());
}

/// Execute the studio command.
///
/// Runs until `quit`, Ctrl+D, or Ctrl+C at an empty prompt.
pub async fn execute(ctx: &CliContext, voice: String) -> Result<()> {
    let studio = ctx.studio();
    let mut params = ParameterSet::for_voice(voice);
    let mut editor = DefaultEditor::new()?;

    println!("VoxForge studio. Type 'help' for commands.");

    loop {
        let prompt = format!("{}> ", params.voice_id());
        let line = match tokio::task::block_in_place(|| editor.readline(&prompt)) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        if !line.trim().is_empty() {
            editor.add_history_entry(line.as_str()).ok();
        }

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            ReplCommand::Empty => {}
            ReplCommand::Quit => break,
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Say(text) => {
                match generate_interruptible(studio.as_ref(), text, params.clone()).await {
                    Ok(result) => print_result(&result),
                    Err(StudioError::Cancelled) => println!("Cancelled."),
                    Err(err) => println!("✗ {err}"),
                }
            }
            ReplCommand::Voice(id) => {
                let id = VoiceId::new(id);
                let known = studio
                    .list_voices(&VoiceFilter::all())
                    .await
                    .iter()
                    .any(|v| v.id == id);
                if known {
                    params = params.to_builder().voice(id).build();
                } else {
                    println!("✗ {}", StudioError::UnknownVoice(id));
                }
            }
            ReplCommand::Set(setting) => {
                params = setting.apply(&params);
                print_params(&params);
            }
            ReplCommand::Reset => {
                params = ParameterSet::for_voice(params.voice_id().clone());
                print_params(&params);
            }
            ReplCommand::Params => print_params(&params),
            ReplCommand::History => print_history(&studio.history().await),
            ReplCommand::Clear => {
                studio.clear_history().await;
                println!("History cleared.");
            }
            ReplCommand::Voices(search) => {
                let filter =
                    search.map_or_else(VoiceFilter::all, |s| VoiceFilter::all().with_search(s));
                print_voices(&studio.list_voices(&filter).await);
            }
            ReplCommand::Clone { name, sample } => {
                match clone_interruptible(studio.as_ref(), name, sample).await {
                    Ok(voice) => {
                        println!("✓ Voice '{}' is ready as {}", voice.name, voice.id);
                        println!("  Switch to it with: voice {}", voice.id);
                    }
                    Err(StudioError::Cancelled) => println!("Cancelled."),
                    Err(err) => println!("✗ {err}"),
                }
            }
            ReplCommand::Remove(id) => match studio.remove_voice(&VoiceId::new(id)).await {
                Ok(voice) => {
                    println!("Removed '{}'.", voice.name);
                    if params.voice_id() == &voice.id {
                        println!("That was the current voice; pick another with 'voice <id>'.");
                    }
                }
                Err(err) => println!("✗ {err}"),
            },
            ReplCommand::Status => {
                let status = studio.status().await;
                println!("  state:    {}", status.state);
                println!(
                    "  history:  {}/{}",
                    status.history_len, status.history_capacity
                );
                println!("  voices:   {}", status.voice_count);
                println!(
                    "  training: {} ({}%)",
                    status.training, status.training_progress
                );
            }
        }
    }

    tracing::debug!("Studio session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_say_and_voice() {
        assert_eq!(
            parse_line("say Hello there  ").unwrap(),
            ReplCommand::Say("Hello there".to_string())
        );
        assert_eq!(
            parse_line("VOICE adam-deep").unwrap(),
            ReplCommand::Voice("adam-deep".to_string())
        );
        assert!(parse_line("say").is_err());
        assert_eq!(parse_line("   ").unwrap(), ReplCommand::Empty);
    }

    #[test]
    fn parses_settings() {
        assert_eq!(
            parse_line("set speed 1.5").unwrap(),
            ReplCommand::Set(Setting::Speed(1.5))
        );
        assert_eq!(
            parse_line("set emotion happy").unwrap(),
            ReplCommand::Set(Setting::Emotion(Emotion::Happy))
        );
        assert_eq!(
            parse_line("set boost off").unwrap(),
            ReplCommand::Set(Setting::SpeakerBoost(false))
        );
        assert!(parse_line("set speed fast").is_err());
        assert!(parse_line("set volume 3").is_err());
        assert!(parse_line("set speed").is_err());
    }

    #[test]
    fn parses_simple_commands() {
        assert_eq!(parse_line("voices").unwrap(), ReplCommand::Voices(None));
        assert_eq!(
            parse_line("voices deep").unwrap(),
            ReplCommand::Voices(Some("deep".to_string()))
        );
        assert_eq!(parse_line("exit").unwrap(), ReplCommand::Quit);
        assert_eq!(parse_line("?").unwrap(), ReplCommand::Help);
        assert!(parse_line("dance").is_err());
    }

    #[test]
    fn parses_clone_and_remove() {
        assert_eq!(
            parse_line("clone My Narrator narration.wav").unwrap(),
            ReplCommand::Clone {
                name: "My Narrator".to_string(),
                sample: "narration.wav".to_string(),
            }
        );
        assert!(parse_line("clone narration.wav").is_err());
        assert!(parse_line("clone").is_err());

        assert_eq!(
            parse_line("remove 1f561b78").unwrap(),
            ReplCommand::Remove("1f561b78".to_string())
        );
        assert!(parse_line("remove").is_err());
    }

    #[test]
    fn settings_are_clamped_on_apply() {
        let params = ParameterSet::for_voice("preset_1");
        let params = Setting::Pitch(-30.0).apply(&params);
        assert!((params.pitch() + 12.0).abs() < f32::EPSILON);

        let params = Setting::Language("de".to_string()).apply(&params);
        assert_eq!(params.language(), "de");
        assert!((params.pitch() + 12.0).abs() < f32::EPSILON);
    }
}

//! Table formatting utilities for CLI output.

use chrono::Local;
use voxforge_core::domain::{SynthesisResult, VoiceProfile};

/// Truncates a string to a maximum number of characters, adding "..." if needed.
///
/// # Examples
///
/// ```rust
/// use voxforge_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("Hello", 10), "Hello");
/// assert_eq!(truncate_string("Hello World", 8), "Hello...");
/// ```
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Print voices as a table.
pub fn print_voices(voices: &[VoiceProfile]) {
    println!(
        "{:<38} {:<20} {:<13} {:<14} {:<8} Tags",
        "ID", "Name", "Kind", "Language", "Gender"
    );
    print_separator(110);

    for voice in voices {
        let name = if voice.is_premium {
            format!("{} *", voice.name)
        } else {
            voice.name.clone()
        };
        println!(
            "{:<38} {:<20} {:<13} {:<14} {:<8} {}",
            truncate_string(voice.id.as_str(), 37),
            truncate_string(&name, 19),
            voice.kind.as_str(),
            truncate_string(&voice.language, 13),
            voice.gender.to_string(),
            voice.tags.join(", ")
        );
    }
}

/// Print a single synthesis result.
pub fn print_result(result: &SynthesisResult) {
    let params = result.source_request.parameters();
    println!("✓ Generated {}", result.audio_ref);
    println!("  Result:   {}", result.id);
    println!("  Voice:    {}", params.voice_id());
    println!("  Duration: ~{}s", result.duration_estimate_seconds);
    println!(
        "  Settings: stability {:.2}, similarity {:.2}, speed {:.2}x, pitch {:+.1}, {}",
        params.stability(),
        params.similarity(),
        params.speed(),
        params.pitch(),
        params.emotion()
    );
}

/// Print session history, most recent first.
pub fn print_history(history: &[SynthesisResult]) {
    if history.is_empty() {
        println!("No generations yet.");
        return;
    }

    println!("{:<3} {:<9} {:<18} {:<6} Text", "#", "Time", "Voice", "Dur");
    print_separator(90);
    for (index, result) in history.iter().enumerate() {
        println!(
            "{:<3} {:<9} {:<18} {:<6} {}",
            index + 1,
            result
                .completed_at
                .with_timezone(&Local)
                .format("%H:%M:%S")
                .to_string(),
            truncate_string(result.source_request.parameters().voice_id().as_str(), 17),
            format!("{}s", result.duration_estimate_seconds),
            result.preview()
        );
    }
}

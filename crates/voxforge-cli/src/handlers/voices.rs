//! Voices command handler.
//!
//! Lists the catalog, optionally narrowed by kind and a search string.

use anyhow::Result;
use voxforge_core::domain::{VoiceFilter, VoiceKind};

use crate::bootstrap::CliContext;
use crate::presentation::print_voices;

/// Execute the voices command.
///
/// # Arguments
///
/// * `ctx` - The CLI context providing access to the studio
/// * `kind` - Only list voices of this kind
/// * `search` - Case-insensitive search over name, description and tags
/// * `json` - Print a JSON array instead of a table
pub async fn execute(
    ctx: &CliContext,
    kind: Option<VoiceKind>,
    search: Option<String>,
    json: bool,
) -> Result<()> {
    let filter = build_filter(kind, search);
    let voices = ctx.studio().list_voices(&filter).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&voices)?);
        return Ok(());
    }

    if voices.is_empty() {
        println!("No voices match.");
        return Ok(());
    }

    println!("Found {} voice(s):\n", voices.len());
    print_voices(&voices);
    Ok(())
}

fn build_filter(kind: Option<VoiceKind>, search: Option<String>) -> VoiceFilter {
    let mut filter = VoiceFilter::all();
    if let Some(kind) = kind {
        filter = filter.with_kind(kind);
    }
    if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
        filter = filter.with_search(search);
    }
    filter
}

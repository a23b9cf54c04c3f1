//! Clone command handler.

use anyhow::Result;
use voxforge_core::domain::VoiceProfile;
use voxforge_core::ports::{StudioError, StudioPort};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::speak::{ctrl_c, until_interrupted};

/// Execute the clone command.
///
/// Runs a simulated training job for `sample` and registers the resulting
/// voice under `name`. Ctrl+C cancels the job. The catalog lives only as
/// long as this process, so the new voice is reported but cannot be used
/// by a later `speak`; clone inside `voxforge studio` to synthesize with it.
pub async fn execute(ctx: &CliContext, name: String, sample: String) -> Result<()> {
    let voice = clone_interruptible(ctx.studio().as_ref(), name, sample)
        .await
        .map_err(CliError::from)?;

    println!("✓ Voice '{}' trained", voice.name);
    println!("  ID: {}", voice.id);
    println!("  Custom voices last for one session. To speak with one, run");
    println!("  `voxforge studio` and use `clone <name> <sample>` there.");
    Ok(())
}

/// Clone, cancelling the training run if the user presses Ctrl+C first.
pub(crate) async fn clone_interruptible(
    studio: &dyn StudioPort,
    name: String,
    sample: String,
) -> Result<VoiceProfile, StudioError> {
    until_interrupted(
        studio.clone_voice(name, sample),
        ctrl_c(),
        studio.cancel_training(),
    )
    .await
}

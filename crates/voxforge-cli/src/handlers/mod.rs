//! Command handlers that delegate to the studio.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that:
//!   1. Turn CLI arguments into domain values
//!   2. Call [`StudioPort`](voxforge_core::ports::StudioPort) methods
//!   3. Format output for the terminal
//!
//! Studio errors are converted to [`CliError`](crate::error::CliError) so
//! `main` can pick the exit code.

pub mod clone;
pub mod config;
pub mod speak;
pub mod studio;
pub mod voices;

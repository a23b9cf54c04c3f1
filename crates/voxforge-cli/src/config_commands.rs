//! Configuration subcommands.

use clap::Subcommand;

/// Configuration commands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective settings (defaults, config file, env, flags) as JSON
    Show,
    /// Check a settings file without running anything
    Validate {
        /// Path to the JSON settings file
        path: std::path::PathBuf,
    },
}

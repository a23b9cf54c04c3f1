//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the VoxForge synthesis studio.
///
/// Global options shape the studio settings; subcommands pick the surface.
#[derive(Parser)]
#[command(name = "voxforge")]
#[command(about = "Simulated speech-synthesis studio")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// JSON settings file layered over the defaults
    #[arg(long = "config", global = true, env = "VOXFORGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Simulated processing time per request, in milliseconds
    #[arg(long = "latency-ms", global = true, env = "VOXFORGE_LATENCY_MS")]
    pub latency_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

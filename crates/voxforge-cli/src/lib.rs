#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

//! Terminal adapter for the VoxForge synthesis studio.
//!
//! The binary in `main.rs` parses arguments, builds a [`CliContext`] through
//! [`bootstrap`] and hands it to one of the [`handlers`].

// Used only by the binary entry point
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod config_commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::{Commands, SpeakArgs, TuningArgs};
pub use config_commands::ConfigCommand;
pub use error::CliError;
pub use parser::Cli;

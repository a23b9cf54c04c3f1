//! Shared CLI presentation utilities.
//!
//! This module provides reusable display and formatting functions
//! for consistent CLI output across commands.
//!
//! # Guidelines
//!
//! - Keep this module format-only: no domain transforms
//! - Progress rendering reacts to studio events; it never drives the studio

pub mod progress;
pub mod tables;

// Re-export commonly used items
pub use progress::TerminalProgress;
pub use tables::{print_history, print_result, print_separator, print_voices, truncate_string};

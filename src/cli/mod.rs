//! CLI module for the Pomodoro Timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and display logic
//! - `runner`: The interactive session loop

pub mod commands;
pub mod display;
pub mod runner;

pub use commands::{Cli, Commands, RunArgs, SettingsArgs, DEFAULT_SERVER_URL};
pub use display::Display;
pub use runner::{spawn_stdin_commands, SessionRunner, UserCommand};

//! Command definitions for the Pomodoro Timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::types::TimerConfig;

/// Default address of the stats server.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodoro Timer CLI - focus and break intervals in the terminal
#[derive(Parser, Debug)]
#[command(
    name = "pomodoro-tracker",
    version,
    about = "ターミナルで動くポモドーロタイマー",
    long_about = "作業と休憩を交互に計測するポモドーロタイマー。\n\
                  完了した作業セッションは統計サーバーに送信されます。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the saved session and settings
    #[arg(long, global = true, env = "POMODORO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Base URL of the stats server
    #[arg(
        long,
        global = true,
        env = "POMODORO_SERVER_URL",
        default_value = DEFAULT_SERVER_URL
    )]
    pub server: String,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the timer interactively
    Run(RunArgs),

    /// Show the saved session and settings
    Status,

    /// Show or change timer settings
    Settings(SettingsArgs),

    /// Discard the saved session
    Clear,

    /// Show statistics from the server
    Stats {
        /// Day to show (YYYY-MM-DD, default: today)
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Start the countdown immediately
    #[arg(short, long)]
    pub start: bool,

    /// Do not upload completed sessions
    #[arg(long)]
    pub offline: bool,
}

// ============================================================================
// Settings Command Arguments
// ============================================================================

/// Arguments for the settings command. Omitted values are left unchanged.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Work duration in minutes (1-120)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=120))]
    pub work: Option<u32>,

    /// Short break duration in minutes (1-60)
    #[arg(short = 'b', long, value_parser = clap::value_parser!(u32).range(1..=60))]
    pub short_break: Option<u32>,

    /// Long break duration in minutes (1-60)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=60))]
    pub long_break: Option<u32>,

    /// Work sessions before a long break (1-12)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub interval: Option<u32>,

    /// Start the next interval automatically
    #[arg(long)]
    pub auto_start: Option<bool>,

    /// Play the bell on completion
    #[arg(long)]
    pub sound: Option<bool>,

    /// Show a desktop notification on completion
    #[arg(long)]
    pub notification: Option<bool>,
}

impl SettingsArgs {
    /// Returns true if no setting was given.
    pub fn is_empty(&self) -> bool {
        self.work.is_none()
            && self.short_break.is_none()
            && self.long_break.is_none()
            && self.interval.is_none()
            && self.auto_start.is_none()
            && self.sound.is_none()
            && self.notification.is_none()
    }

    /// Applies the given values on top of `base`.
    pub fn apply_to(&self, base: &TimerConfig) -> TimerConfig {
        let mut config = base.clone();
        if let Some(minutes) = self.work {
            config = config.with_work_minutes(minutes);
        }
        if let Some(minutes) = self.short_break {
            config = config.with_short_break_minutes(minutes);
        }
        if let Some(minutes) = self.long_break {
            config = config.with_long_break_minutes(minutes);
        }
        if let Some(count) = self.interval {
            config = config.with_long_break_interval(count);
        }
        if let Some(auto_start) = self.auto_start {
            config.auto_start = auto_start;
        }
        if let Some(sound) = self.sound {
            config.sound_enabled = sound;
        }
        if let Some(notification) = self.notification {
            config.notification_enabled = notification;
        }
        config
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses a `YYYY-MM-DD` date.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| "日付はYYYY-MM-DD形式で指定してください".to_string())
}

// ============================================================================
// Tests
// ============================================================================

//! Core data types for the Pomodoro Timer.
//!
//! This module defines the data structures used for:
//! - Interval modes and their display labels
//! - Timer configuration with validation
//! - Session counters and their persisted snapshot
//! - Session records exchanged with the sync server

use serde::{Deserialize, Serialize};

// ============================================================================
// Mode
// ============================================================================

/// The kind of interval currently being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Focused work interval
    #[default]
    Work,
    /// Short break between work intervals
    ShortBreak,
    /// Long break after every N work intervals
    LongBreak,
}

impl Mode {
    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Work => "work",
            Mode::ShortBreak => "short_break",
            Mode::LongBreak => "long_break",
        }
    }

    /// Returns the label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Work => "作業中",
            Mode::ShortBreak => "短休憩中",
            Mode::LongBreak => "長休憩中",
        }
    }

    /// Returns true for either break mode.
    pub fn is_break(&self) -> bool {
        matches!(self, Mode::ShortBreak | Mode::LongBreak)
    }
}

// ============================================================================
// TimerConfig
// ============================================================================

/// Timer configuration. Durations are in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerConfig {
    /// Work interval length in seconds
    pub work_duration: u32,
    /// Short break length in seconds
    pub short_break_duration: u32,
    /// Long break length in seconds
    pub long_break_duration: u32,
    /// Number of completed work sessions between long breaks
    #[serde(alias = "longBreakInterval")]
    pub long_break_interval_count: u32,
    /// Whether the next interval starts by itself after a completion
    #[serde(default)]
    pub auto_start: bool,
    /// Whether the bell plays on completion
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    /// Whether a desktop notification is shown on completion
    #[serde(default = "default_true")]
    pub notification_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_duration: 25 * 60,
            short_break_duration: 5 * 60,
            long_break_duration: 15 * 60,
            long_break_interval_count: 4,
            auto_start: false,
            sound_enabled: true,
            notification_enabled: true,
        }
    }
}

impl TimerConfig {
    /// Sets the work duration in minutes.
    pub fn with_work_minutes(mut self, minutes: u32) -> Self {
        self.work_duration = minutes * 60;
        self
    }

    /// Sets the short break duration in minutes.
    pub fn with_short_break_minutes(mut self, minutes: u32) -> Self {
        self.short_break_duration = minutes * 60;
        self
    }

    /// Sets the long break duration in minutes.
    pub fn with_long_break_minutes(mut self, minutes: u32) -> Self {
        self.long_break_duration = minutes * 60;
        self
    }

    /// Sets how many work sessions precede a long break.
    pub fn with_long_break_interval(mut self, count: u32) -> Self {
        self.long_break_interval_count = count;
        self
    }

    /// Returns the configured duration for a mode.
    pub fn duration_for(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Work => self.work_duration,
            Mode::ShortBreak => self.short_break_duration,
            Mode::LongBreak => self.long_break_duration,
        }
    }

    /// Long break interval, never zero.
    pub fn effective_long_break_interval(&self) -> u32 {
        self.long_break_interval_count.max(1)
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if !(60..=120 * 60).contains(&self.work_duration) {
            return Err("作業時間は1-120分の範囲で指定してください".to_string());
        }
        if !(60..=60 * 60).contains(&self.short_break_duration) {
            return Err("短い休憩時間は1-60分の範囲で指定してください".to_string());
        }
        if !(60..=60 * 60).contains(&self.long_break_duration) {
            return Err("長い休憩時間は1-60分の範囲で指定してください".to_string());
        }
        if !(1..=12).contains(&self.long_break_interval_count) {
            return Err("長い休憩の間隔は1-12回の範囲で指定してください".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// SessionState
// ============================================================================

/// Counters owned by the session controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionState {
    /// Current interval mode
    pub mode: Mode,
    /// Completed work intervals
    pub completed_work_sessions: u32,
    /// Sum of completed work durations in seconds
    pub total_focus_seconds: u64,
}

/// Persisted snapshot of the session and its running timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSession {
    pub mode: Mode,
    pub completed_work_sessions: u32,
    pub total_focus_seconds: u64,
    pub timer_running: bool,
    pub timer_remaining_seconds: u32,
    pub timer_accumulated_paused_ms: i64,
    pub timer_start_epoch_ms: Option<i64>,
}

impl SavedSession {
    /// Extracts the counters part of the snapshot.
    pub fn session_state(&self) -> SessionState {
        SessionState {
            mode: self.mode,
            completed_work_sessions: self.completed_work_sessions,
            total_focus_seconds: self.total_focus_seconds,
        }
    }
}

// ============================================================================
// Sync Types
// ============================================================================

/// Kind of a session reported to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Work,
    ShortBreak,
    LongBreak,
}

/// A completed interval as uploaded to `POST /api/session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Start time, epoch seconds
    pub start_ts: i64,
    /// End time, epoch seconds
    pub end_ts: i64,
    /// Interval length in seconds
    pub duration_sec: u32,
    pub kind: SessionKind,
}

impl SessionRecord {
    /// Builds a work record ending at `end_ts`.
    pub fn work(end_ts: i64, duration_sec: u32) -> Self {
        Self {
            start_ts: end_ts - i64::from(duration_sec),
            end_ts,
            duration_sec,
            kind: SessionKind::Work,
        }
    }
}

/// A session as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub id: i64,
    pub start_ts: i64,
    pub end_ts: i64,
    pub duration_sec: u32,
    pub kind: SessionKind,
    pub created_at: String,
}

/// Per-day aggregate returned by `GET /api/stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: String,
    pub total_sessions: u32,
    pub total_work_seconds: u64,
    pub total_break_seconds: u64,
    #[serde(default)]
    pub sessions: Vec<StoredSession>,
}

// ============================================================================
// Tests
// ============================================================================

//! Display utilities for the Pomodoro Timer CLI.
//!
//! This module provides formatted output for:
//! - The live timer line
//! - Session transition messages
//! - Saved status and settings
//! - Server statistics

use std::io::Write;

use chrono::{DateTime, Local};

use crate::session::{SessionEvent, TransitionReason};
use crate::types::{DailyStats, Mode, SavedSession, SessionKind, TimerConfig};

const PROGRESS_WIDTH: usize = 20;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    // ------------------------------------------------------------------------
    // Live Session
    // ------------------------------------------------------------------------

    /// Shows the key bindings of the interactive session.
    pub fn show_controls() {
        println!("操作: Enter/スペース=開始・一時停止  r=リセット  s=スキップ  q=終了");
    }

    /// Redraws the live timer line in place.
    pub fn show_timer_line(mode: Mode, remaining_seconds: u32, progress: f64, running: bool) {
        print!(
            "\r{}\x1b[K",
            Self::timer_line(mode, remaining_seconds, progress, running)
        );
        let _ = std::io::stdout().flush();
    }

    /// Prints a message for a session event, if it warrants one.
    pub fn show_event(event: &SessionEvent) {
        if let Some(message) = Self::event_message(event) {
            println!("\r\x1b[K{}", message);
        }
    }

    /// Shows the session summary on exit.
    pub fn show_summary(completed_work_sessions: u32, total_focus_seconds: u64) {
        println!();
        println!(
            "完了セッション: {}  合計集中時間: {}",
            completed_work_sessions,
            Self::format_focus_time(total_focus_seconds)
        );
    }

    // ------------------------------------------------------------------------
    // Saved State
    // ------------------------------------------------------------------------

    /// Shows the saved session.
    pub fn show_status(session: Option<&SavedSession>, config: &TimerConfig) {
        println!("ポモドーロタイマー ステータス");
        println!("─────────────────────────────");

        let Some(session) = session else {
            println!("保存されたセッションはありません");
            println!(
                "次の作業時間: {}",
                Self::format_clock(config.work_duration)
            );
            return;
        };

        let state = if session.timer_running {
            "実行中"
        } else {
            "一時停止中"
        };
        println!("モード: {} ({})", session.mode.label(), state);
        println!(
            "残り時間: {}",
            Self::format_clock(session.timer_remaining_seconds)
        );
        println!("完了セッション: {}", session.completed_work_sessions);
        println!(
            "合計集中時間: {}",
            Self::format_focus_time(session.total_focus_seconds)
        );
    }

    /// Shows the timer settings.
    pub fn show_settings(config: &TimerConfig) {
        println!("作業時間: {}分", config.work_duration / 60);
        println!("短い休憩: {}分", config.short_break_duration / 60);
        println!("長い休憩: {}分", config.long_break_duration / 60);
        println!("長い休憩の間隔: {}回", config.long_break_interval_count);
        println!("自動開始: {}", Self::on_off(config.auto_start));
        println!("サウンド: {}", Self::on_off(config.sound_enabled));
        println!("通知: {}", Self::on_off(config.notification_enabled));
    }

    /// Shows a success message for saved settings.
    pub fn show_settings_saved(config: &TimerConfig) {
        println!("* 設定を保存しました");
        Self::show_settings(config);
    }

    /// Shows a success message for a cleared session.
    pub fn show_clear_success() {
        println!("[] 保存されたセッションを削除しました");
    }

    // ------------------------------------------------------------------------
    // Statistics
    // ------------------------------------------------------------------------

    /// Shows one day of server statistics.
    pub fn show_stats(stats: &DailyStats) {
        println!("{} の統計", stats.date);
        println!("─────────────────────────────");
        println!("セッション数: {}", stats.total_sessions);
        println!(
            "作業時間: {}",
            Self::format_focus_time(stats.total_work_seconds)
        );
        println!(
            "休憩時間: {}",
            Self::format_focus_time(stats.total_break_seconds)
        );

        for session in &stats.sessions {
            println!(
                "  {} - {}  {} ({})",
                Self::format_timestamp(session.start_ts),
                Self::format_timestamp(session.end_ts),
                Self::kind_label(session.kind),
                Self::format_clock(session.duration_sec)
            );
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("エラー: {}", message);
    }

    // ------------------------------------------------------------------------
    // Formatting
    // ------------------------------------------------------------------------

    /// Builds the live timer line.
    pub fn timer_line(mode: Mode, remaining_seconds: u32, progress: f64, running: bool) -> String {
        let marker = if running { ">" } else { "||" };
        format!(
            "{} {} {} {} {:>3}%",
            marker,
            mode.label(),
            Self::format_clock(remaining_seconds),
            Self::progress_bar(progress),
            (progress.clamp(0.0, 1.0) * 100.0).round() as u32
        )
    }

    /// Returns the message printed for an event. Ticks print nothing.
    pub fn event_message(event: &SessionEvent) -> Option<String> {
        match event {
            SessionEvent::Tick { .. } => None,
            SessionEvent::Started { mode } => Some(format!("> {}を開始しました", mode.label())),
            SessionEvent::Paused { .. } => Some("|| 一時停止しました".to_string()),
            SessionEvent::Reset { .. } => Some("[] リセットしました".to_string()),
            SessionEvent::ModeChanged {
                to,
                reason: TransitionReason::Completed,
                ..
            } if to.is_break() => Some(format!("* セッション完了 - 次は {} です", to.label())),
            SessionEvent::ModeChanged {
                to,
                reason: TransitionReason::Completed,
                ..
            } => Some(format!("* 休憩終了 - 次は {} です", to.label())),
            SessionEvent::ModeChanged {
                to,
                reason: TransitionReason::Skipped,
                ..
            } => Some(format!(">> スキップしました - 次は {} です", to.label())),
            SessionEvent::WorkSessionCompleted {
                completed_work_sessions,
                total_focus_seconds,
            } => Some(format!(
                "  完了セッション: {}  合計集中時間: {}",
                completed_work_sessions,
                Self::format_focus_time(*total_focus_seconds)
            )),
        }
    }

    /// Formats seconds as `MM:SS`.
    pub fn format_clock(total_seconds: u32) -> String {
        format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
    }

    /// Formats seconds as `{h}時間{m}分`.
    pub fn format_focus_time(total_seconds: u64) -> String {
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        format!("{}時間{}分", hours, minutes)
    }

    /// Renders progress in `0.0..=1.0` as a fixed-width bar.
    pub fn progress_bar(progress: f64) -> String {
        let filled = (progress.clamp(0.0, 1.0) * PROGRESS_WIDTH as f64).round() as usize;
        format!(
            "[{}{}]",
            "#".repeat(filled),
            "-".repeat(PROGRESS_WIDTH - filled)
        )
    }

    fn format_timestamp(epoch_seconds: i64) -> String {
        DateTime::from_timestamp(epoch_seconds, 0)
            .map(|dt| dt.with_timezone(&Local).format("%H:%M").to_string())
            .unwrap_or_else(|| "--:--".to_string())
    }

    fn kind_label(kind: SessionKind) -> &'static str {
        match kind {
            SessionKind::Work => Mode::Work.label(),
            SessionKind::ShortBreak => Mode::ShortBreak.label(),
            SessionKind::LongBreak => Mode::LongBreak.label(),
        }
    }

    fn on_off(enabled: bool) -> &'static str {
        if enabled {
            "オン"
        } else {
            "オフ"
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Events published by the session controller for display.

use crate::types::Mode;

/// Why the controller left a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionReason {
    /// The interval ran to zero
    Completed,
    /// The user skipped the interval
    Skipped,
}

/// Session-level events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Remaining time of the current interval changed
    Tick {
        mode: Mode,
        remaining_seconds: u32,
    },
    /// Countdown started or resumed
    Started { mode: Mode },
    /// Countdown paused
    Paused { mode: Mode },
    /// Countdown rewound to the full duration
    Reset { mode: Mode },
    /// The controller switched to another mode
    ModeChanged {
        from: Mode,
        to: Mode,
        reason: TransitionReason,
    },
    /// A work interval completed
    WorkSessionCompleted {
        completed_work_sessions: u32,
        total_focus_seconds: u64,
    },
}

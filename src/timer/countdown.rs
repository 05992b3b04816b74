//! Countdown for a single fixed-length interval.
//!
//! Elapsed time is always derived from the injected clock, never from the
//! number of frames seen, so a slow or irregular scheduler cannot make the
//! countdown drift.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use super::clock::Clock;

// ============================================================================
// TimerEvent
// ============================================================================

/// Events published by a [`Timer`] to its observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Remaining time was recomputed
    Tick {
        /// Id of the timer that produced the event
        timer_id: u64,
        /// Remaining whole seconds
        remaining_seconds: u32,
    },
    /// Remaining time reached zero
    Completed {
        /// Id of the timer that produced the event
        timer_id: u64,
    },
}

impl TimerEvent {
    /// Returns the id of the timer that produced the event.
    pub fn timer_id(&self) -> u64 {
        match self {
            TimerEvent::Tick { timer_id, .. } | TimerEvent::Completed { timer_id } => *timer_id,
        }
    }
}

// ============================================================================
// Timer
// ============================================================================

/// Pausable countdown over an injected clock.
pub struct Timer {
    id: u64,
    duration_seconds: u32,
    running: bool,
    start_epoch_ms: Option<i64>,
    accumulated_paused_ms: i64,
    pause_start_epoch_ms: Option<i64>,
    completion_fired: bool,
    clock: Arc<dyn Clock>,
    events: mpsc::UnboundedSender<TimerEvent>,
}

impl Timer {
    /// Creates a stopped timer for `duration_seconds`.
    pub fn new(
        id: u64,
        duration_seconds: u32,
        clock: Arc<dyn Clock>,
        events: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        Self {
            id,
            duration_seconds,
            running: false,
            start_epoch_ms: None,
            accumulated_paused_ms: 0,
            pause_start_epoch_ms: None,
            completion_fired: false,
            clock,
            events,
        }
    }

    /// Starts or resumes the countdown and runs the first frame immediately.
    pub fn start(&mut self) {
        if self.running {
            return;
        }

        self.start_epoch_ms = Some(self.clock.now_ms() - self.accumulated_paused_ms);
        self.pause_start_epoch_ms = None;
        self.running = true;
        debug!(timer_id = self.id, "timer started");

        self.frame();
    }

    /// Pauses the countdown, banking the elapsed time.
    pub fn pause(&mut self) {
        if !self.running {
            return;
        }

        let now = self.clock.now_ms();
        self.accumulated_paused_ms = self.elapsed_at(now);
        self.running = false;
        self.pause_start_epoch_ms = Some(now);
        debug!(
            timer_id = self.id,
            elapsed_ms = self.accumulated_paused_ms,
            "timer paused"
        );
    }

    /// Stops the countdown and rewinds it to the full duration.
    pub fn reset(&mut self) {
        self.pause();
        self.accumulated_paused_ms = 0;
        self.start_epoch_ms = None;
        self.pause_start_epoch_ms = None;
        self.completion_fired = false;

        self.emit(TimerEvent::Tick {
            timer_id: self.id,
            remaining_seconds: self.remaining_seconds(),
        });
    }

    /// Runs one scheduler frame.
    ///
    /// Publishes a tick, and on reaching zero pauses and publishes the
    /// completion. Returns whether the timer is still running afterwards.
    pub fn frame(&mut self) -> bool {
        if !self.running {
            return false;
        }

        let remaining_seconds = self.remaining_seconds();
        self.emit(TimerEvent::Tick {
            timer_id: self.id,
            remaining_seconds,
        });

        if remaining_seconds == 0 {
            self.pause();
            if !self.completion_fired {
                self.completion_fired = true;
                self.emit(TimerEvent::Completed { timer_id: self.id });
            }
        }

        self.running
    }

    /// Seeds banked elapsed time on a paused timer, clamped to the duration.
    pub fn restore_elapsed(&mut self, elapsed_ms: i64) {
        if self.running {
            return;
        }
        let max_ms = i64::from(self.duration_seconds) * 1000;
        self.accumulated_paused_ms = elapsed_ms.clamp(0, max_ms);
    }

    /// Milliseconds elapsed in this interval.
    pub fn elapsed_milliseconds(&self) -> i64 {
        if self.running {
            self.elapsed_at(self.clock.now_ms())
        } else {
            self.accumulated_paused_ms
        }
    }

    /// Whole seconds left, never negative.
    pub fn remaining_seconds(&self) -> u32 {
        let elapsed_secs = self.elapsed_milliseconds() / 1000;
        let remaining = i64::from(self.duration_seconds) - elapsed_secs;
        remaining.max(0) as u32
    }

    /// Fraction of the interval completed, in `0.0..=1.0`.
    ///
    /// A zero-length timer is always complete.
    pub fn progress(&self) -> f64 {
        if self.duration_seconds == 0 {
            return 1.0;
        }
        let duration = f64::from(self.duration_seconds);
        let done = duration - f64::from(self.remaining_seconds());
        (done / duration).clamp(0.0, 1.0)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    pub fn start_epoch_ms(&self) -> Option<i64> {
        self.start_epoch_ms
    }

    pub fn accumulated_paused_ms(&self) -> i64 {
        self.accumulated_paused_ms
    }

    pub fn pause_start_epoch_ms(&self) -> Option<i64> {
        self.pause_start_epoch_ms
    }

    fn elapsed_at(&self, now_ms: i64) -> i64 {
        match self.start_epoch_ms {
            Some(start) => (now_ms - start).max(0),
            None => 0,
        }
    }

    fn emit(&self, event: TimerEvent) {
        if self.events.send(event).is_err() {
            debug!(timer_id = self.id, "timer event receiver dropped");
        }
    }
}

impl std::fmt::Debug for Timer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timer")
            .field("id", &self.id)
            .field("duration_seconds", &self.duration_seconds)
            .field("running", &self.running)
            .field("start_epoch_ms", &self.start_epoch_ms)
            .field("accumulated_paused_ms", &self.accumulated_paused_ms)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

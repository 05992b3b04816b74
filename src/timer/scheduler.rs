//! Periodic frame scheduling for running timers.

use tokio::time::{interval, Duration, Interval, MissedTickBehavior};

/// Default frame period for the terminal display.
pub const DEFAULT_FRAME_PERIOD: Duration = Duration::from_millis(200);

/// Source of periodic wake-ups while a timer is running.
#[allow(async_fn_in_trait)]
pub trait FrameScheduler {
    /// Waits until the next frame is due.
    async fn next_frame(&mut self);
}

/// Frame scheduler backed by `tokio::time::interval`.
///
/// Missed frames are skipped rather than replayed in a burst.
#[derive(Debug)]
pub struct IntervalScheduler {
    ticker: Interval,
}

impl IntervalScheduler {
    /// Creates a scheduler firing every `period`.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { ticker }
    }

    pub fn period(&self) -> Duration {
        self.ticker.period()
    }
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_PERIOD)
    }
}

impl FrameScheduler for IntervalScheduler {
    async fn next_frame(&mut self) {
        self.ticker.tick().await;
    }
}

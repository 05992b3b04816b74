//! Timer module for the Pomodoro Timer.
//!
//! This module contains the countdown machinery:
//! - `clock`: injectable time sources
//! - `countdown`: the pausable, drift-resistant interval timer
//! - `scheduler`: periodic frame scheduling that drives running timers

pub mod clock;
pub mod countdown;
pub mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use countdown::{Timer, TimerEvent};
pub use scheduler::{FrameScheduler, IntervalScheduler, DEFAULT_FRAME_PERIOD};

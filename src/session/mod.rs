//! Session state machine.
//!
//! [`SessionController`] cycles Work → ShortBreak/LongBreak → Work, counts
//! completed work intervals and reports each transition to the persistence,
//! notification and sync gateways.

mod controller;
mod event;

pub use controller::{Gateways, SessionController};
pub use event::{SessionEvent, TransitionReason};

//! Pomodoro Timer Library
//!
//! This library provides the core functionality for the Pomodoro Timer CLI.
//! It includes:
//! - A drift-resistant countdown over an injectable clock
//! - The work/break session state machine
//! - Persistence of session state and settings
//! - Bell and desktop notifications on completion
//! - Upload of completed work sessions to a stats server
//! - CLI command parsing, display utilities and the interactive loop

pub mod cli;
pub mod notification;
pub mod session;
pub mod storage;
pub mod sync;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{DailyStats, Mode, SavedSession, SessionKind, SessionRecord, SessionState, TimerConfig};

pub use timer::{
    Clock, FrameScheduler, IntervalScheduler, ManualClock, SystemClock, Timer, TimerEvent,
};

pub use session::{Gateways, SessionController, SessionEvent, TransitionReason};

pub use storage::{AppStorage, FileStore, KeyValueStore, MemoryStore, SessionStore, StorageError};

pub use notification::{
    MockNotifier, NotificationError, NotificationGateway, Notifier, NotifierCall, NotifyOptions,
};

pub use sync::{HttpSessionSync, MockSessionSync, NoopSessionSync, SessionSync, SyncError};

//! Persistence of session state and timer configuration.
//!
//! Saved state is JSON under two keys of a [`KeyValueStore`]:
//!
//! - `pomodoro_session`: the [`SavedSession`] snapshot
//! - `pomodoro_config`: the [`TimerConfig`]
//!
//! Every failure is logged and swallowed. A failed or malformed restore is
//! reported as `None` so callers fall back to defaults.

mod backend;
mod error;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use error::StorageError;

use crate::types::{SavedSession, TimerConfig};

/// Key of the saved session snapshot.
pub const SESSION_KEY: &str = "pomodoro_session";

/// Key of the saved configuration.
pub const CONFIG_KEY: &str = "pomodoro_config";

/// Persistence gateway used by the session controller.
pub trait SessionStore: Send + Sync {
    fn save_session(&self, session: &SavedSession);
    fn restore_session(&self) -> Option<SavedSession>;
    fn clear_session(&self);
    fn save_config(&self, config: &TimerConfig);
    fn restore_config(&self) -> Option<TimerConfig>;
}

/// JSON persistence over any key-value backend.
#[derive(Debug)]
pub struct AppStorage<B: KeyValueStore> {
    backend: Arc<B>,
}

impl<B: KeyValueStore> AppStorage<B> {
    #[must_use]
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.backend.set(key, &json)
    }

    fn restore<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.backend.get(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

impl AppStorage<FileStore> {
    /// Creates file-backed storage under the platform data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no data directory can be determined.
    pub fn open_default() -> Result<Self, StorageError> {
        Ok(Self::new(Arc::new(FileStore::default_location()?)))
    }
}

impl<B: KeyValueStore> SessionStore for AppStorage<B> {
    fn save_session(&self, session: &SavedSession) {
        if let Err(e) = self.save(SESSION_KEY, session) {
            warn!("セッションの保存に失敗しました: {}", e);
        }
    }

    fn restore_session(&self) -> Option<SavedSession> {
        match self.restore(SESSION_KEY) {
            Ok(session) => session,
            Err(e) if e.is_corrupt_data() => {
                warn!("保存されたセッションが破損しているため破棄します: {}", e);
                None
            }
            Err(e) => {
                warn!("セッションの復元に失敗しました: {}", e);
                None
            }
        }
    }

    fn clear_session(&self) {
        match self.backend.remove(SESSION_KEY) {
            Ok(()) => debug!("Saved session cleared"),
            Err(e) => warn!("セッションの削除に失敗しました: {}", e),
        }
    }

    fn save_config(&self, config: &TimerConfig) {
        if let Err(e) = self.save(CONFIG_KEY, config) {
            warn!("設定の保存に失敗しました: {}", e);
        }
    }

    fn restore_config(&self) -> Option<TimerConfig> {
        let config: TimerConfig = match self.restore(CONFIG_KEY) {
            Ok(config) => config?,
            Err(e) if e.is_corrupt_data() => {
                warn!("保存された設定が破損しているため既定値を使用します: {}", e);
                return None;
            }
            Err(e) => {
                warn!("設定の復元に失敗しました: {}", e);
                return None;
            }
        };

        match config.validate() {
            Ok(()) => Some(config),
            Err(msg) => {
                warn!("保存された設定が無効なため既定値を使用します: {}", msg);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mode;

    fn create_storage() -> AppStorage<MemoryStore> {
        AppStorage::new(Arc::new(MemoryStore::new()))
    }

    fn sample_session() -> SavedSession {
        SavedSession {
            mode: Mode::ShortBreak,
            completed_work_sessions: 3,
            total_focus_seconds: 4500,
            timer_running: false,
            timer_remaining_seconds: 200,
            timer_accumulated_paused_ms: 100_000,
            timer_start_epoch_ms: Some(1_700_000_000_000),
        }
    }

    mod session_tests {
        use super::*;

        #[test]
        fn test_restore_without_save_is_none() {
            let storage = create_storage();
            assert_eq!(storage.restore_session(), None);
        }

        #[test]
        fn test_save_then_restore() {
            let storage = create_storage();
            storage.save_session(&sample_session());
            assert_eq!(storage.restore_session(), Some(sample_session()));
        }

        #[test]
        fn test_saved_under_session_key_as_camel_case_json() {
            let storage = create_storage();
            storage.save_session(&sample_session());

            let raw = storage.backend().raw(SESSION_KEY).unwrap();
            let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
            assert_eq!(json["mode"], "short_break");
            assert_eq!(json["completedWorkSessions"], 3);
            assert_eq!(json["timerAccumulatedPausedMs"], 100_000);
        }

        #[test]
        fn test_clear_session() {
            let storage = create_storage();
            storage.save_session(&sample_session());
            storage.clear_session();
            assert_eq!(storage.restore_session(), None);
        }

        #[test]
        fn test_malformed_session_is_none() {
            let storage = create_storage();
            storage.backend().insert_raw(SESSION_KEY, "{not json");
            assert_eq!(storage.restore_session(), None);

            storage
                .backend()
                .insert_raw(SESSION_KEY, r#"{"mode":"nap","completedWorkSessions":1}"#);
            assert_eq!(storage.restore_session(), None);
        }

        #[test]
        fn test_backend_failures_are_swallowed() {
            let storage = create_storage();
            storage.backend().set_should_fail(true);

            storage.save_session(&sample_session());
            storage.clear_session();
            assert_eq!(storage.restore_session(), None);
            assert_eq!(storage.backend().raw(SESSION_KEY), None);
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_save_then_restore() {
            let storage = create_storage();
            let config = TimerConfig::default().with_work_minutes(50);
            storage.save_config(&config);
            assert_eq!(storage.restore_config(), Some(config));
        }

        #[test]
        fn test_invalid_config_is_none() {
            let storage = create_storage();
            storage.backend().insert_raw(
                CONFIG_KEY,
                r#"{"workDuration":0,"shortBreakDuration":300,
                    "longBreakDuration":900,"longBreakIntervalCount":4}"#,
            );
            assert_eq!(storage.restore_config(), None);
        }

        #[test]
        fn test_malformed_config_is_none() {
            let storage = create_storage();
            storage.backend().insert_raw(CONFIG_KEY, "[]");
            assert_eq!(storage.restore_config(), None);
        }

        #[test]
        fn test_backend_failure_is_none() {
            let storage = create_storage();
            storage.save_config(&TimerConfig::default());
            storage.backend().set_should_fail(true);
            assert_eq!(storage.restore_config(), None);
        }
    }

    #[test]
    fn test_file_backed_storage() {
        let dir = tempfile::tempdir().unwrap();
        let storage = AppStorage::new(Arc::new(FileStore::new(dir.path())));

        storage.save_session(&sample_session());
        storage.save_config(&TimerConfig::default());

        assert!(dir.path().join("pomodoro_session.json").exists());
        assert!(dir.path().join("pomodoro_config.json").exists());
        assert_eq!(storage.restore_session(), Some(sample_session()));
        assert_eq!(storage.restore_config(), Some(TimerConfig::default()));
    }
}

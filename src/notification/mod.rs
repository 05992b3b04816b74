//! User alerting on interval completion.
//!
//! This module provides best-effort alerts, including:
//!
//! - A synthesized bell tone (rodio)
//! - Desktop notifications (notify-rust), gated on permission
//! - Independent sound/notification toggles
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │ NotificationGateway  │ ← implements Notifier
//! └──────────┬───────────┘
//!            │
//!     ┌──────┴───────┐
//!     ▼              ▼
//! ┌──────────┐ ┌─────────────────┐
//! │BellPlayer│ │ DesktopNotifier │
//! │ (rodio)  │ │ (notify-rust)   │
//! └──────────┘ └─────────────────┘
//! ```
//!
//! Failures are logged and never propagated to the caller.

mod bell;
mod desktop;
pub mod error;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

pub use bell::{BellPlayer, RodioBell};
pub use desktop::{tag_id, DesktopNotifier, NotifyRustNotifier};
pub use error::NotificationError;

/// Title of the completion notification.
pub const COMPLETION_TITLE: &str = "セッション完了";

/// Tag shared by all completion notifications.
pub const COMPLETION_TAG: &str = "pomodoro-notification";

/// Body and tag of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyOptions {
    pub body: String,
    pub tag: String,
}

/// Notification gateway used by the session controller.
pub trait Notifier: Send + Sync {
    /// Shows a system notification. No-op when disabled or not permitted.
    fn notify(&self, title: &str, options: &NotifyOptions);

    /// Plays the bell. No-op when sound is disabled.
    fn play_bell(&self);

    /// Updates the sound and notification toggles.
    fn configure(&self, sound_enabled: bool, notification_enabled: bool);
}

// ============================================================================
// NotificationGateway
// ============================================================================

/// Combines the bell and desktop backends behind the [`Notifier`] seam.
pub struct NotificationGateway {
    desktop: Arc<dyn DesktopNotifier>,
    bell: Arc<dyn BellPlayer>,
    sound_enabled: AtomicBool,
    notification_enabled: AtomicBool,
    permission_granted: AtomicBool,
}

impl NotificationGateway {
    /// Creates a gateway with both toggles on and no permission yet.
    pub fn new(desktop: Arc<dyn DesktopNotifier>, bell: Arc<dyn BellPlayer>) -> Self {
        Self {
            desktop,
            bell,
            sound_enabled: AtomicBool::new(true),
            notification_enabled: AtomicBool::new(true),
            permission_granted: AtomicBool::new(false),
        }
    }

    /// Creates a gateway using the platform notification service and audio output.
    #[must_use]
    pub fn system() -> Self {
        Self::new(Arc::new(NotifyRustNotifier::new()), Arc::new(RodioBell::new()))
    }

    /// Asks the platform for notification permission.
    ///
    /// The platform check runs on the blocking pool. A failed check counts
    /// as denied.
    pub async fn request_permission(&self) -> bool {
        let desktop = Arc::clone(&self.desktop);
        let granted = tokio::task::spawn_blocking(move || desktop.request_permission())
            .await
            .unwrap_or_else(|e| {
                warn!("通知許可の確認に失敗しました: {}", e);
                false
            });

        self.permission_granted.store(granted, Ordering::SeqCst);
        if granted {
            debug!("Notification permission granted");
        } else {
            warn!("通知が利用できないため、通知なしで続行します");
        }
        granted
    }

    #[must_use]
    pub fn is_permission_granted(&self) -> bool {
        self.permission_granted.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_sound_enabled(&self) -> bool {
        self.sound_enabled.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_notification_enabled(&self) -> bool {
        self.notification_enabled.load(Ordering::SeqCst)
    }
}

impl Notifier for NotificationGateway {
    fn notify(&self, title: &str, options: &NotifyOptions) {
        if !self.is_notification_enabled() || !self.is_permission_granted() {
            debug!("Notification skipped: {}", title);
            return;
        }

        if let Err(e) = self.desktop.show(title, &options.body, &options.tag) {
            warn!("{} ({})", e, e.suggestion());
        }
    }

    fn play_bell(&self) {
        if !self.is_sound_enabled() {
            debug!("Sound disabled, bell skipped");
            return;
        }

        if let Err(e) = self.bell.play_tone() {
            warn!("{} ({})", e, e.suggestion());
        }
    }

    fn configure(&self, sound_enabled: bool, notification_enabled: bool) {
        self.sound_enabled.store(sound_enabled, Ordering::SeqCst);
        self.notification_enabled
            .store(notification_enabled, Ordering::SeqCst);
        debug!(sound_enabled, notification_enabled, "Notification settings updated");
    }
}

impl std::fmt::Debug for NotificationGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationGateway")
            .field("sound_enabled", &self.is_sound_enabled())
            .field("notification_enabled", &self.is_notification_enabled())
            .field("permission_granted", &self.is_permission_granted())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// MockNotifier
// ============================================================================

/// A call recorded by [`MockNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierCall {
    Notify {
        title: String,
        body: String,
        tag: String,
    },
    Bell,
    Configure {
        sound_enabled: bool,
        notification_enabled: bool,
    },
}

/// Mock notifier for testing.
#[derive(Debug, Default)]
pub struct MockNotifier {
    calls: Mutex<Vec<NotifierCall>>,
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn calls(&self) -> Vec<NotifierCall> {
        self.lock().clone()
    }

    #[must_use]
    pub fn notification_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|c| matches!(c, NotifierCall::Notify { .. }))
            .count()
    }

    #[must_use]
    pub fn bell_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|c| matches!(c, NotifierCall::Bell))
            .count()
    }

    pub fn clear_calls(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<NotifierCall>> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Notifier for MockNotifier {
    fn notify(&self, title: &str, options: &NotifyOptions) {
        self.lock().push(NotifierCall::Notify {
            title: title.to_string(),
            body: options.body.clone(),
            tag: options.tag.clone(),
        });
    }

    fn play_bell(&self) {
        self.lock().push(NotifierCall::Bell);
    }

    fn configure(&self, sound_enabled: bool, notification_enabled: bool) {
        self.lock().push(NotifierCall::Configure {
            sound_enabled,
            notification_enabled,
        });
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct FakeDesktop {
        supported: bool,
        fail: bool,
        shown: Mutex<Vec<(String, String, String)>>,
    }

    impl DesktopNotifier for FakeDesktop {
        fn request_permission(&self) -> bool {
            self.supported
        }

        fn show(&self, title: &str, body: &str, tag: &str) -> Result<(), NotificationError> {
            if self.fail {
                return Err(NotificationError::SendFailed("fake".to_string()));
            }
            self.shown
                .lock()
                .unwrap()
                .push((title.to_string(), body.to_string(), tag.to_string()));
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeBell {
        rings: AtomicUsize,
        fail: bool,
    }

    impl BellPlayer for FakeBell {
        fn play_tone(&self) -> Result<(), NotificationError> {
            if self.fail {
                return Err(NotificationError::AudioDeviceUnavailable("fake".to_string()));
            }
            self.rings.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn options() -> NotifyOptions {
        NotifyOptions {
            body: "次は 短休憩中 です".to_string(),
            tag: COMPLETION_TAG.to_string(),
        }
    }

    fn create_gateway(
        desktop: FakeDesktop,
        bell: FakeBell,
    ) -> (NotificationGateway, Arc<FakeDesktop>, Arc<FakeBell>) {
        let desktop = Arc::new(desktop);
        let bell = Arc::new(bell);
        let gateway = NotificationGateway::new(desktop.clone(), bell.clone());
        (gateway, desktop, bell)
    }

    mod gateway_tests {
        use super::*;

        #[tokio::test]
        async fn test_notify_after_permission_granted() {
            let (gateway, desktop, _bell) = create_gateway(
                FakeDesktop {
                    supported: true,
                    ..Default::default()
                },
                FakeBell::default(),
            );

            assert!(gateway.request_permission().await);
            gateway.notify(COMPLETION_TITLE, &options());

            let shown = desktop.shown.lock().unwrap().clone();
            assert_eq!(
                shown,
                vec![(
                    COMPLETION_TITLE.to_string(),
                    "次は 短休憩中 です".to_string(),
                    COMPLETION_TAG.to_string()
                )]
            );
        }

        #[test]
        fn test_notify_without_permission_is_noop() {
            let (gateway, desktop, _bell) = create_gateway(
                FakeDesktop {
                    supported: true,
                    ..Default::default()
                },
                FakeBell::default(),
            );

            gateway.notify(COMPLETION_TITLE, &options());
            assert!(desktop.shown.lock().unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_permission_denied_degrades_silently() {
            let (gateway, desktop, _bell) =
                create_gateway(FakeDesktop::default(), FakeBell::default());

            assert!(!gateway.request_permission().await);
            assert!(!gateway.is_permission_granted());
            gateway.notify(COMPLETION_TITLE, &options());
            assert!(desktop.shown.lock().unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_notify_disabled_is_noop() {
            let (gateway, desktop, _bell) = create_gateway(
                FakeDesktop {
                    supported: true,
                    ..Default::default()
                },
                FakeBell::default(),
            );
            gateway.request_permission().await;
            gateway.configure(true, false);

            gateway.notify(COMPLETION_TITLE, &options());
            assert!(desktop.shown.lock().unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_send_failure_is_swallowed() {
            let (gateway, _desktop, _bell) = create_gateway(
                FakeDesktop {
                    supported: true,
                    fail: true,
                    ..Default::default()
                },
                FakeBell::default(),
            );
            gateway.request_permission().await;
            gateway.notify(COMPLETION_TITLE, &options());
        }

        #[test]
        fn test_bell_respects_sound_toggle() {
            let (gateway, _desktop, bell) =
                create_gateway(FakeDesktop::default(), FakeBell::default());

            gateway.play_bell();
            assert_eq!(bell.rings.load(Ordering::SeqCst), 1);

            gateway.configure(false, true);
            gateway.play_bell();
            assert_eq!(bell.rings.load(Ordering::SeqCst), 1);

            gateway.configure(true, true);
            gateway.play_bell();
            assert_eq!(bell.rings.load(Ordering::SeqCst), 2);
        }

        #[test]
        fn test_bell_failure_is_swallowed() {
            let (gateway, _desktop, _bell) = create_gateway(
                FakeDesktop::default(),
                FakeBell {
                    fail: true,
                    ..Default::default()
                },
            );
            gateway.play_bell();
        }

        #[test]
        fn test_configure_flags() {
            let (gateway, _desktop, _bell) =
                create_gateway(FakeDesktop::default(), FakeBell::default());
            assert!(gateway.is_sound_enabled());
            assert!(gateway.is_notification_enabled());

            gateway.configure(false, false);
            assert!(!gateway.is_sound_enabled());
            assert!(!gateway.is_notification_enabled());
        }

        #[test]
        fn test_debug_impl() {
            let (gateway, _desktop, _bell) =
                create_gateway(FakeDesktop::default(), FakeBell::default());
            assert!(format!("{:?}", gateway).contains("NotificationGateway"));
        }
    }

    mod mock_tests {
        use super::*;

        #[test]
        fn test_records_calls_in_order() {
            let mock = MockNotifier::new();
            mock.play_bell();
            mock.notify(COMPLETION_TITLE, &options());
            mock.configure(false, true);

            assert_eq!(mock.bell_count(), 1);
            assert_eq!(mock.notification_count(), 1);
            assert_eq!(
                mock.calls()[2],
                NotifierCall::Configure {
                    sound_enabled: false,
                    notification_enabled: true
                }
            );

            mock.clear_calls();
            assert!(mock.calls().is_empty());
        }
    }
}

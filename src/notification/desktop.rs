//! Desktop notifications through notify-rust.

use notify_rust::Notification;
use tracing::debug;

use super::error::NotificationError;

/// Application name shown by the notification daemon.
const APP_NAME: &str = "pomodoro-tracker";

/// Backend that displays system notifications.
pub trait DesktopNotifier: Send + Sync {
    /// Asks the platform whether notifications can be shown.
    ///
    /// May block on IPC with the notification service.
    fn request_permission(&self) -> bool;

    /// Displays a notification. Notifications sharing a `tag` replace each other
    /// where the platform supports it.
    fn show(&self, title: &str, body: &str, tag: &str) -> Result<(), NotificationError>;
}

/// System notifications via the platform notification service.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotifyRustNotifier;

impl NotifyRustNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DesktopNotifier for NotifyRustNotifier {
    #[cfg(all(unix, not(target_os = "macos")))]
    fn request_permission(&self) -> bool {
        match notify_rust::get_server_information() {
            Ok(info) => {
                debug!("Notification server: {} {}", info.name, info.version);
                true
            }
            Err(e) => {
                debug!("Notification server unavailable: {}", e);
                false
            }
        }
    }

    #[cfg(not(all(unix, not(target_os = "macos"))))]
    fn request_permission(&self) -> bool {
        true
    }

    fn show(&self, title: &str, body: &str, tag: &str) -> Result<(), NotificationError> {
        let mut notification = Notification::new();
        notification.summary(title).body(body).appname(APP_NAME);

        #[cfg(all(unix, not(target_os = "macos")))]
        notification.id(tag_id(tag));
        #[cfg(not(all(unix, not(target_os = "macos"))))]
        let _ = tag;

        notification
            .show()
            .map(|_| ())
            .map_err(|e| NotificationError::SendFailed(e.to_string()))
    }
}

/// Maps a tag to a stable non-zero notification id (FNV-1a).
pub fn tag_id(tag: &str) -> u32 {
    let hash = tag
        .bytes()
        .fold(0x811c_9dc5_u32, |h, b| (h ^ u32::from(b)).wrapping_mul(0x0100_0193));
    hash.max(1)
}

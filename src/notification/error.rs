//! Notification system error types.
//!
//! None of these errors reach the session controller: the notification
//! gateway logs them and carries on without alerting.

use thiserror::Error;

/// Errors that can occur while alerting the user.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// No desktop notification service is reachable.
    #[error("通知サービスが利用できません")]
    NotAvailable,

    /// Notification permission was not granted.
    #[error("通知許可が拒否されています")]
    PermissionDenied,

    /// Failed to send a notification.
    #[error("通知の送信に失敗しました: {0}")]
    SendFailed(String),

    /// Audio device is not available (e.g., no speakers connected).
    #[error("オーディオデバイスが利用できません: {0}")]
    AudioDeviceUnavailable(String),

    /// Failed to play the bell tone.
    #[error("サウンド再生エラー: {0}")]
    PlaybackFailed(String),
}

impl NotificationError {
    /// Returns true if this error is related to permissions.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::NotAvailable)
    }

    /// Returns true if this error comes from the audio path.
    #[must_use]
    pub fn is_sound_error(&self) -> bool {
        matches!(
            self,
            Self::AudioDeviceUnavailable(_) | Self::PlaybackFailed(_)
        )
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::NotAvailable => "通知デーモンが起動しているか確認してください",
            Self::PermissionDenied => "システム設定で通知を許可してください",
            Self::SendFailed(_) => "しばらくしてから再度お試しください",
            Self::AudioDeviceUnavailable(_) => "オーディオデバイスを接続してください",
            Self::PlaybackFailed(_) => "オーディオ設定を確認してください",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NotificationError::SendFailed("dbus closed".to_string());
        assert!(err.to_string().contains("dbus closed"));
        assert!(err.to_string().contains("通知の送信に失敗しました"));

        let err = NotificationError::AudioDeviceUnavailable("no device".to_string());
        assert!(err.to_string().contains("no device"));
    }

    #[test]
    fn test_is_permission_error() {
        assert!(NotificationError::PermissionDenied.is_permission_error());
        assert!(NotificationError::NotAvailable.is_permission_error());
        assert!(!NotificationError::SendFailed("x".into()).is_permission_error());
    }

    #[test]
    fn test_is_sound_error() {
        assert!(NotificationError::AudioDeviceUnavailable("x".into()).is_sound_error());
        assert!(NotificationError::PlaybackFailed("x".into()).is_sound_error());
        assert!(!NotificationError::PermissionDenied.is_sound_error());
    }

    #[test]
    fn test_suggestion() {
        assert!(NotificationError::PermissionDenied
            .suggestion()
            .contains("許可"));
        assert!(NotificationError::AudioDeviceUnavailable("x".into())
            .suggestion()
            .contains("オーディオデバイス"));
    }
}

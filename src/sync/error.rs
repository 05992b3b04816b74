//! Sync gateway error types.

use thiserror::Error;

/// Errors that can occur while talking to the stats server.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The request could not be sent or the response could not be read.
    #[error("サーバーとの通信に失敗しました: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("サーバーがエラーを返しました (HTTP {status}): {body}")]
    Status { status: u16, body: String },

    /// The configured server URL is unusable.
    #[error("サーバーURLが不正です: {0}")]
    InvalidUrl(String),
}

impl SyncError {
    /// Returns true if the server was never reached.
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        match self {
            Self::Network(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }

    /// Returns the HTTP status for server-side failures.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Network(_) => "サーバーが起動しているか確認してください",
            Self::Status { .. } => "サーバーのログを確認してください",
            Self::InvalidUrl(_) => "--server に http:// または https:// で始まるURLを指定してください",
        }
    }
}

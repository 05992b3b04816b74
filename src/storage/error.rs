//! Storage error types.
//!
//! Storage failures never interrupt a session: the storage layer logs them
//! and treats them as absence of saved data.

use thiserror::Error;

/// Errors that can occur while reading or writing saved state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading from or writing to the backend failed.
    #[error("ストレージへのアクセスに失敗しました: {0}")]
    Io(#[from] std::io::Error),

    /// Saved data could not be encoded or decoded.
    #[error("保存データの形式が不正です: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The key contains characters that cannot be used as a file name.
    #[error("無効なストレージキーです: {0}")]
    InvalidKey(String),

    /// No data directory could be determined for this platform.
    #[error("データディレクトリが見つかりません")]
    DataDirNotFound,

    /// Backend-specific failure.
    #[error("ストレージエラー: {0}")]
    Backend(String),
}

impl StorageError {
    /// Returns true if the stored data itself is unreadable.
    #[must_use]
    pub fn is_corrupt_data(&self) -> bool {
        matches!(self, Self::Serialization(_))
    }
}

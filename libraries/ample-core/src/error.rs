/// Core error types for Ample
use crate::types::SongId;
use thiserror::Error;

/// Result type alias using `BackendError`
pub type Result<T> = std::result::Result<T, BackendError>;

/// Failure reported by an audio backend
///
/// Every backend call may fail asynchronously; failures are always surfaced
/// as one of these values, never as a silent no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend has no song with this identifier
    #[error("Unknown song: {0}")]
    UnknownSong(SongId),

    /// The backend could not be reached (device gone, process exited, channel closed)
    #[error("Audio backend unreachable: {0}")]
    Unreachable(String),

    /// Internal backend state was poisoned by a panicking thread
    #[error("Audio backend state poisoned")]
    Poisoned,
}

impl BackendError {
    /// Create an unreachable error
    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self::Unreachable(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_cause() {
        assert_eq!(
            BackendError::UnknownSong(SongId(4)).to_string(),
            "Unknown song: 4"
        );
        assert_eq!(
            BackendError::unreachable("device lost").to_string(),
            "Audio backend unreachable: device lost"
        );
    }
}

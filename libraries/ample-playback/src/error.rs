//! Error types for playback management

use ample_core::BackendError;
use thiserror::Error;

/// Playback errors
///
/// Backend failures inside transport operations are recovered locally and
/// reported as notifications; these values only cross the service boundary.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Audio backend error
    #[error("Audio backend error: {0}")]
    Backend(#[from] BackendError),

    /// The playback service task has shut down
    #[error("Playback service is not running")]
    ServiceClosed,
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

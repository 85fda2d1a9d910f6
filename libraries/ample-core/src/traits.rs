/// Core traits for Ample
use crate::error::Result;
use crate::types::{PlaybackPayload, SongId};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

/// Notification stream for one started song
///
/// Yields payloads until the song finishes, is superseded by another start,
/// or the backend goes away (the sender is dropped).
pub type Subscription = UnboundedReceiver<PlaybackPayload>;

/// Audio backend contract
///
/// Implementers decode and render audio; the playback layer only issues
/// commands and consumes the notification stream returned by `start_song`.
/// Every call may fail, and failures must be reported as `Err`.
#[async_trait]
pub trait AudioBackend: Send + Sync {
    /// Begin playback of the song with the given identifier
    ///
    /// Replaces whatever was playing before. The returned subscription
    /// delivers progress and completion notifications for this song only.
    async fn start_song(&self, id: SongId) -> Result<Subscription>;

    /// Pause the current song
    async fn pause_song(&self) -> Result<()>;

    /// Resume the current song
    async fn resume_song(&self) -> Result<()>;

    /// Move the playhead forward
    async fn seek_forward(&self, amount: Duration) -> Result<()>;

    /// Move the playhead backward
    async fn seek_backward(&self, amount: Duration) -> Result<()>;
}

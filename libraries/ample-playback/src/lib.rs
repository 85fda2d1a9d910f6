//! Ample - Playback Queue and Transport
//!
//! Backend-agnostic playback management for Ample.
//!
//! This crate provides:
//! - Queue store (ordered songs plus a selected slot that survives every
//!   mutation)
//! - Unbiased queue shuffle that keeps the selected song selected
//! - Transport synchronizer (play/pause/next/previous/seek/repeat)
//! - Stale-notification fencing for the finished → next cycle
//! - A tokio service that serializes commands and publishes snapshots
//!
//! # Architecture
//!
//! `ample-playback` never touches audio hardware. Audio is produced by an
//! [`ample_core::AudioBackend`] implementation that is handed to the
//! [`Transport`]; notifications come back through per-start subscriptions.
//!
//! # Example: Queue Store
//!
//! ```rust
//! use ample_core::{Song, SongId};
//! use ample_playback::Queue;
//! use std::time::Duration;
//!
//! let song = |id| Song::new(SongId(id), format!("Song {id}"), Duration::from_secs(180));
//!
//! let mut queue = Queue::new();
//! queue.replace(vec![song(1), song(2), song(3), song(4)], Some(SongId(3)));
//! assert_eq!(queue.current_index(), Some(2));
//!
//! // Removing an earlier slot keeps the same song selected
//! queue.remove_at(0);
//! assert_eq!(queue.current_song().map(|s| s.id), Some(SongId(3)));
//! ```
//!
//! # Example: Running the Service
//!
//! ```rust,no_run
//! use ample_core::{AudioBackend, Result, Song, SongId, Subscription};
//! use ample_playback::{PlaybackConfig, PlayerService, Transport};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! struct Silence;
//!
//! #[async_trait]
//! impl AudioBackend for Silence {
//!     async fn start_song(&self, _id: SongId) -> Result<Subscription> {
//!         let (_tx, rx) = tokio::sync::mpsc::unbounded_channel();
//!         Ok(rx)
//!     }
//!     async fn pause_song(&self) -> Result<()> { Ok(()) }
//!     async fn resume_song(&self) -> Result<()> { Ok(()) }
//!     async fn seek_forward(&self, _amount: Duration) -> Result<()> { Ok(()) }
//!     async fn seek_backward(&self, _amount: Duration) -> Result<()> { Ok(()) }
//! }
//!
//! # async fn run() -> ample_playback::Result<()> {
//! let transport = Transport::new(Arc::new(Silence), PlaybackConfig::default());
//! let player = PlayerService::spawn(transport);
//!
//! let song = Song::new(SongId(1), "Intro", Duration::from_secs(95));
//! player.play(song, None).await?;
//! player.toggle_play().await?;
//!
//! assert!(!player.snapshot().is_playing);
//! # Ok(())
//! # }
//! ```

mod error;
pub mod events;
pub mod fence;
pub mod queue;
mod service;
pub mod shuffle;
mod transport;
pub mod types;

// Public exports
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use fence::{Fence, FenceToken, TaggedPayload};
pub use queue::Queue;
pub use service::{PlayerCommand, PlayerHandle, PlayerService};
pub use transport::Transport;
pub use types::{PlaybackConfig, PlayerSnapshot, TransportState};

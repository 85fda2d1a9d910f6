//! Ample Core
//!
//! Platform-agnostic core types and the audio backend contract for Ample.
//!
//! This crate provides the foundational building blocks shared by the
//! playback layer, the backends, and the applications.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Song`, `SongId`, `PlaybackPayload`
//! - **Core Traits**: `AudioBackend`, the only seam between playback logic and audio output
//! - **Error Handling**: `BackendError` and its `Result` alias
//!
//! # Example
//!
//! ```rust
//! use ample_core::{PlaybackPayload, Song, SongId};
//! use std::time::Duration;
//!
//! let song = Song::new(SongId(7), "Intro", Duration::from_secs(95)).with_artist("Ample");
//! assert_eq!(song.id, SongId(7));
//!
//! let payload = PlaybackPayload {
//!     progress_frames: 22_050,
//!     total_frames: 44_100,
//!     is_finished: false,
//! };
//! assert_eq!(payload.fraction(), Some(0.5));
//! ```

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{BackendError, Result};
pub use traits::{AudioBackend, Subscription};
pub use types::{PlaybackPayload, Song, SongId};

//! Reference audio backends for Ample
//!
//! This crate provides `ClockBackend`, an [`AudioBackend`] that renders no
//! sound but advances a frame cursor in real time. It exercises the full
//! backend contract (start/pause/resume/seek, per-start notification
//! streams, supersession) and is what the `ample` shell plays through.
//!
//! # Example
//!
//! ```no_run
//! use ample_audio::{ClockBackend, ClockConfig};
//! use ample_core::{AudioBackend, Song, SongId};
//! use std::time::Duration;
//!
//! # async fn run() -> ample_core::Result<()> {
//! let backend = ClockBackend::new(
//!     [Song::new(SongId(1), "Intro", Duration::from_secs(95))],
//!     ClockConfig::default(),
//! );
//!
//! let mut events = backend.start_song(SongId(1)).await?;
//! while let Some(payload) = events.recv().await {
//!     if payload.is_finished {
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`AudioBackend`]: ample_core::AudioBackend

mod clock;

pub use clock::{ClockBackend, ClockConfig};

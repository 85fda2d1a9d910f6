//! Core domain types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Stable, unique song identifier
///
/// Assigned by the library; the playback layer only compares and forwards it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(pub u64);

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Song metadata as supplied by the library
///
/// Immutable from the playback layer's point of view: queues hold copies
/// and reorder them, but never edit them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Unique song identifier
    pub id: SongId,

    /// Song title
    pub title: String,

    /// Artist name (optional)
    #[serde(default)]
    pub artist: Option<String>,

    /// Song duration
    #[serde(rename = "duration_secs", with = "duration_secs")]
    pub duration: Duration,
}

impl Song {
    /// Create a song without artist information
    pub fn new(id: SongId, title: impl Into<String>, duration: Duration) -> Self {
        Self {
            id,
            title: title.into(),
            artist: None,
            duration,
        }
    }

    /// Attach an artist name
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    /// Duration as `(minutes, seconds)` for display
    pub fn duration_parts(&self) -> (u64, u64) {
        let secs = self.duration.as_secs();
        (secs / 60, secs % 60)
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (minutes, seconds) = self.duration_parts();
        match &self.artist {
            Some(artist) => write!(f, "{} - {} ({minutes}:{seconds:02})", artist, self.title),
            None => write!(f, "{} ({minutes}:{seconds:02})", self.title),
        }
    }
}

/// One notification on a playback subscription
///
/// The payload carries no song identifier: it is scoped to the subscription
/// returned by the start call that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackPayload {
    /// Frames rendered so far
    pub progress_frames: u64,

    /// Total frames in the song (0 when unknown)
    pub total_frames: u64,

    /// Whether the song reached its end
    pub is_finished: bool,
}

impl PlaybackPayload {
    /// Progress as a fraction in `[0, 1]`
    ///
    /// `None` when the total length is unknown.
    pub fn fraction(&self) -> Option<f64> {
        if self.total_frames == 0 {
            return None;
        }
        Some((self.progress_frames as f64 / self.total_frames as f64).clamp(0.0, 1.0))
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        if !secs.is_finite() || secs < 0.0 {
            return Err(serde::de::Error::custom(format!(
                "invalid song duration: {secs}"
            )));
        }
        Ok(Duration::from_secs_f64(secs))
    }
}

//! Core types for playback management

use ample_core::Song;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransportState {
    /// Nothing is playing (initial state, queue exhausted or cleared)
    #[default]
    Idle,

    /// A start command has been issued and is awaiting the backend
    Starting,

    /// Currently playing
    Playing,

    /// Paused mid-song
    Paused,
}

impl TransportState {
    /// Whether audio is (or is about to be) audible
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Starting | Self::Playing)
    }
}

/// Configuration for the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial repeat flag (default: false)
    pub repeat: bool,

    /// Seek step used when no explicit amount is given (default: 5 seconds)
    pub seek_step_secs: u64,
}

impl PlaybackConfig {
    /// Seek step as a duration
    pub fn seek_step(&self) -> Duration {
        Duration::from_secs(self.seek_step_secs)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            repeat: false,
            seek_step_secs: 5,
        }
    }
}

/// Read-only view of everything a UI needs to render the player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Queue contents in play order
    pub queue: Vec<Song>,

    /// Selected slot (`None` when nothing is selected)
    pub current_index: Option<usize>,

    /// Song in the selected slot
    pub current_song: Option<Song>,

    /// Transport state
    pub state: TransportState,

    /// Whether audio is playing
    pub is_playing: bool,

    /// Whether the queue wraps around at the end
    pub is_repeating: bool,

    /// Progress through the current song, in `[0, 1]`
    pub progress: f64,
}

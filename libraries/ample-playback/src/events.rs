//! Playback Events
//!
//! Event-based communication for UI synchronization. Events are emitted at
//! key points:
//! - State changes (starting/playing/paused/idle)
//! - Track changes (whenever a start command is issued)
//! - Queue mutations
//! - Progress updates from the backend
//! - Backend failures, as user-visible notifications

use crate::types::TransportState;
use ample_core::SongId;
use serde::{Deserialize, Serialize};

/// Events emitted by the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Transport state changed
    StateChanged {
        /// The new state
        state: TransportState,
    },

    /// A start command was issued for a song
    TrackChanged {
        /// Queue slot of the new song
        index: usize,
        /// ID of the new song
        song_id: SongId,
        /// ID of the song that was active before (if any)
        previous_song_id: Option<SongId>,
    },

    /// Queue changed (songs added/removed/reordered/replaced)
    QueueChanged {
        /// New queue length
        length: usize,
        /// New selected slot
        current_index: Option<usize>,
    },

    /// Progress through the current song changed
    ProgressUpdated {
        /// Fraction in `[0, 1]`
        progress: f64,
    },

    /// Repeat flag toggled
    RepeatChanged {
        /// New repeat flag
        enabled: bool,
    },

    /// Something the user should be told about (backend failures)
    Notification {
        /// Human-readable message
        message: String,
    },
}

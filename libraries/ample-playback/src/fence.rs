//! Song-identity fence for backend notifications
//!
//! Backend notifications arrive on subscriptions that outlive the command
//! that created them. Each start is stamped with a `FenceToken`; only events
//! carrying the currently held token are acted upon.

use ample_core::{PlaybackPayload, SongId};

/// Identity of one started song
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FenceToken {
    /// Song the start command was issued for
    pub song_id: SongId,

    /// Start counter, distinguishes repeated starts of the same song
    pub session: u64,
}

/// Notification tagged with the token of the start that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedPayload {
    /// Owner of the subscription the payload arrived on
    pub token: FenceToken,

    /// Backend notification
    pub payload: PlaybackPayload,
}

/// Holder of the single authoritative token
#[derive(Debug, Default)]
pub struct Fence {
    current: Option<FenceToken>,
    sessions: u64,
}

impl Fence {
    /// Create a fence with no authoritative song
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the authoritative token with a fresh one for `song_id`
    pub fn issue(&mut self, song_id: SongId) -> FenceToken {
        self.sessions = self.sessions.wrapping_add(1);
        let token = FenceToken {
            song_id,
            session: self.sessions,
        };
        self.current = Some(token);
        token
    }

    /// Drop the authoritative token; every outstanding subscription becomes stale
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Whether events with `token` are still relevant
    pub fn admits(&self, token: FenceToken) -> bool {
        self.current == Some(token)
    }

    /// Currently authoritative token
    pub fn current(&self) -> Option<FenceToken> {
        self.current
    }
}

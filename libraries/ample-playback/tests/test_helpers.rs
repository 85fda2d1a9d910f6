//! Test helpers and fixtures for playback integration tests
//!
//! `RecordingBackend` is a scripted audio backend: it records every call,
//! keeps the sending half of every subscription it hands out so tests can
//! push notifications on any of them (including superseded ones), and can
//! be switched into a failing mode.

#![allow(dead_code)]

use ample_core::{AudioBackend, BackendError, PlaybackPayload, Song, SongId, Subscription};
use ample_playback::{PlaybackEvent, Transport};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};

/// One call made against the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Start(SongId),
    Pause,
    Resume,
    SeekForward(Duration),
    SeekBackward(Duration),
}

#[derive(Default)]
struct Recorded {
    calls: Vec<Call>,
    subscriptions: Vec<UnboundedSender<PlaybackPayload>>,
    failing: bool,
}

/// Audio backend that records calls instead of producing sound
#[derive(Default)]
pub struct RecordingBackend {
    recorded: Mutex<Recorded>,
}

impl RecordingBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every subsequent call fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.recorded.lock().unwrap().failing = failing;
    }

    /// All calls so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.recorded.lock().unwrap().calls.clone()
    }

    /// Songs passed to `start_song`, in order
    pub fn started(&self) -> Vec<SongId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Start(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Number of subscriptions handed out
    pub fn subscription_count(&self) -> usize {
        self.recorded.lock().unwrap().subscriptions.len()
    }

    /// Push a notification on the `n`th subscription (0-based)
    pub fn emit(&self, n: usize, payload: PlaybackPayload) {
        let recorded = self.recorded.lock().unwrap();
        recorded.subscriptions[n]
            .send(payload)
            .expect("subscription receiver dropped");
    }

    /// Push a notification on the newest subscription
    pub fn emit_latest(&self, payload: PlaybackPayload) {
        let n = self.subscription_count() - 1;
        self.emit(n, payload);
    }

    fn record(&self, call: Call) -> ample_core::Result<()> {
        let mut recorded = self.recorded.lock().unwrap();
        if recorded.failing {
            return Err(BackendError::unreachable("device disconnected"));
        }
        recorded.calls.push(call);
        Ok(())
    }
}

#[async_trait]
impl AudioBackend for RecordingBackend {
    async fn start_song(&self, id: SongId) -> ample_core::Result<Subscription> {
        self.record(Call::Start(id))?;
        let (tx, rx) = mpsc::unbounded_channel();
        self.recorded.lock().unwrap().subscriptions.push(tx);
        Ok(rx)
    }

    async fn pause_song(&self) -> ample_core::Result<()> {
        self.record(Call::Pause)
    }

    async fn resume_song(&self) -> ample_core::Result<()> {
        self.record(Call::Resume)
    }

    async fn seek_forward(&self, amount: Duration) -> ample_core::Result<()> {
        self.record(Call::SeekForward(amount))
    }

    async fn seek_backward(&self, amount: Duration) -> ample_core::Result<()> {
        self.record(Call::SeekBackward(amount))
    }
}

/// Test fixture: a three-minute song
pub fn song(id: u64) -> Song {
    Song::new(SongId(id), format!("Song {id}"), Duration::from_secs(180))
}

/// Test fixture: songs with the given ids, in order
pub fn songs(ids: &[u64]) -> Vec<Song> {
    ids.iter().copied().map(song).collect()
}

/// Notification: song reached its end
pub fn finished() -> PlaybackPayload {
    PlaybackPayload {
        progress_frames: 1_000,
        total_frames: 1_000,
        is_finished: true,
    }
}

/// Notification: song is part-way through
pub fn progress(progress_frames: u64, total_frames: u64) -> PlaybackPayload {
    PlaybackPayload {
        progress_frames,
        total_frames,
        is_finished: false,
    }
}

/// Wait for the next inbox entry and apply it
pub async fn pump(transport: &mut Transport) {
    let event = tokio::time::timeout(Duration::from_secs(1), transport.next_event())
        .await
        .expect("timed out waiting for backend notification")
        .expect("inbox closed");
    transport.handle_event(event).await;
}

/// Ids of the songs in the queue, in order
pub fn queue_ids(transport: &Transport) -> Vec<u64> {
    transport.queue().songs().iter().map(|s| s.id.0).collect()
}

/// Id of the selected song
pub fn current_id(transport: &Transport) -> Option<u64> {
    transport.current_song().map(|s| s.id.0)
}

/// Notification messages among drained events
pub fn notifications(events: &[PlaybackEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            PlaybackEvent::Notification { message } => Some(message.clone()),
            _ => None,
        })
        .collect()
}

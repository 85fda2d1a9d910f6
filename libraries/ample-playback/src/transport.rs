//! Transport synchronizer - core orchestration
//!
//! Couples the queue store to an asynchronous audio backend. Commands mutate
//! the queue and issue backend requests; notifications stream back through a
//! single inbox and are checked against the fence before they may touch
//! progress or advance the queue.
//!
//! ```text
//!  command ──► Transport ──start/pause/seek──► AudioBackend
//!                 ▲                                 │
//!                 │      (per-start subscription)   │
//!                 └──── inbox ◄── forwarder task ◄──┘
//! ```
//!
//! The forwarder tags each payload with the token of the start that created
//! the subscription. The transport never captures itself in a callback; the
//! inbox is the only path back in.

use crate::{
    events::PlaybackEvent,
    fence::{Fence, FenceToken, TaggedPayload},
    queue::Queue,
    shuffle::shuffle_items,
    types::{PlaybackConfig, PlayerSnapshot, TransportState},
};
use ample_core::{AudioBackend, BackendError, Song, Subscription};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

/// Central transport management
///
/// Owns the queue, the playback session (fence, state, progress, repeat)
/// and the notification inbox. All methods run to completion before the
/// next one starts; callers serialize access (see `PlayerService`).
pub struct Transport {
    backend: Arc<dyn AudioBackend>,
    config: PlaybackConfig,

    // Queue store
    queue: Queue,

    // Playback session
    fence: Fence,
    state: TransportState,
    progress: f64,
    repeat: bool,

    // Notification inbox shared by all forwarders
    inbox_tx: UnboundedSender<TaggedPayload>,
    inbox_rx: UnboundedReceiver<TaggedPayload>,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl Transport {
    /// Create new transport over the given backend
    pub fn new(backend: Arc<dyn AudioBackend>, config: PlaybackConfig) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Self {
            backend,
            repeat: config.repeat,
            config,
            queue: Queue::new(),
            fence: Fence::new(),
            state: TransportState::Idle,
            progress: 0.0,
            inbox_tx,
            inbox_rx,
            pending_events: Vec::new(),
        }
    }

    // ===== Playback Control =====

    /// Play a song
    ///
    /// With `new_queue`, the queue is replaced and anchored at `song`; a
    /// `song` missing from `new_queue` is put in front of it. Otherwise the
    /// pointer moves to the song's first slot, appending it if it is not
    /// queued yet. Either way `song` ends up selected and is started.
    pub async fn play(&mut self, song: Song, new_queue: Option<Vec<Song>>) {
        let id = song.id;

        let index = match new_queue {
            Some(mut songs) => {
                if !songs.iter().any(|s| s.id == id) {
                    songs.insert(0, song);
                }
                self.queue.replace(songs, Some(id))
            }
            None => Some(self.queue.position_of(id).unwrap_or_else(|| {
                self.queue.append([song]);
                self.queue.len() - 1
            })),
        };
        self.emit_queue_changed();

        if let Some(index) = index {
            self.start_at(index).await;
        }
    }

    /// Pause when playing, resume when paused
    ///
    /// A selected song that was never started (or failed to start) is
    /// started. No-op when nothing is selected.
    pub async fn toggle_play(&mut self) {
        let Some(index) = self.queue.current_index() else {
            return;
        };

        match self.state {
            TransportState::Starting | TransportState::Playing => {
                if let Err(e) = self.backend.pause_song().await {
                    self.report("Failed to pause playback", &e);
                }
                self.set_state(TransportState::Paused);
            }
            TransportState::Paused => match self.backend.resume_song().await {
                Ok(()) => self.set_state(TransportState::Playing),
                Err(e) => self.report("Failed to resume playback", &e),
            },
            TransportState::Idle => self.start_at(index).await,
        }
    }

    /// Advance to the next slot
    ///
    /// Wraps to the first slot when repeat is on; otherwise running off the
    /// end stops playback and deselects.
    pub async fn play_next(&mut self) {
        if self.queue.is_empty() {
            return;
        }

        let next = self.queue.current_index().map_or(0, |i| i + 1);
        if next < self.queue.len() {
            self.start_at(next).await;
        } else if self.repeat {
            self.start_at(0).await;
        } else {
            info!("Reached end of queue");
            self.stop().await;
            self.queue.set_current_index(None);
            self.emit_queue_changed();
        }
    }

    /// Go back one slot
    ///
    /// At the first slot the current song restarts from the beginning so
    /// the command always has an audible effect.
    pub async fn play_prev(&mut self) {
        if self.queue.is_empty() {
            return;
        }

        let index = match self.queue.current_index() {
            Some(i) if i > 0 => i - 1,
            Some(i) => i,
            None => 0,
        };
        self.start_at(index).await;
    }

    /// Select the slot `index` and start it
    pub async fn jump_to(&mut self, index: usize) {
        if index < self.queue.len() {
            self.start_at(index).await;
        } else {
            debug!(index, len = self.queue.len(), "Ignoring jump past end of queue");
        }
    }

    /// Stop playback
    ///
    /// Invalidates the current subscription and returns to `Idle`.
    /// The queue and pointer are left alone.
    pub async fn stop(&mut self) {
        let had_session = self.fence.current().is_some() || self.state != TransportState::Idle;
        self.fence.clear();

        if had_session {
            if let Err(e) = self.backend.pause_song().await {
                self.report("Failed to stop playback", &e);
            }
        }

        self.set_progress(0.0);
        self.set_state(TransportState::Idle);
    }

    // ===== Seek =====

    /// Seek forward in the current song
    pub async fn seek_forward(&mut self, amount: Duration) {
        if let Err(e) = self.backend.seek_forward(amount).await {
            self.report("Failed to seek forward", &e);
        }
    }

    /// Seek backward in the current song
    pub async fn seek_backward(&mut self, amount: Duration) {
        if let Err(e) = self.backend.seek_backward(amount).await {
            self.report("Failed to seek backward", &e);
        }
    }

    // ===== Repeat =====

    /// Flip the repeat flag consulted by `play_next`
    pub fn toggle_repeat(&mut self) {
        self.repeat = !self.repeat;
        self.pending_events.push(PlaybackEvent::RepeatChanged {
            enabled: self.repeat,
        });
    }

    // ===== Queue Management =====

    /// Append songs to the end of the queue
    pub fn add_to_queue(&mut self, songs: Vec<Song>) {
        self.queue.append(songs);
        self.emit_queue_changed();
    }

    /// Remove the song at `index`
    ///
    /// Removing the active slot never leaves the removed song audible: an
    /// emptied queue stops playback, otherwise the song now occupying the
    /// pointer is started (when playing) or the session is dropped (when
    /// paused).
    pub async fn remove_from_queue(&mut self, index: usize) {
        let was_current = self.queue.current_index() == Some(index);

        let Some(removed) = self.queue.remove_at(index) else {
            debug!(index, len = self.queue.len(), "Ignoring removal past end of queue");
            return;
        };
        debug!(index, song_id = %removed.id, "Removed song from queue");
        self.emit_queue_changed();

        if !was_current {
            return;
        }

        match (self.queue.current_index(), self.state) {
            (None, _) => self.stop().await,
            (Some(next), TransportState::Starting | TransportState::Playing) => {
                self.start_at(next).await;
            }
            (Some(_), TransportState::Paused) => self.stop().await,
            (Some(_), TransportState::Idle) => {}
        }
    }

    /// Move a song within the queue
    pub fn move_in_queue(&mut self, from: usize, to: usize) {
        self.queue.move_within(from, to);
        self.emit_queue_changed();
    }

    /// Shuffle the queue, keeping the selected song selected
    pub fn shuffle_queue(&mut self) {
        self.queue.shuffle();
        self.emit_queue_changed();
    }

    /// Empty the queue and stop playback
    pub async fn clear_queue(&mut self) {
        self.queue.clear();
        self.emit_queue_changed();
        self.stop().await;
    }

    /// Replace the queue without starting anything
    ///
    /// The active song stays selected if it is part of `songs`; otherwise
    /// nothing is selected and playback stops.
    pub async fn set_queue(&mut self, songs: Vec<Song>) {
        let anchor = self
            .queue
            .current_song()
            .map(|s| s.id)
            .filter(|id| songs.iter().any(|s| s.id == *id));

        self.queue.replace(songs, anchor);
        self.emit_queue_changed();

        if anchor.is_none() {
            self.stop().await;
        }
    }

    /// Shuffle `songs` and play them as the new queue
    pub async fn shuffle_and_play(&mut self, mut songs: Vec<Song>) {
        shuffle_items(&mut songs, &mut rand::thread_rng());
        let Some(first) = songs.first().cloned() else {
            return;
        };
        self.play(first, Some(songs)).await;
    }

    // ===== Backend Notifications =====

    /// Wait for the next backend notification
    ///
    /// Never returns `None` while the transport is alive (it holds a sender).
    pub async fn next_event(&mut self) -> Option<TaggedPayload> {
        self.inbox_rx.recv().await
    }

    /// Apply one backend notification
    ///
    /// Notifications from superseded starts are dropped. A finished song
    /// advances the queue; progress is only updated when the total length
    /// is known.
    pub async fn handle_event(&mut self, event: TaggedPayload) {
        if !self.fence.admits(event.token) {
            debug!(
                song_id = %event.token.song_id,
                session = event.token.session,
                "Dropping stale playback event"
            );
            return;
        }

        let payload = event.payload;
        if payload.is_finished {
            debug!(song_id = %event.token.song_id, "Song finished");
            self.play_next().await;
        } else if let Some(progress) = payload.fraction() {
            self.set_progress(progress);
        }
    }

    // ===== State Queries =====

    /// Queue store (read-only)
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Selected slot
    pub fn current_index(&self) -> Option<usize> {
        self.queue.current_index()
    }

    /// Song in the selected slot
    pub fn current_song(&self) -> Option<&Song> {
        self.queue.current_song()
    }

    /// Transport state
    pub fn state(&self) -> TransportState {
        self.state
    }

    /// Whether audio is playing
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    /// Whether the queue wraps around
    pub fn is_repeating(&self) -> bool {
        self.repeat
    }

    /// Progress through the current song
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Token of the start whose notifications are currently authoritative
    pub fn fence_token(&self) -> Option<FenceToken> {
        self.fence.current()
    }

    /// Copy of everything a UI renders
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            queue: self.queue.songs().to_vec(),
            current_index: self.queue.current_index(),
            current_song: self.queue.current_song().cloned(),
            state: self.state,
            is_playing: self.is_playing(),
            is_repeating: self.repeat,
            progress: self.progress,
        }
    }

    /// Whether anything changed since the last drain
    ///
    /// Every observable change queues an event, so an empty queue means the
    /// snapshot is unchanged too.
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    /// Drain all pending events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== Internals =====

    /// Select `index` and issue a start command for its song
    async fn start_at(&mut self, index: usize) {
        let Some(song) = self.queue.get(index).cloned() else {
            return;
        };

        let previous_song_id = self.fence.current().map(|t| t.song_id);
        if self.queue.current_index() != Some(index) {
            self.queue.set_current_index(Some(index));
            self.emit_queue_changed();
        }

        let token = self.fence.issue(song.id);
        self.set_progress(0.0);
        self.set_state(TransportState::Starting);
        self.pending_events.push(PlaybackEvent::TrackChanged {
            index,
            song_id: song.id,
            previous_song_id,
        });
        info!(song_id = %song.id, index, title = %song.title, "Starting song");

        match self.backend.start_song(song.id).await {
            Ok(subscription) => {
                self.forward(token, subscription);
                self.set_state(TransportState::Playing);
            }
            Err(e) => {
                self.fence.clear();
                self.set_state(TransportState::Idle);
                self.report("Failed to play song", &e);
            }
        }
    }

    /// Pump a subscription into the inbox, tagged with its owner
    fn forward(&self, token: FenceToken, mut subscription: Subscription) {
        let inbox = self.inbox_tx.clone();
        tokio::spawn(async move {
            while let Some(payload) = subscription.recv().await {
                if inbox.send(TaggedPayload { token, payload }).is_err() {
                    break;
                }
            }
        });
    }

    fn report(&mut self, context: &str, error: &BackendError) {
        warn!(error = %error, "{}", context);
        self.pending_events.push(PlaybackEvent::Notification {
            message: format!("{context}: {error}"),
        });
    }

    fn set_state(&mut self, state: TransportState) {
        if self.state != state {
            self.state = state;
            self.pending_events
                .push(PlaybackEvent::StateChanged { state });
        }
    }

    fn set_progress(&mut self, progress: f64) {
        if self.progress != progress {
            self.progress = progress;
            self.pending_events
                .push(PlaybackEvent::ProgressUpdated { progress });
        }
    }

    fn emit_queue_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
            current_index: self.queue.current_index(),
        });
    }
}

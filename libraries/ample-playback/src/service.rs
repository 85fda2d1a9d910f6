//! Playback service
//!
//! Runs a `Transport` on its own tokio task: the single logical thread of
//! control. Commands from any number of `PlayerHandle`s are executed one at
//! a time in the order they were sent; backend notifications are handled
//! between commands. After every command, and after every notification that
//! changed something, the new state is published to subscribers.

use crate::{
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    transport::Transport,
    types::PlayerSnapshot,
};
use ample_core::Song;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::debug;

/// Commands accepted by the playback service
#[derive(Debug, Clone)]
pub enum PlayerCommand {
    /// Play a song, optionally replacing the queue
    Play {
        /// Song to play
        song: Song,
        /// Replacement queue (anchored at `song`)
        queue: Option<Vec<Song>>,
    },

    /// Pause or resume
    TogglePlay,

    /// Skip to next song
    Next,

    /// Go to previous song
    Previous,

    /// Start the song at a queue slot
    JumpTo(usize),

    /// Stop playback (queue unchanged)
    Stop,

    /// Append songs to queue
    AddToQueue(Vec<Song>),

    /// Remove song from queue
    RemoveFromQueue(usize),

    /// Reorder queue
    MoveInQueue {
        /// Source slot
        from: usize,
        /// Destination slot
        to: usize,
    },

    /// Shuffle queue in place
    ShuffleQueue,

    /// Clear queue
    ClearQueue,

    /// Replace queue without starting playback
    SetQueue(Vec<Song>),

    /// Shuffle songs and play them as the new queue
    ShuffleAndPlay(Vec<Song>),

    /// Seek forward
    SeekForward(Duration),

    /// Seek backward
    SeekBackward(Duration),

    /// Toggle repeat
    ToggleRepeat,
}

struct Envelope {
    command: PlayerCommand,
    ack: oneshot::Sender<()>,
}

/// Capacity of the command channel
const COMMAND_BUFFER: usize = 32;

/// Capacity of the event broadcast channel
const EVENT_BUFFER: usize = 256;

/// Spawner for the playback task
pub struct PlayerService;

impl PlayerService {
    /// Spawn the playback task and return a handle to it
    ///
    /// Must be called from within a tokio runtime. The task ends when the
    /// last handle is dropped.
    pub fn spawn(transport: Transport) -> PlayerHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(transport.snapshot());
        let (event_tx, _) = broadcast::channel(EVENT_BUFFER);

        tokio::spawn(run(transport, command_rx, snapshot_tx, event_tx.clone()));

        PlayerHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            events: event_tx,
        }
    }
}

async fn run(
    mut transport: Transport,
    mut commands: mpsc::Receiver<Envelope>,
    snapshots: watch::Sender<PlayerSnapshot>,
    events: broadcast::Sender<PlaybackEvent>,
) {
    loop {
        tokio::select! {
            envelope = commands.recv() => {
                let Some(Envelope { command, ack }) = envelope else {
                    break;
                };
                execute(&mut transport, command).await;
                publish(&mut transport, &snapshots, &events);
                // Caller may have stopped waiting
                let _ = ack.send(());
            }
            Some(event) = transport.next_event() => {
                transport.handle_event(event).await;
                // Stale and no-op notifications leave subscribers alone
                if transport.has_pending_events() {
                    publish(&mut transport, &snapshots, &events);
                }
            }
        }
    }

    debug!("Playback service stopped");
}

async fn execute(transport: &mut Transport, command: PlayerCommand) {
    debug!(?command, "Executing player command");

    match command {
        PlayerCommand::Play { song, queue } => transport.play(song, queue).await,
        PlayerCommand::TogglePlay => transport.toggle_play().await,
        PlayerCommand::Next => transport.play_next().await,
        PlayerCommand::Previous => transport.play_prev().await,
        PlayerCommand::JumpTo(index) => transport.jump_to(index).await,
        PlayerCommand::Stop => transport.stop().await,
        PlayerCommand::AddToQueue(songs) => transport.add_to_queue(songs),
        PlayerCommand::RemoveFromQueue(index) => transport.remove_from_queue(index).await,
        PlayerCommand::MoveInQueue { from, to } => transport.move_in_queue(from, to),
        PlayerCommand::ShuffleQueue => transport.shuffle_queue(),
        PlayerCommand::ClearQueue => transport.clear_queue().await,
        PlayerCommand::SetQueue(songs) => transport.set_queue(songs).await,
        PlayerCommand::ShuffleAndPlay(songs) => transport.shuffle_and_play(songs).await,
        PlayerCommand::SeekForward(amount) => transport.seek_forward(amount).await,
        PlayerCommand::SeekBackward(amount) => transport.seek_backward(amount).await,
        PlayerCommand::ToggleRepeat => transport.toggle_repeat(),
    }
}

fn publish(
    transport: &mut Transport,
    snapshots: &watch::Sender<PlayerSnapshot>,
    events: &broadcast::Sender<PlaybackEvent>,
) {
    for event in transport.drain_events() {
        // No subscribers is fine
        let _ = events.send(event);
    }
    snapshots.send_replace(transport.snapshot());
}

/// Cloneable handle to the playback task
///
/// Every command method resolves once the command has been fully executed,
/// including its backend round trip.
#[derive(Clone)]
pub struct PlayerHandle {
    commands: mpsc::Sender<Envelope>,
    snapshots: watch::Receiver<PlayerSnapshot>,
    events: broadcast::Sender<PlaybackEvent>,
}

impl PlayerHandle {
    /// Send a command and wait until it has been executed
    pub async fn execute(&self, command: PlayerCommand) -> Result<()> {
        let (ack, done) = oneshot::channel();
        self.commands
            .send(Envelope { command, ack })
            .await
            .map_err(|_| PlaybackError::ServiceClosed)?;
        done.await.map_err(|_| PlaybackError::ServiceClosed)
    }

    /// Play a song, optionally replacing the queue
    pub async fn play(&self, song: Song, queue: Option<Vec<Song>>) -> Result<()> {
        self.execute(PlayerCommand::Play { song, queue }).await
    }

    /// Pause or resume
    pub async fn toggle_play(&self) -> Result<()> {
        self.execute(PlayerCommand::TogglePlay).await
    }

    /// Skip to next song
    pub async fn next(&self) -> Result<()> {
        self.execute(PlayerCommand::Next).await
    }

    /// Go to previous song
    pub async fn previous(&self) -> Result<()> {
        self.execute(PlayerCommand::Previous).await
    }

    /// Start the song at a queue slot
    pub async fn jump_to(&self, index: usize) -> Result<()> {
        self.execute(PlayerCommand::JumpTo(index)).await
    }

    /// Append songs to queue
    pub async fn add_to_queue(&self, songs: Vec<Song>) -> Result<()> {
        self.execute(PlayerCommand::AddToQueue(songs)).await
    }

    /// Remove song from queue
    pub async fn remove_from_queue(&self, index: usize) -> Result<()> {
        self.execute(PlayerCommand::RemoveFromQueue(index)).await
    }

    /// Reorder queue
    pub async fn move_in_queue(&self, from: usize, to: usize) -> Result<()> {
        self.execute(PlayerCommand::MoveInQueue { from, to }).await
    }

    /// Shuffle queue in place
    pub async fn shuffle_queue(&self) -> Result<()> {
        self.execute(PlayerCommand::ShuffleQueue).await
    }

    /// Clear queue
    pub async fn clear_queue(&self) -> Result<()> {
        self.execute(PlayerCommand::ClearQueue).await
    }

    /// Shuffle songs and play them as the new queue
    pub async fn shuffle_and_play(&self, songs: Vec<Song>) -> Result<()> {
        self.execute(PlayerCommand::ShuffleAndPlay(songs)).await
    }

    /// Seek forward
    pub async fn seek_forward(&self, amount: Duration) -> Result<()> {
        self.execute(PlayerCommand::SeekForward(amount)).await
    }

    /// Seek backward
    pub async fn seek_backward(&self, amount: Duration) -> Result<()> {
        self.execute(PlayerCommand::SeekBackward(amount)).await
    }

    /// Stop playback, keeping the queue and selection
    pub async fn stop(&self) -> Result<()> {
        self.execute(PlayerCommand::Stop).await
    }

    /// Replace the queue without starting playback
    pub async fn set_queue(&self, songs: Vec<Song>) -> Result<()> {
        self.execute(PlayerCommand::SetQueue(songs)).await
    }

    /// Toggle repeat
    pub async fn toggle_repeat(&self) -> Result<()> {
        self.execute(PlayerCommand::ToggleRepeat).await
    }

    /// Latest published state
    pub fn snapshot(&self) -> PlayerSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that is notified whenever the state is republished
    pub fn watch(&self) -> watch::Receiver<PlayerSnapshot> {
        self.snapshots.clone()
    }

    /// Subscribe to playback events
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }
}

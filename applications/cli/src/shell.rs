/// Interactive playback shell
use crate::commands::{self, Command, HELP};
use ample_core::{Song, SongId};
use ample_playback::{PlaybackEvent, PlayerHandle, PlayerSnapshot, TransportState};
use anyhow::Context;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast::error::RecvError;

pub struct Shell {
    player: PlayerHandle,
    songs: Vec<Song>,
    by_id: Arc<HashMap<SongId, Song>>,
    seek_step: Duration,
}

impl Shell {
    pub fn new(player: PlayerHandle, songs: Vec<Song>, seek_step: Duration) -> Self {
        let by_id = songs.iter().map(|s| (s.id, s.clone())).collect();

        Self {
            player,
            songs,
            by_id: Arc::new(by_id),
            seek_step,
        }
    }

    /// Read commands line by line until `quit` or end of input
    pub async fn run<R: AsyncBufRead + Unpin>(&self, input: R) -> anyhow::Result<()> {
        let mut lines = input.lines();

        while let Some(line) = lines.next_line().await.context("Failed to read input")? {
            match commands::parse(&line) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => self.execute(command).await?,
                Ok(None) => {}
                Err(e) => println!("{e}"),
            }
        }

        Ok(())
    }

    /// Print track changes and notifications as they happen
    pub fn spawn_event_printer(&self) {
        let mut events = self.player.subscribe();
        let by_id = Arc::clone(&self.by_id);

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(PlaybackEvent::TrackChanged { song_id, .. }) => match by_id.get(&song_id) {
                        Some(song) => println!("Now playing: {song}"),
                        None => println!("Now playing: #{song_id}"),
                    },
                    Ok(PlaybackEvent::Notification { message }) => println!("! {message}"),
                    Ok(_) | Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }

    async fn execute(&self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Play(id) => match self.lookup(id) {
                Some(song) => self.player.play(song, None).await?,
                None => println!("No song with id {id}"),
            },
            Command::Jump(slot) => {
                if self.check_slot(slot) {
                    self.player.jump_to(slot).await?;
                }
            }
            Command::Next => self.player.next().await?,
            Command::Prev => self.player.previous().await?,
            Command::Toggle => self.player.toggle_play().await?,
            Command::Stop => self.player.stop().await?,
            Command::Add(ids) => {
                let mut songs = Vec::with_capacity(ids.len());
                for id in ids {
                    match self.lookup(id) {
                        Some(song) => songs.push(song),
                        None => println!("No song with id {id}"),
                    }
                }
                if !songs.is_empty() {
                    self.player.add_to_queue(songs).await?;
                }
            }
            Command::Remove(slot) => {
                if self.check_slot(slot) {
                    self.player.remove_from_queue(slot).await?;
                }
            }
            Command::Move { from, to } => {
                if self.check_slot(from) && self.check_slot(to) {
                    self.player.move_in_queue(from, to).await?;
                }
            }
            Command::Shuffle => self.player.shuffle_queue().await?,
            Command::ShuffleAll => self.player.shuffle_and_play(self.songs.clone()).await?,
            Command::Clear => self.player.clear_queue().await?,
            Command::Repeat => {
                self.player.toggle_repeat().await?;
                let on = self.player.snapshot().is_repeating;
                println!("Repeat {}", if on { "on" } else { "off" });
            }
            Command::Forward(amount) => {
                self.player
                    .seek_forward(amount.unwrap_or(self.seek_step))
                    .await?;
            }
            Command::Rewind(amount) => {
                self.player
                    .seek_backward(amount.unwrap_or(self.seek_step))
                    .await?;
            }
            Command::Queue => print!("{}", queue_listing(&self.player.snapshot())),
            Command::Status => println!("{}", status_line(&self.player.snapshot())),
            Command::Library => {
                for song in &self.songs {
                    println!("{:>4}  {song}", song.id);
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => {}
        }

        Ok(())
    }

    fn lookup(&self, id: SongId) -> Option<Song> {
        self.by_id.get(&id).cloned()
    }

    fn check_slot(&self, slot: usize) -> bool {
        let len = self.player.snapshot().queue.len();
        if slot >= len {
            println!("No slot {slot} (queue has {len} songs)");
            return false;
        }
        true
    }
}

/// One-line summary of the transport
pub fn status_line(snapshot: &PlayerSnapshot) -> String {
    let repeat = if snapshot.is_repeating { " [repeat]" } else { "" };

    let Some(song) = &snapshot.current_song else {
        return format!("Nothing selected{repeat}");
    };

    let state = match snapshot.state {
        TransportState::Idle => "Stopped",
        TransportState::Starting => "Loading",
        TransportState::Playing => "Playing",
        TransportState::Paused => "Paused",
    };
    let percent = (snapshot.progress * 100.0).round() as u32;

    format!("{state}: {song} {percent}%{repeat}")
}

/// Queue contents, one slot per line, with the selected slot marked
pub fn queue_listing(snapshot: &PlayerSnapshot) -> String {
    if snapshot.queue.is_empty() {
        return "Queue is empty\n".to_string();
    }

    let mut out = String::new();
    for (slot, song) in snapshot.queue.iter().enumerate() {
        let marker = if snapshot.current_index == Some(slot) { '>' } else { ' ' };
        // Writing to a String cannot fail
        let _ = writeln!(out, "{marker} {slot:>3}  {song}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ample_audio::{ClockBackend, ClockConfig};
    use ample_playback::{PlaybackConfig, PlayerService, Transport};

    fn library() -> Vec<Song> {
        (1..=5)
            .map(|id| Song::new(SongId(id), format!("Track {id}"), Duration::from_secs(60)))
            .collect()
    }

    fn shell() -> (Shell, PlayerHandle) {
        let songs = library();
        let backend = Arc::new(ClockBackend::new(songs.clone(), ClockConfig::default()));
        let player = PlayerService::spawn(Transport::new(backend, PlaybackConfig::default()));
        let shell = Shell::new(player.clone(), songs, Duration::from_secs(5));
        (shell, player)
    }

    #[tokio::test]
    async fn test_runs_commands_until_quit() {
        let (shell, player) = shell();
        let input = b"add 1 2 3\njump 1\nmv 1 2\nbogus\nrepeat\nquit\nadd 4\n";

        shell.run(&input[..]).await.unwrap();

        let snapshot = player.snapshot();
        assert_eq!(snapshot.queue.len(), 3);
        assert_eq!(snapshot.current_index, Some(2));
        assert_eq!(snapshot.current_song.map(|s| s.id), Some(SongId(2)));
        assert!(snapshot.is_repeating);
        assert!(snapshot.is_playing);
    }

    #[tokio::test]
    async fn test_unknown_ids_and_slots_are_skipped() {
        let (shell, player) = shell();

        shell.run(&b"play 42\nadd 9 1\nrm 3\njump 5\n"[..]).await.unwrap();

        let snapshot = player.snapshot();
        assert_eq!(snapshot.queue.len(), 1);
        assert_eq!(snapshot.current_index, None);
        assert!(!snapshot.is_playing);
    }

    #[tokio::test]
    async fn test_shuffle_all_plays_whole_library() {
        let (shell, player) = shell();

        shell.run(&b"shuffle-all\ntoggle\n"[..]).await.unwrap();

        let snapshot = player.snapshot();
        assert_eq!(snapshot.queue.len(), 5);
        assert_eq!(snapshot.current_index, Some(0));
        assert_eq!(snapshot.state, TransportState::Paused);
    }

    #[tokio::test]
    async fn test_stop_keeps_selection() {
        let (shell, player) = shell();

        shell.run(&b"add 1 2\njump 1\nstop\n"[..]).await.unwrap();

        let snapshot = player.snapshot();
        assert_eq!(snapshot.state, TransportState::Idle);
        assert_eq!(snapshot.current_index, Some(1));
        assert_eq!(status_line(&snapshot), "Stopped: Track 2 (1:00) 0%");
    }

    #[test]
    fn test_status_line() {
        let song = Song::new(SongId(1), "Blue", Duration::from_secs(185)).with_artist("Joni");
        let mut snapshot = PlayerSnapshot::default();
        assert_eq!(status_line(&snapshot), "Nothing selected");

        snapshot.current_song = Some(song);
        snapshot.state = TransportState::Playing;
        snapshot.progress = 0.424;
        snapshot.is_repeating = true;
        assert_eq!(
            status_line(&snapshot),
            "Playing: Joni - Blue (3:05) 42% [repeat]"
        );
    }

    #[test]
    fn test_queue_listing_marks_current_slot() {
        let mut snapshot = PlayerSnapshot::default();
        assert_eq!(queue_listing(&snapshot), "Queue is empty\n");

        snapshot.queue = library().into_iter().take(2).collect();
        snapshot.current_index = Some(1);
        assert_eq!(
            queue_listing(&snapshot),
            "    0  Track 1 (1:00)\n>   1  Track 2 (1:00)\n"
        );
    }
}

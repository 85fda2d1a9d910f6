//! Wall-clock backend
//!
//! Plays songs silently: a frame cursor advances at the configured sample
//! rate and a ticker task reports it on the subscription returned by
//! `start_song`. A paused cursor is not reported. Each start bumps a generation counter; a ticker whose
//! generation is no longer current stops and drops its sender, which closes
//! the superseded subscription.

use ample_core::{AudioBackend, BackendError, PlaybackPayload, Result, Song, SongId, Subscription};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Clock backend configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Interval between progress notifications (default: 100ms)
    pub tick_interval_ms: u64,

    /// Frames per second used for cursor arithmetic (default: 44100)
    pub sample_rate: u32,
}

impl ClockConfig {
    /// Tick interval as a duration (never zero)
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Number of frames covering `duration`
    pub fn frames_for(&self, duration: Duration) -> u64 {
        let frames = duration.as_millis() * u128::from(self.sample_rate) / 1_000;
        u64::try_from(frames).unwrap_or(u64::MAX)
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            sample_rate: 44_100,
        }
    }
}

/// Song currently under the cursor
#[derive(Debug, Clone, Copy)]
struct Loaded {
    cursor: u64,
    total: u64,
    paused: bool,
}

/// Outcome of one ticker wakeup
#[derive(Debug, Clone, Copy, PartialEq)]
enum Tick {
    /// Cursor position to report
    Report(PlaybackPayload),
    /// Paused; nothing to report
    Held,
    /// A newer start owns the deck
    Superseded,
}

/// Shared playback state
#[derive(Debug, Default)]
struct Deck {
    generation: u64,
    loaded: Option<Loaded>,
}

impl Deck {
    /// Load a song and return the generation that owns it
    fn load(&mut self, total: u64) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.loaded = Some(Loaded {
            cursor: 0,
            total,
            paused: false,
        });
        self.generation
    }

    /// Advance by one tick on behalf of `generation`
    fn tick(&mut self, generation: u64, frames: u64) -> Tick {
        if generation != self.generation {
            return Tick::Superseded;
        }
        let Some(loaded) = self.loaded.as_mut() else {
            return Tick::Superseded;
        };
        if loaded.paused {
            return Tick::Held;
        }

        loaded.cursor = loaded.cursor.saturating_add(frames).min(loaded.total);
        Tick::Report(PlaybackPayload {
            progress_frames: loaded.cursor,
            total_frames: loaded.total,
            is_finished: loaded.cursor >= loaded.total,
        })
    }
}

/// Silent backend driven by the tokio clock
#[derive(Clone)]
pub struct ClockBackend {
    catalog: Arc<HashMap<SongId, Song>>,
    config: ClockConfig,
    deck: Arc<Mutex<Deck>>,
}

impl ClockBackend {
    /// Create a backend that can play the songs in `catalog`
    pub fn new(catalog: impl IntoIterator<Item = Song>, config: ClockConfig) -> Self {
        let catalog = catalog.into_iter().map(|song| (song.id, song)).collect();

        Self {
            catalog: Arc::new(catalog),
            config,
            deck: Arc::new(Mutex::new(Deck::default())),
        }
    }

    /// Song lookup
    pub fn song(&self, id: SongId) -> Option<&Song> {
        self.catalog.get(&id)
    }

    fn deck(&self) -> Result<MutexGuard<'_, Deck>> {
        self.deck.lock().map_err(|_| BackendError::Poisoned)
    }

    fn with_loaded(&self, f: impl FnOnce(&mut Loaded)) -> Result<()> {
        if let Some(loaded) = self.deck()?.loaded.as_mut() {
            f(loaded);
        }
        Ok(())
    }
}

#[async_trait]
impl AudioBackend for ClockBackend {
    async fn start_song(&self, id: SongId) -> Result<Subscription> {
        let song = self.song(id).ok_or(BackendError::UnknownSong(id))?;
        let total = self.config.frames_for(song.duration);
        let generation = self.deck()?.load(total);

        debug!(song_id = %id, generation, total_frames = total, "Loaded song");

        let (tx, rx) = mpsc::unbounded_channel();
        let deck = Arc::clone(&self.deck);
        let interval = self.config.tick_interval();
        let frames_per_tick = self.config.frames_for(interval);

        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;

                let tick = match deck.lock() {
                    Ok(mut deck) => deck.tick(generation, frames_per_tick),
                    Err(_) => Tick::Superseded,
                };
                let payload = match tick {
                    Tick::Report(payload) => payload,
                    Tick::Held => continue,
                    Tick::Superseded => {
                        trace!(generation, "Ticker superseded");
                        break;
                    }
                };

                if tx.send(payload).is_err() || payload.is_finished {
                    break;
                }
            }
        });

        Ok(rx)
    }

    async fn pause_song(&self) -> Result<()> {
        self.with_loaded(|loaded| loaded.paused = true)
    }

    async fn resume_song(&self) -> Result<()> {
        self.with_loaded(|loaded| loaded.paused = false)
    }

    async fn seek_forward(&self, amount: Duration) -> Result<()> {
        let frames = self.config.frames_for(amount);
        self.with_loaded(|loaded| {
            loaded.cursor = loaded.cursor.saturating_add(frames).min(loaded.total);
        })
    }

    async fn seek_backward(&self, amount: Duration) -> Result<()> {
        let frames = self.config.frames_for(amount);
        self.with_loaded(|loaded| {
            loaded.cursor = loaded.cursor.saturating_sub(frames);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_for_uses_sample_rate() {
        let config = ClockConfig::default();
        assert_eq!(config.frames_for(Duration::from_secs(2)), 88_200);
        assert_eq!(config.frames_for(Duration::from_millis(100)), 4_410);
        assert_eq!(config.frames_for(Duration::ZERO), 0);
    }

    #[test]
    fn zero_tick_interval_is_clamped() {
        let config = ClockConfig {
            tick_interval_ms: 0,
            ..ClockConfig::default()
        };
        assert_eq!(config.tick_interval(), Duration::from_millis(1));
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: ClockConfig = serde_json::from_str(r#"{"sample_rate": 8000}"#).unwrap();
        assert_eq!(config.sample_rate, 8_000);
        assert_eq!(config.tick_interval_ms, 100);
    }

    fn reported(tick: Tick) -> PlaybackPayload {
        match tick {
            Tick::Report(payload) => payload,
            other => panic!("expected a report, got {other:?}"),
        }
    }

    #[test]
    fn tick_advances_and_finishes() {
        let mut deck = Deck::default();
        let generation = deck.load(250);

        let first = reported(deck.tick(generation, 100));
        assert_eq!(first.progress_frames, 100);
        assert!(!first.is_finished);

        deck.tick(generation, 100);
        let last = reported(deck.tick(generation, 100));
        assert_eq!(last.progress_frames, 250);
        assert!(last.is_finished);
    }

    #[test]
    fn paused_tick_is_held_without_advancing() {
        let mut deck = Deck::default();
        let generation = deck.load(1_000);
        deck.tick(generation, 100);

        deck.loaded.as_mut().unwrap().paused = true;
        assert_eq!(deck.tick(generation, 100), Tick::Held);
        assert_eq!(deck.tick(generation, 100), Tick::Held);

        deck.loaded.as_mut().unwrap().paused = false;
        assert_eq!(reported(deck.tick(generation, 100)).progress_frames, 200);
    }

    #[test]
    fn superseded_generation_stops_ticking() {
        let mut deck = Deck::default();
        let old = deck.load(1_000);
        let new = deck.load(1_000);

        assert_eq!(deck.tick(old, 100), Tick::Superseded);
        assert!(matches!(deck.tick(new, 100), Tick::Report(_)));
    }

    #[test]
    fn empty_song_finishes_on_first_tick() {
        let mut deck = Deck::default();
        let generation = deck.load(0);
        let payload = reported(deck.tick(generation, 100));
        assert!(payload.is_finished);
        assert_eq!(payload.fraction(), None);
    }
}

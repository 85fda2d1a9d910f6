//! Integration tests for the clock backend
//!
//! Runs on a paused tokio clock so ticks are deterministic:
//! - Progress reporting and completion
//! - Supersession closes the previous stream
//! - Pause, resume and seek move the cursor as expected
//! - Full playback through the transport service

use ample_audio::{ClockBackend, ClockConfig};
use ample_core::{AudioBackend, BackendError, PlaybackPayload, Song, SongId};
use ample_playback::{PlaybackConfig, PlayerService, Transport, TransportState};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// 1000 frames per second, 100 frames per tick
fn config() -> ClockConfig {
    ClockConfig {
        tick_interval_ms: 100,
        sample_rate: 1_000,
    }
}

fn backend() -> ClockBackend {
    ClockBackend::new(
        [
            Song::new(SongId(1), "One Second", Duration::from_secs(1)),
            Song::new(SongId(2), "Ten Seconds", Duration::from_secs(10)),
            Song::new(SongId(3), "Half Second", Duration::from_millis(500)),
        ],
        config(),
    )
}

fn frames(payloads: &[PlaybackPayload]) -> Vec<u64> {
    payloads.iter().map(|p| p.progress_frames).collect()
}

#[tokio::test(start_paused = true)]
async fn test_reports_progress_until_finished() {
    let backend = backend();
    let mut events = backend.start_song(SongId(1)).await.unwrap();

    let mut payloads = Vec::new();
    while let Some(payload) = events.recv().await {
        payloads.push(payload);
    }

    assert_eq!(
        frames(&payloads),
        vec![100, 200, 300, 400, 500, 600, 700, 800, 900, 1_000]
    );
    assert!(payloads.iter().all(|p| p.total_frames == 1_000));
    assert_eq!(payloads.iter().filter(|p| p.is_finished).count(), 1);
    assert!(payloads.last().unwrap().is_finished);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_song_is_rejected() {
    let backend = backend();
    let result = backend.start_song(SongId(99)).await;
    assert_eq!(result.unwrap_err(), BackendError::UnknownSong(SongId(99)));
}

#[tokio::test(start_paused = true)]
async fn test_new_start_closes_previous_stream() {
    let backend = backend();
    let mut first = backend.start_song(SongId(2)).await.unwrap();
    assert_eq!(first.recv().await.unwrap().progress_frames, 100);

    let mut second = backend.start_song(SongId(1)).await.unwrap();

    assert!(first.recv().await.is_none());
    let payload = second.recv().await.unwrap();
    assert_eq!(payload.progress_frames, 100);
    assert_eq!(payload.total_frames, 1_000);
}

#[tokio::test(start_paused = true)]
async fn test_pause_holds_cursor_and_resume_continues() {
    let backend = backend();
    let mut events = backend.start_song(SongId(2)).await.unwrap();
    events.recv().await.unwrap();

    backend.pause_song().await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(events.try_recv().is_err());

    backend.resume_song().await.unwrap();
    assert_eq!(events.recv().await.unwrap().progress_frames, 200);
}

#[tokio::test(start_paused = true)]
async fn test_seek_moves_cursor_within_bounds() {
    let backend = backend();
    let mut events = backend.start_song(SongId(2)).await.unwrap();
    events.recv().await.unwrap();

    backend.seek_forward(Duration::from_millis(500)).await.unwrap();
    assert_eq!(events.recv().await.unwrap().progress_frames, 700);

    backend.seek_backward(Duration::from_secs(60)).await.unwrap();
    assert_eq!(events.recv().await.unwrap().progress_frames, 100);

    backend.seek_forward(Duration::from_secs(60)).await.unwrap();
    let payload = events.recv().await.unwrap();
    assert_eq!(payload.progress_frames, 10_000);
    assert!(payload.is_finished);
    assert!(events.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_controls_before_any_start_are_noops() {
    let backend = backend();
    backend.pause_song().await.unwrap();
    backend.resume_song().await.unwrap();
    backend.seek_forward(Duration::from_secs(1)).await.unwrap();
    backend.seek_backward(Duration::from_secs(1)).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_service_plays_queue_to_the_end() {
    let backend = Arc::new(backend());
    let songs: Vec<Song> = [3, 1]
        .into_iter()
        .filter_map(|id| backend.song(SongId(id)).cloned())
        .collect();

    let player = PlayerService::spawn(Transport::new(backend, PlaybackConfig::default()));
    let mut snapshots = player.watch();

    player.play(songs[0].clone(), Some(songs.clone())).await.unwrap();
    assert_eq!(player.snapshot().state, TransportState::Playing);

    let mut seen_second = false;
    loop {
        snapshots.changed().await.unwrap();
        let snapshot = snapshots.borrow_and_update().clone();
        if snapshot.current_index == Some(1) {
            seen_second = true;
        }
        if snapshot.current_index.is_none() {
            assert_eq!(snapshot.state, TransportState::Idle);
            break;
        }
    }

    assert!(seen_second);
}

#[tokio::test(start_paused = true)]
async fn test_idle_service_stays_quiet() {
    let backend = Arc::new(backend());
    let Some(song) = backend.song(SongId(2)).cloned() else {
        panic!("song 2 missing from catalog");
    };

    let player = PlayerService::spawn(Transport::new(backend, PlaybackConfig::default()));
    player.play(song, None).await.unwrap();
    player.toggle_play().await.unwrap();
    player.next().await.unwrap();

    let snapshot = player.snapshot();
    assert_eq!(snapshot.state, TransportState::Idle);
    assert_eq!(snapshot.current_index, None);

    let mut snapshots = player.watch();
    snapshots.borrow_and_update();
    let woke = timeout(Duration::from_secs(2), snapshots.changed()).await;
    assert!(woke.is_err(), "idle service republished its snapshot");
}

/// Song library for the shell
use ample_core::{Song, SongId};
use anyhow::{bail, Context};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// Load a JSON array of songs
///
/// ```json
/// [{ "id": 1, "title": "Intro", "artist": "Ample", "duration_secs": 95 }]
/// ```
pub fn load(path: &Path) -> anyhow::Result<Vec<Song>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read library {}", path.display()))?;
    parse(&contents).with_context(|| format!("Invalid library {}", path.display()))
}

/// Parse a JSON array of songs, rejecting duplicate ids
pub fn parse(contents: &str) -> anyhow::Result<Vec<Song>> {
    let songs: Vec<Song> = serde_json::from_str(contents)?;

    let mut seen = HashSet::new();
    for song in &songs {
        if !seen.insert(song.id) {
            bail!("duplicate song id {}", song.id);
        }
    }

    Ok(songs)
}

/// Small built-in library used when no file is given
pub fn demo() -> Vec<Song> {
    [
        (1, "Opening Credits", 42),
        (2, "Long Way Round", 187),
        (3, "Static", 64),
        (4, "Night Bus", 233),
        (5, "Closing Time", 95),
    ]
    .into_iter()
    .map(|(id, title, secs)| {
        Song::new(SongId(id), title, Duration::from_secs(secs)).with_artist("The Demo Tapes")
    })
    .collect()
}

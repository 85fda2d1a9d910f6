//! Queue store
//!
//! Owns the ordered song list and the pointer to the selected slot.
//! Every structural mutation recomputes the pointer so that it never
//! references a slot that no longer exists:
//!
//! ```text
//! Queue:    [S1] [S2] [S3] [S4]
//!                 ^
//! Current:        1
//! ```
//!
//! Out-of-range indices are treated as no-ops: they usually come from a
//! view that trails a concurrent mutation by one frame.

use crate::shuffle::{apply_order, shuffled_order};
use ample_core::{Song, SongId};
use rand::Rng;

/// Ordered song list plus the selected slot
#[derive(Debug, Clone, Default)]
pub struct Queue {
    /// Songs in play order (duplicates allowed)
    songs: Vec<Song>,

    /// Selected slot, `None` when nothing is selected
    current: Option<usize>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the queue contents
    ///
    /// With an anchor, the pointer moves to the anchor's first occurrence
    /// (slot 0 when absent). Without one nothing is selected. An empty
    /// list always leaves nothing selected.
    pub fn replace(&mut self, songs: Vec<Song>, anchor: Option<SongId>) -> Option<usize> {
        self.current = match anchor {
            _ if songs.is_empty() => None,
            Some(id) => Some(songs.iter().position(|s| s.id == id).unwrap_or(0)),
            None => None,
        };
        self.songs = songs;
        self.current
    }

    /// Append songs to the end; the pointer is unchanged
    pub fn append(&mut self, songs: impl IntoIterator<Item = Song>) -> Option<usize> {
        self.songs.extend(songs);
        self.current
    }

    /// Remove the song at `index`
    ///
    /// Returns the removed song, or `None` if `index` was out of range.
    /// Pointer rules:
    /// - removal before the pointer shifts it left (same song stays selected)
    /// - removal of the selected slot keeps the slot (now the following
    ///   song), falling back to the new last slot, or `None` if empty
    /// - removal after the pointer leaves it alone
    pub fn remove_at(&mut self, index: usize) -> Option<Song> {
        if index >= self.songs.len() {
            return None;
        }

        let removed = self.songs.remove(index);

        if let Some(current) = self.current {
            self.current = if index < current {
                Some(current - 1)
            } else if index == current {
                if self.songs.is_empty() {
                    None
                } else {
                    Some(index.min(self.songs.len() - 1))
                }
            } else {
                Some(current)
            };
        }

        Some(removed)
    }

    /// Move the song at `from` so that it ends up at `to`
    ///
    /// Splice semantics: remove at `from`, then insert at `to` in the
    /// shortened list. Invalid or equal indices are a no-op. The pointer
    /// follows its song.
    pub fn move_within(&mut self, from: usize, to: usize) -> Option<usize> {
        let len = self.songs.len();
        if from >= len || to >= len || from == to {
            return self.current;
        }

        let song = self.songs.remove(from);
        self.songs.insert(to, song);

        if let Some(current) = self.current {
            self.current = Some(if from == current {
                to
            } else if from < current && current <= to {
                current - 1
            } else if to <= current && current < from {
                current + 1
            } else {
                current
            });
        }

        self.current
    }

    /// Uniformly shuffle the queue using the thread-local rng
    pub fn shuffle(&mut self) -> Option<usize> {
        self.shuffle_with(&mut rand::thread_rng())
    }

    /// Uniformly shuffle the queue using the given rng
    ///
    /// The selected song (not the slot) stays selected at its new position.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        let order = shuffled_order(self.songs.len(), rng);
        let songs = std::mem::take(&mut self.songs);
        self.songs = apply_order(songs, &order);

        if let Some(current) = self.current {
            self.current = order.iter().position(|&old| old == current);
        }

        self.current
    }

    /// Remove every song and deselect
    pub fn clear(&mut self) {
        self.songs.clear();
        self.current = None;
    }

    /// Point at a slot directly ("jump to slot n")
    ///
    /// `None` deselects. An index past the end is ignored.
    pub fn set_current_index(&mut self, index: Option<usize>) -> Option<usize> {
        match index {
            Some(i) if i >= self.songs.len() => {}
            _ => self.current = index,
        }
        self.current
    }

    /// Selected slot
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Song in the selected slot
    pub fn current_song(&self) -> Option<&Song> {
        self.current.and_then(|i| self.songs.get(i))
    }

    /// First slot holding the given song
    pub fn position_of(&self, id: SongId) -> Option<usize> {
        self.songs.iter().position(|s| s.id == id)
    }

    /// Get song at index
    pub fn get(&self, index: usize) -> Option<&Song> {
        self.songs.get(index)
    }

    /// All songs in play order
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Total number of songs in queue
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

//! Player state snapshot
//!
//! The state is owned by [`PlayerController`](crate::PlayerController) and
//! handed out read-only. `has_next` and `has_previous` are computed on
//! every read and never stored.

use crate::types::Episode;
use serde::{Deserialize, Serialize};

/// Playlist position and playback flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Loaded episodes, in traversal order
    pub playlist: Vec<Episode>,

    /// Offset into `playlist`; 0 when the playlist is empty
    pub current_index: usize,

    /// Playback is active
    pub is_playing: bool,

    /// Current episode repeats at its end
    pub is_looping: bool,

    /// `play_next` picks a random episode
    pub is_shuffling: bool,
}

impl PlayerState {
    /// Whether `play_next` can move
    ///
    /// Always true while shuffling, even on an empty playlist.
    pub fn has_next(&self) -> bool {
        self.is_shuffling || self.current_index + 1 < self.playlist.len()
    }

    /// Whether `play_previous` can move
    pub fn has_previous(&self) -> bool {
        self.current_index > 0
    }

    /// Episode at `current_index`, if any
    pub fn current_episode(&self) -> Option<&Episode> {
        self.playlist.get(self.current_index)
    }

    /// Check if the playlist is empty
    pub fn is_empty(&self) -> bool {
        self.playlist.is_empty()
    }
}

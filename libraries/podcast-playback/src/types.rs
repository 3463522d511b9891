//! Core types for the playback controller

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single playable podcast episode
///
/// Supplied by the catalog pages and never modified by the controller.
/// Field names on the wire match the ones the web client sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Episode title
    pub title: String,

    /// Hosts and guests, as a display string
    pub members: String,

    /// Artwork URI
    pub thumbnail: String,

    /// Length in seconds
    #[serde(rename = "duration")]
    pub duration_secs: u64,

    /// Audio file URL handed to the media renderer
    pub url: String,
}

impl Episode {
    /// Episode length as a [`Duration`]
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

/// How `play_next` behaves while shuffle is on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShuffleAdvance {
    /// Jump to a uniformly random episode
    #[default]
    Random,

    /// Pick a random episode, then take the sequential step from the
    /// episode that was current before the pick whenever one exists.
    ///
    /// Matches the behavior of the first web release, where the random
    /// pick only survived on the last episode.
    RandomThenStep,
}

/// Configuration for the player controller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Shuffle advance policy (default: Random)
    pub shuffle_advance: ShuffleAdvance,

    /// Loop mode on startup (default: false)
    pub start_looping: bool,

    /// Shuffle mode on startup (default: false)
    pub start_shuffling: bool,
}

//! Media renderer seam
//!
//! The controller never decodes audio. Whatever element actually plays the
//! episode (an HTML audio element, a desktop audio backend) implements
//! [`MediaRenderer`] and receives a [`MediaCue`] describing what it should
//! be doing.

use crate::state::PlayerState;

/// What the renderer should play, and how
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCue {
    /// Audio URL of the current episode
    pub url: String,

    /// Renderer should be producing sound
    pub is_playing: bool,

    /// Renderer should restart the episode at its end
    pub is_looping: bool,
}

impl MediaCue {
    /// Cue for the current episode
    ///
    /// Returns `None` when nothing is loaded.
    pub fn from_state(state: &PlayerState) -> Option<Self> {
        state.current_episode().map(|episode| Self {
            url: episode.url.clone(),
            is_playing: state.is_playing,
            is_looping: state.is_looping,
        })
    }
}

/// Platform media renderer
///
/// Implementors report natural end of an episode back through
/// [`PlayerController::episode_ended`](crate::PlayerController::episode_ended).
pub trait MediaRenderer {
    /// Apply a cue
    ///
    /// Called with the same URL repeatedly as flags change; implementors
    /// should only reload the source when the URL differs.
    fn load(&mut self, cue: &MediaCue);

    /// Nothing to play; release the current source
    fn stop(&mut self);
}

/// Renderer that records every call, for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub cues: Vec<MediaCue>,
    pub stops: usize,
}

#[cfg(test)]
impl MediaRenderer for RecordingRenderer {
    fn load(&mut self, cue: &MediaCue) {
        self.cues.push(cue.clone());
    }

    fn stop(&mut self) {
        self.stops += 1;
    }
}

//! Player Events
//!
//! Change notification for UI components reading the player.
//! Two channels are offered:
//! - Subscribers: callbacks receiving the full state after every command
//!   that changed it
//! - Events: a buffer of what changed, drained by the consumer

use crate::state::PlayerState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Events emitted by the player controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Playlist replaced (play single, play list) or emptied (clear)
    PlaylistChanged {
        /// New playlist length
        length: usize,
        /// Index selected in the new playlist
        index: usize,
    },

    /// Selected episode changed within the same playlist
    EpisodeChanged {
        /// Index of the new (current) episode
        index: usize,
        /// Index before the change
        previous_index: usize,
    },

    /// Playing flag changed
    PlayingChanged { is_playing: bool },

    /// Loop flag changed
    LoopingChanged { is_looping: bool },

    /// Shuffle flag changed
    ShufflingChanged { is_shuffling: bool },
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback invoked with the post-command state
pub type StateCallback = Box<dyn FnMut(&PlayerState)>;

/// Registered state subscribers, notified in registration order
#[derive(Default)]
pub struct Subscribers {
    callbacks: Vec<(SubscriptionId, StateCallback)>,
    next_id: u64,
}

impl Subscribers {
    /// Create an empty subscriber list
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback
    pub fn add(&mut self, callback: StateCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, callback));
        id
    }

    /// Remove a callback
    ///
    /// Returns false if the id was not registered.
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    /// Send a snapshot to every subscriber
    pub fn notify(&mut self, state: &PlayerState) {
        for (_, callback) in &mut self.callbacks {
            callback(state);
        }
    }

    /// Number of registered subscribers
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Check if no subscriber is registered
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.callbacks.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

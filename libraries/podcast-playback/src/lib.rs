//! Podcast Player - Playback Controller
//!
//! Shared player state for the Podcast Player UI.
//!
//! This crate provides:
//! - Playlist loading (single episode or list with a start index)
//! - Next/previous navigation with derived `has_next`/`has_previous`
//! - Play/pause, loop and shuffle flags
//! - Two shuffle advance policies
//! - Change notification (state subscribers + drainable events)
//! - A seam for the media renderer that actually plays audio
//!
//! # Architecture
//!
//! `podcast-playback` holds no global state and does no I/O during
//! commands. The application creates one [`PlayerController`] and passes it
//! to the components that read or command it. Audio output is provided by
//! implementing [`MediaRenderer`].
//!
//! # Example: Playing a List
//!
//! ```rust
//! use podcast_playback::{Episode, PlayerConfig, PlayerController};
//!
//! let episode = |n: u64| Episode {
//!     title: format!("Episode {}", n),
//!     members: "Diego Fernandes".to_string(),
//!     thumbnail: format!("https://example.com/{}.jpg", n),
//!     duration_secs: 3600,
//!     url: format!("https://example.com/{}.mp3", n),
//! };
//!
//! let mut player = PlayerController::new(PlayerConfig::default());
//! player.play_list(vec![episode(1), episode(2), episode(3)], 0)?;
//!
//! player.play_next();
//! assert_eq!(player.current_index(), 1);
//! assert!(player.has_previous());
//!
//! // Out-of-range start index is rejected
//! assert!(player.play_list(vec![episode(4)], 5).is_err());
//! # Ok::<(), podcast_playback::PlayerError>(())
//! ```
//!
//! # Example: Observing Changes
//!
//! ```rust
//! use podcast_playback::{PlayerController, PlayerEvent, PlayerState};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let mut player = PlayerController::default();
//!
//! let playing = Rc::new(Cell::new(false));
//! let seen = Rc::clone(&playing);
//! player.subscribe(move |state: &PlayerState| seen.set(state.is_playing));
//!
//! player.toggle_play();
//! assert!(playing.get());
//! assert_eq!(
//!     player.drain_events(),
//!     vec![PlayerEvent::PlayingChanged { is_playing: true }]
//! );
//! ```

mod config;
mod controller;
mod error;
pub mod events;
mod media;
mod shuffle;
mod state;
pub mod types;

// Public exports
pub use controller::PlayerController;
pub use error::{PlayerError, Result};
pub use events::{PlayerEvent, SubscriptionId};
pub use media::{MediaCue, MediaRenderer};
pub use state::PlayerState;
pub use types::{Episode, PlayerConfig, ShuffleAdvance};

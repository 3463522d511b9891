//! Player controller
//!
//! Owns the [`PlayerState`] and is the only way to change it. Every command
//! that changes the state records what changed as [`PlayerEvent`]s and then
//! hands the complete new state to each subscriber, so readers never see a
//! half-applied command.

use crate::error::{PlayerError, Result};
use crate::events::{PlayerEvent, SubscriptionId, Subscribers};
use crate::media::{MediaCue, MediaRenderer};
use crate::shuffle::{random_other_index, shuffled_next_index};
use crate::state::PlayerState;
use crate::types::{Episode, PlayerConfig, ShuffleAdvance};
use rand::RngCore;
use std::fmt;
use tracing::{debug, warn};

/// Playlist and playback-mode controller
///
/// Create one per UI session and pass it by reference to the components
/// that need it.
pub struct PlayerController {
    config: PlayerConfig,
    state: PlayerState,

    // Shuffle randomness (thread RNG unless injected)
    rng: Box<dyn RngCore>,

    subscribers: Subscribers,
    pending_events: Vec<PlayerEvent>,
}

impl PlayerController {
    /// Create a new controller with an empty playlist
    pub fn new(config: PlayerConfig) -> Self {
        Self::with_rng(config, rand::thread_rng())
    }

    /// Create a controller drawing shuffle picks from `rng`
    ///
    /// Used to make shuffle deterministic (seeded RNG in tests).
    pub fn with_rng(config: PlayerConfig, rng: impl RngCore + 'static) -> Self {
        let state = PlayerState {
            is_looping: config.start_looping,
            is_shuffling: config.start_shuffling,
            ..PlayerState::default()
        };

        Self {
            config,
            state,
            rng: Box::new(rng),
            subscribers: Subscribers::new(),
            pending_events: Vec::new(),
        }
    }

    // ===== Playlist Loading =====

    /// Play a single episode
    ///
    /// Replaces the playlist with just this episode.
    pub fn play_single(&mut self, episode: Episode) {
        debug!(title = %episode.title, "Playing single episode");

        self.state.playlist = vec![episode];
        self.state.current_index = 0;
        self.emit(PlayerEvent::PlaylistChanged {
            length: 1,
            index: 0,
        });
        self.update_playing(true);

        self.notify();
    }

    /// Play a list of episodes starting at `index`
    ///
    /// An empty list is accepted with index 0. Any other index that does not
    /// address an episode of `episodes` is rejected and the state is left
    /// untouched.
    pub fn play_list(&mut self, episodes: Vec<Episode>, index: usize) -> Result<()> {
        let len = episodes.len();
        let valid = index < len || (len == 0 && index == 0);
        if !valid {
            warn!(index, len, "Rejected playlist with out-of-range index");
            return Err(PlayerError::InvalidIndex { index, len });
        }

        debug!(len, index, "Playing episode list");

        self.state.playlist = episodes;
        self.state.current_index = index;
        self.emit(PlayerEvent::PlaylistChanged { length: len, index });
        self.update_playing(true);

        self.notify();
        Ok(())
    }

    /// Jump to an episode of the current playlist and play it
    pub fn play_index(&mut self, index: usize) -> Result<()> {
        let len = self.state.playlist.len();
        if index >= len {
            warn!(index, len, "Rejected out-of-range episode selection");
            return Err(PlayerError::InvalidIndex { index, len });
        }

        let moved = self.select(index);
        let resumed = self.update_playing(true);
        if moved || resumed {
            self.notify();
        }
        Ok(())
    }

    /// Empty the playlist
    ///
    /// Playing, loop and shuffle flags are kept. Clearing an empty playlist
    /// publishes nothing.
    pub fn clear(&mut self) {
        if self.state.is_empty() && self.state.current_index == 0 {
            debug!("Playlist already empty");
            return;
        }

        debug!("Clearing playlist");

        self.state.playlist.clear();
        self.state.current_index = 0;
        self.emit(PlayerEvent::PlaylistChanged {
            length: 0,
            index: 0,
        });

        self.notify();
    }

    // ===== Navigation =====

    /// Advance to the next episode
    ///
    /// While shuffling, the target comes from the configured
    /// [`ShuffleAdvance`](crate::ShuffleAdvance) policy. Otherwise moves one
    /// step forward if there is a next episode. Does not wrap and does not
    /// change the playing flag. No-op on an empty playlist.
    pub fn play_next(&mut self) {
        let len = self.state.playlist.len();
        let current = self.state.current_index;

        let target = if self.state.is_shuffling {
            shuffled_next_index(
                &mut *self.rng,
                self.config.shuffle_advance,
                current,
                len,
            )
        } else if self.state.has_next() {
            Some(current + 1)
        } else {
            None
        };

        let Some(target) = target else {
            debug!(current, len, "No next episode");
            return;
        };

        debug!(
            from = current,
            to = target,
            shuffling = self.state.is_shuffling,
            "Next episode"
        );
        if self.select(target) {
            self.notify();
        }
    }

    /// Go back to the previous episode
    ///
    /// No-op on the first episode or an empty playlist.
    pub fn play_previous(&mut self) {
        if !self.state.has_previous() {
            debug!("No previous episode");
            return;
        }

        let target = self.state.current_index - 1;
        debug!(to = target, "Previous episode");
        if self.select(target) {
            self.notify();
        }
    }

    // ===== Playback Flags =====

    /// Pause or resume
    pub fn toggle_play(&mut self) {
        self.set_playing_state(!self.state.is_playing);
    }

    /// Set the playing flag exactly
    ///
    /// Used by the media renderer to report playback starting or ending on
    /// its own, as opposed to the user toggling it.
    pub fn set_playing_state(&mut self, playing: bool) {
        if self.update_playing(playing) {
            self.notify();
        }
    }

    /// Turn loop mode on or off
    pub fn toggle_loop(&mut self) {
        self.set_looping(!self.state.is_looping);
    }

    /// Set loop mode exactly
    pub fn set_looping(&mut self, looping: bool) {
        if self.state.is_looping == looping {
            return;
        }

        debug!(looping, "Loop mode changed");
        self.state.is_looping = looping;
        self.emit(PlayerEvent::LoopingChanged {
            is_looping: looping,
        });
        self.notify();
    }

    /// Turn shuffle mode on or off
    pub fn toggle_shuffle(&mut self) {
        self.set_shuffling(!self.state.is_shuffling);
    }

    /// Set shuffle mode exactly
    pub fn set_shuffling(&mut self, shuffling: bool) {
        if self.state.is_shuffling == shuffling {
            return;
        }

        debug!(shuffling, "Shuffle mode changed");
        self.state.is_shuffling = shuffling;
        self.emit(PlayerEvent::ShufflingChanged {
            is_shuffling: shuffling,
        });
        self.notify();
    }

    // ===== Media Renderer =====

    /// Handle natural end of the current episode
    ///
    /// Looping episodes are restarted by the renderer itself, so nothing
    /// changes. While shuffling with the `Random` policy a different episode
    /// is drawn. Otherwise the next episode is selected when there is one.
    /// Playback stops whenever the selection could not move.
    pub fn episode_ended(&mut self) {
        if self.state.is_looping {
            debug!("Episode ended while looping");
            return;
        }

        let len = self.state.playlist.len();
        let current = self.state.current_index;

        if self.state.is_shuffling && self.config.shuffle_advance == ShuffleAdvance::Random {
            if let Some(target) = random_other_index(&mut *self.rng, current, len) {
                debug!(from = current, to = target, "Shuffled to next episode");
                self.select(target);
                self.notify();
            }
        } else if self.state.has_next() && len > 0 {
            self.play_next();
        }

        // Nothing else to play
        if self.state.current_index == current {
            debug!("Reached end of playlist");
            self.set_playing_state(false);
        }
    }

    /// Push the current cue to a renderer
    pub fn sync_renderer(&self, renderer: &mut dyn MediaRenderer) {
        match MediaCue::from_state(&self.state) {
            Some(cue) => renderer.load(&cue),
            None => renderer.stop(),
        }
    }

    // ===== State Queries =====

    /// Current state
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Owned copy of the current state
    pub fn snapshot(&self) -> PlayerState {
        self.state.clone()
    }

    pub fn playlist(&self) -> &[Episode] {
        &self.state.playlist
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn current_episode(&self) -> Option<&Episode> {
        self.state.current_episode()
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn is_looping(&self) -> bool {
        self.state.is_looping
    }

    pub fn is_shuffling(&self) -> bool {
        self.state.is_shuffling
    }

    /// Check if there is a next episode
    pub fn has_next(&self) -> bool {
        self.state.has_next()
    }

    /// Check if there is a previous episode
    pub fn has_previous(&self) -> bool {
        self.state.has_previous()
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    // ===== Subscriptions & Events =====

    /// Register a callback receiving the state after every change
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&PlayerState) + 'static,
    ) -> SubscriptionId {
        self.subscribers.add(Box::new(callback))
    }

    /// Remove a subscription
    ///
    /// Returns false if it was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Drain all pending events
    ///
    /// Returns every event recorded since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internal =====

    /// Move to `index` within the current playlist
    ///
    /// Returns true if the index changed.
    fn select(&mut self, index: usize) -> bool {
        let previous_index = self.state.current_index;
        if previous_index == index {
            return false;
        }

        self.state.current_index = index;
        self.emit(PlayerEvent::EpisodeChanged {
            index,
            previous_index,
        });
        true
    }

    /// Set the playing flag without notifying
    ///
    /// Returns true if it changed.
    fn update_playing(&mut self, playing: bool) -> bool {
        if self.state.is_playing == playing {
            return false;
        }

        debug!(playing, "Playing state changed");
        self.state.is_playing = playing;
        self.emit(PlayerEvent::PlayingChanged {
            is_playing: playing,
        });
        true
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.pending_events.push(event);
    }

    fn notify(&mut self) {
        self.subscribers.notify(&self.state);
    }
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(PlayerConfig::default())
    }
}

impl fmt::Debug for PlayerController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerController")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("subscribers", &self.subscribers)
            .field("pending_events", &self.pending_events)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::RecordingRenderer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn create_test_episode(n: usize) -> Episode {
        Episode {
            title: format!("Episode {}", n),
            members: "Diego, Richard".to_string(),
            thumbnail: format!("https://example.com/{}.jpg", n),
            duration_secs: 1800,
            url: format!("https://example.com/{}.mp3", n),
        }
    }

    fn episodes(count: usize) -> Vec<Episode> {
        (0..count).map(create_test_episode).collect()
    }

    fn seeded(config: PlayerConfig) -> PlayerController {
        PlayerController::with_rng(config, StdRng::seed_from_u64(42))
    }

    #[test]
    fn create_player_controller() {
        let player = PlayerController::default();
        assert!(player.playlist().is_empty());
        assert_eq!(player.current_index(), 0);
        assert!(!player.is_playing());
        assert!(!player.is_looping());
        assert!(!player.is_shuffling());
        assert!(!player.has_pending_events());
    }

    #[test]
    fn config_sets_initial_modes() {
        let player = PlayerController::new(PlayerConfig {
            start_looping: true,
            start_shuffling: true,
            ..PlayerConfig::default()
        });
        assert!(player.is_looping());
        assert!(player.is_shuffling());
        assert!(player.playlist().is_empty());
    }

    #[test]
    fn play_single_replaces_playlist() {
        let mut player = PlayerController::default();
        player.play_list(episodes(4), 3).unwrap();
        player.drain_events();

        player.play_single(create_test_episode(9));

        assert_eq!(player.playlist(), &[create_test_episode(9)]);
        assert_eq!(player.current_index(), 0);
        assert!(player.is_playing());
        assert_eq!(
            player.drain_events(),
            vec![PlayerEvent::PlaylistChanged {
                length: 1,
                index: 0
            }]
        );
    }

    #[test]
    fn play_list_rejects_out_of_range_index() {
        let mut player = PlayerController::default();
        player.play_list(episodes(2), 1).unwrap();
        player.drain_events();

        let err = player.play_list(episodes(3), 3).unwrap_err();
        assert!(matches!(err, PlayerError::InvalidIndex { index: 3, len: 3 }));

        assert_eq!(player.playlist().len(), 2);
        assert_eq!(player.current_index(), 1);
        assert!(!player.has_pending_events());
    }

    #[test]
    fn play_list_accepts_empty_with_zero() {
        let mut player = PlayerController::default();
        player.play_list(Vec::new(), 0).unwrap();

        assert!(player.playlist().is_empty());
        assert!(player.is_playing());

        assert!(player.play_list(Vec::new(), 1).is_err());
    }

    #[test]
    fn play_index_selects_and_resumes() {
        let mut player = PlayerController::default();
        player.play_list(episodes(3), 0).unwrap();
        player.set_playing_state(false);
        player.drain_events();

        player.play_index(2).unwrap();
        assert_eq!(player.current_index(), 2);
        assert!(player.is_playing());
        assert_eq!(
            player.drain_events(),
            vec![
                PlayerEvent::EpisodeChanged {
                    index: 2,
                    previous_index: 0
                },
                PlayerEvent::PlayingChanged { is_playing: true },
            ]
        );

        assert!(player.play_index(3).is_err());
        assert_eq!(player.current_index(), 2);
    }

    #[test]
    fn sequential_next_stops_at_end() {
        let mut player = PlayerController::default();
        player.play_list(episodes(3), 0).unwrap();

        let mut seen = Vec::new();
        for _ in 0..3 {
            player.play_next();
            seen.push(player.current_index());
        }

        assert_eq!(seen, vec![1, 2, 2]);
        assert!(player.is_playing(), "end of list does not stop playback");
    }

    #[test]
    fn previous_stops_at_start() {
        let mut player = PlayerController::default();
        player.play_list(episodes(3), 2).unwrap();

        let mut seen = Vec::new();
        for _ in 0..3 {
            player.play_previous();
            seen.push(player.current_index());
        }

        assert_eq!(seen, vec![1, 0, 0]);
    }

    #[test]
    fn navigation_on_empty_playlist_is_noop() {
        let mut player = PlayerController::default();
        player.play_list(Vec::new(), 0).unwrap();
        player.drain_events();

        player.play_next();
        player.play_previous();
        player.toggle_shuffle();
        player.drain_events();
        player.play_next();

        assert_eq!(player.current_index(), 0);
        assert!(!player.has_pending_events());
    }

    #[test]
    fn shuffle_random_stays_in_range() {
        let mut player = seeded(PlayerConfig::default());
        player.play_list(episodes(5), 0).unwrap();
        player.toggle_shuffle();

        for _ in 0..200 {
            player.play_next();
            assert!(player.current_index() < 5);
        }
    }

    #[test]
    fn shuffle_random_reaches_earlier_episodes() {
        let mut player = seeded(PlayerConfig::default());
        player.play_list(episodes(5), 4).unwrap();
        player.toggle_shuffle();

        let mut went_back = false;
        for _ in 0..100 {
            player.play_next();
            if player.current_index() < 4 {
                went_back = true;
            }
        }
        assert!(went_back);
    }

    #[test]
    fn shuffle_random_then_step_steps_forward() {
        let mut player = seeded(PlayerConfig {
            shuffle_advance: ShuffleAdvance::RandomThenStep,
            ..PlayerConfig::default()
        });
        player.play_list(episodes(4), 0).unwrap();
        player.toggle_shuffle();

        player.play_next();
        assert_eq!(player.current_index(), 1);
        player.play_next();
        assert_eq!(player.current_index(), 2);
        player.play_next();
        assert_eq!(player.current_index(), 3);

        // On the last episode the random pick stands
        player.play_next();
        assert!(player.current_index() < 4);
    }

    #[test]
    fn toggles_are_involutions() {
        let mut player = PlayerController::default();

        player.toggle_play();
        player.toggle_play();
        player.toggle_loop();
        player.toggle_loop();
        player.toggle_shuffle();
        player.toggle_shuffle();

        assert!(!player.is_playing());
        assert!(!player.is_looping());
        assert!(!player.is_shuffling());
    }

    #[test]
    fn set_playing_state_is_idempotent() {
        let mut player = PlayerController::default();
        player.set_playing_state(true);
        player.set_playing_state(true);

        assert!(player.is_playing());
        assert_eq!(
            player.drain_events(),
            vec![PlayerEvent::PlayingChanged { is_playing: true }]
        );
    }

    #[test]
    fn clear_keeps_flags() {
        let mut player = PlayerController::default();
        player.play_list(episodes(3), 2).unwrap();
        player.toggle_loop();
        player.toggle_shuffle();

        player.clear();

        assert!(player.playlist().is_empty());
        assert_eq!(player.current_index(), 0);
        assert!(player.is_playing());
        assert!(player.is_looping());
        assert!(player.is_shuffling());
    }

    #[test]
    fn subscribers_see_complete_state_once_per_command() {
        let mut player = PlayerController::default();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = Rc::clone(&seen);
        player.subscribe(move |state: &PlayerState| log.borrow_mut().push(state.clone()));

        player.play_list(episodes(2), 1).unwrap();
        player.play_next(); // no-op at the end
        player.play_previous();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].playlist.len(), 2);
        assert_eq!(seen[0].current_index, 1);
        assert!(seen[0].is_playing);
        assert_eq!(seen[1], *player.state());
    }

    #[test]
    fn unsubscribe_stops_updates() {
        let mut player = PlayerController::default();
        let count = Rc::new(RefCell::new(0));

        let counter = Rc::clone(&count);
        let id = player.subscribe(move |_: &PlayerState| *counter.borrow_mut() += 1);
        assert_eq!(player.subscriber_count(), 1);

        player.toggle_play();
        assert!(player.unsubscribe(id));
        player.toggle_play();

        assert_eq!(*count.borrow(), 1);
        assert_eq!(player.subscriber_count(), 0);
    }

    #[test]
    fn episode_ended_advances_then_stops() {
        let mut player = PlayerController::default();
        player.play_list(episodes(2), 0).unwrap();

        player.episode_ended();
        assert_eq!(player.current_index(), 1);
        assert!(player.is_playing());

        player.episode_ended();
        assert_eq!(player.current_index(), 1);
        assert!(!player.is_playing());
    }

    #[test]
    fn episode_ended_while_looping_changes_nothing() {
        let mut player = PlayerController::default();
        player.play_list(episodes(2), 0).unwrap();
        player.toggle_loop();
        player.drain_events();

        player.episode_ended();

        assert_eq!(player.current_index(), 0);
        assert!(player.is_playing());
        assert!(!player.has_pending_events());
    }

    #[test]
    fn episode_ended_on_empty_shuffled_playlist_stops() {
        let mut player = PlayerController::default();
        player.play_list(Vec::new(), 0).unwrap();
        player.toggle_shuffle();

        player.episode_ended();
        assert!(!player.is_playing());
    }

    #[test]
    fn episode_ended_single_shuffled_episode_stops() {
        let mut player = seeded(PlayerConfig::default());
        player.play_single(create_test_episode(1));
        player.toggle_shuffle();
        player.drain_events();

        player.episode_ended();

        assert_eq!(player.current_index(), 0);
        assert!(!player.is_playing());
        assert_eq!(
            player.drain_events(),
            vec![PlayerEvent::PlayingChanged { is_playing: false }]
        );
    }

    #[test]
    fn episode_ended_while_shuffling_always_moves() {
        for seed in 0..200 {
            let mut player =
                PlayerController::with_rng(PlayerConfig::default(), StdRng::seed_from_u64(seed));
            player.play_list(episodes(3), 1).unwrap();
            player.toggle_shuffle();
            player.drain_events();

            player.episode_ended();

            assert_ne!(player.current_index(), 1, "seed {}", seed);
            assert!(player.current_index() < 3);
            assert!(player.is_playing());
            assert!(matches!(
                player.drain_events().as_slice(),
                [PlayerEvent::EpisodeChanged {
                    previous_index: 1,
                    ..
                }]
            ));
        }
    }

    #[test]
    fn episode_ended_random_then_step_stops_when_pick_stays() {
        let config = PlayerConfig {
            shuffle_advance: ShuffleAdvance::RandomThenStep,
            ..PlayerConfig::default()
        };
        let mut player = PlayerController::with_rng(config, StdRng::seed_from_u64(9));
        player.play_single(create_test_episode(1));
        player.toggle_shuffle();

        player.episode_ended();

        assert_eq!(player.current_index(), 0);
        assert!(!player.is_playing());
    }

    #[test]
    fn clear_on_empty_playlist_publishes_nothing() {
        let mut player = PlayerController::default();
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        player.subscribe(move |_: &PlayerState| *counter.borrow_mut() += 1);

        player.clear();

        assert_eq!(*count.borrow(), 0);
        assert!(!player.has_pending_events());

        player.play_single(create_test_episode(1));
        player.clear();
        player.clear();
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn sync_renderer_loads_or_stops() {
        let mut player = PlayerController::default();
        let mut renderer = RecordingRenderer::default();

        player.sync_renderer(&mut renderer);
        assert_eq!(renderer.stops, 1);
        assert!(renderer.cues.is_empty());

        player.play_single(create_test_episode(1));
        player.sync_renderer(&mut renderer);

        assert_eq!(
            renderer.cues,
            vec![MediaCue {
                url: "https://example.com/1.mp3".to_string(),
                is_playing: true,
                is_looping: false,
            }]
        );
    }
}

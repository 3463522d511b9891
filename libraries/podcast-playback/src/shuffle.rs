//! Random episode selection for shuffle mode

use crate::types::ShuffleAdvance;
use rand::{Rng, RngCore};

/// Uniformly random index in `[0, len)`
///
/// Returns `None` for an empty playlist.
pub fn random_index(rng: &mut dyn RngCore, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(rng.gen_range(0..len))
}

/// Uniformly random index in `[0, len)` other than `current`
///
/// Returns `None` when there is no other episode to pick.
pub fn random_other_index(rng: &mut dyn RngCore, current: usize, len: usize) -> Option<usize> {
    if len < 2 || current >= len {
        return None;
    }
    let picked = rng.gen_range(0..len - 1);
    Some(if picked >= current { picked + 1 } else { picked })
}

/// Index `play_next` moves to while shuffling
///
/// `current` is the index before the move. Returns `None` for an empty
/// playlist.
pub fn shuffled_next_index(
    rng: &mut dyn RngCore,
    advance: ShuffleAdvance,
    current: usize,
    len: usize,
) -> Option<usize> {
    let picked = random_index(rng, len)?;

    match advance {
        ShuffleAdvance::Random => Some(picked),
        ShuffleAdvance::RandomThenStep => {
            // The sequential step overrides the pick unless it would run
            // past the end
            if current + 1 < len {
                Some(current + 1)
            } else {
                Some(picked)
            }
        }
    }
}

//! Deterministic dice generation.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed and same sequence of roll requests produce
//!   identical dice
//! - **Per game**: Every engine owns its generator; there is no process-wide RNG
//! - **Context streams**: Independent sequences for derived values (game ids)
//! - **Serializable**: O(1) state capture and restore
//!
//! ```
//! use liars_dice::core::{FaceRange, GameRng};
//!
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//! assert_eq!(a.roll_dice(5, FaceRange::SIX_SIDED), b.roll_dice(5, FaceRange::SIX_SIDED));
//! ```

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::bid::{Dice, Face};
use super::config::FaceRange;

/// Deterministic RNG backing one engine instance.
///
/// Uses ChaCha8, whose stream is stable for a given seed across platforms.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG from a freshly drawn entropy seed.
    ///
    /// The drawn seed is still available through [`GameRng::seed`].
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The seed this generator was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Create an independent stream for a named purpose.
    ///
    /// The same context always yields the same stream for the same seed,
    /// and drawing from it never disturbs the dice stream.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Roll a single die within `faces`.
    pub fn roll_die(&mut self, faces: FaceRange) -> Face {
        self.inner.gen_range(faces.min()..=faces.max())
    }

    /// Roll `count` dice within `faces`, in order.
    pub fn roll_dice(&mut self, count: u8, faces: FaceRange) -> Dice {
        (0..count).map(|_| self.roll_die(faces)).collect()
    }

    /// Random index below `len`. Panics if `len == 0`.
    pub fn gen_index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG checkpoint.
///
/// Uses the ChaCha8 word position, so capture cost is independent of how
/// many dice have been rolled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

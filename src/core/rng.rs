//! Seeded randomness.
//!
//! The engine draws randomness exactly once, when the tile bag is shuffled
//! at setup. Everything after that is a pure function of the snapshot and
//! the submitted actions. Simulated players take their own named stream so
//! their choices never disturb the bag order.
//!
//! ```
//! use rust_tiles::core::GameRng;
//!
//! let mut bag = GameRng::new(42).for_context("tile-bag");
//! let mut again = GameRng::new(42).for_context("tile-bag");
//!
//! let mut a: Vec<u32> = (0..20).collect();
//! let mut b = a.clone();
//! bag.shuffle(&mut a);
//! again.shuffle(&mut b);
//! assert_eq!(a, b);
//! ```

use std::hash::{Hash, Hasher};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHasher;

/// A ChaCha8 stream derived from a game seed.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed), seed }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// An independent stream named `context`, fixed by this stream's seed.
    ///
    /// `FxHasher` output does not depend on the process or toolchain, so a
    /// recorded seed replays the same bag on any build.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = FxHasher::default();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }

    /// A uniformly chosen element, `None` for an empty slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.inner)
    }
}

//! Deterministic sampling source for agent generation.
//!
//! All randomized choices in the pipeline (agent endpoint selection,
//! departure minutes) flow through a single `SimRng`, so a run is fully
//! reproducible from its seed: same seed and identical inputs produce
//! identical agent lists.  Tests always construct one with a fixed seed.

use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Run-level RNG wrapping a seeded `SmallRng`.
///
/// The pipeline is single-threaded, so one instance is threaded through the
/// sampling stage by mutable reference.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        use rand::Rng;
        self.0.gen_range(range)
    }

    /// Choose a random element from a slice, uniformly.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}

use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random source for item placement
///
/// Wraps a seedable PRNG and remembers the seed it was built from, so a
/// session can be replayed exactly (`--seed` on the command line, or a
/// failing test's log line).
pub struct GameRng {
    rng: StdRng,
    seed: u64,
}

impl GameRng {
    /// Create a generator from a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a generator with a seed drawn from OS entropy
    pub fn from_entropy() -> Self {
        Self::seeded(rand::thread_rng().gen())
    }

    /// The seed this generator was built from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sample a value uniformly from a range
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.rng.gen_range(range)
    }
}

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::chat::prompts::FOLLOW_UP_FALLBACKS;

/// Chooses canned follow-ups. The randomness source is injected so tests
/// and reproducible runs can seed it.
pub struct FallbackPicker {
    rng: Box<dyn RngCore + Send>,
}

impl FallbackPicker {
    pub fn new(rng: Box<dyn RngCore + Send>) -> Self {
        Self { rng }
    }

    pub fn from_entropy() -> Self {
        Self::new(Box::new(StdRng::from_entropy()))
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Box::new(StdRng::seed_from_u64(seed)))
    }

    /// One of the four fixed follow-up prompts.
    pub fn follow_up(&mut self) -> &'static str {
        FOLLOW_UP_FALLBACKS[self.rng.gen_range(0..FOLLOW_UP_FALLBACKS.len())]
    }
}

impl Default for FallbackPicker {
    fn default() -> Self {
        Self::from_entropy()
    }
}

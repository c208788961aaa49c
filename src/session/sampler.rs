use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::session::error::SessionError;

/// Draw `count` words uniformly from `vocabulary`, with replacement.
pub fn sample<R: Rng + ?Sized>(
    rng: &mut R,
    vocabulary: &[String],
    count: usize,
) -> Result<Vec<String>, SessionError> {
    if vocabulary.is_empty() {
        return Err(SessionError::InvalidArgument("vocabulary is empty"));
    }
    if count == 0 {
        return Err(SessionError::InvalidArgument("word count must be positive"));
    }

    Ok((0..count)
        .map(|_| vocabulary[rng.gen_range(0..vocabulary.len())].clone())
        .collect())
}

/// A validated vocabulary paired with its own RNG, so every reset draws a new sequence.
pub struct WordSampler {
    vocabulary: Vec<String>,
    rng: SmallRng,
}

impl WordSampler {
    pub fn new(vocabulary: Vec<String>) -> Result<Self, SessionError> {
        Self::with_rng(vocabulary, SmallRng::from_entropy())
    }

    pub fn seeded(vocabulary: Vec<String>, seed: u64) -> Result<Self, SessionError> {
        Self::with_rng(vocabulary, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(vocabulary: Vec<String>, rng: SmallRng) -> Result<Self, SessionError> {
        if vocabulary.is_empty() {
            return Err(SessionError::InvalidArgument("vocabulary is empty"));
        }
        Ok(Self { vocabulary, rng })
    }

    pub fn sample(&mut self, count: usize) -> Result<Vec<String>, SessionError> {
        sample(&mut self.rng, &self.vocabulary, count)
    }
}

//! Placeholder records for running without a remote endpoint.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{ImageSource, LoadError};
use crate::model::ImageRecord;

/// Smallest synthesized size in bytes (inclusive)
const MIN_SIZE: u64 = 1_000;
/// Largest synthesized size in bytes (exclusive)
const MAX_SIZE: u64 = 11_000;
/// How far back synthesized upload dates may reach, in milliseconds
const MAX_AGE_MS: i64 = 10_000_000_000;

/// Generates `count` placeholder images backed by picsum.photos.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    count: usize,
    seed: Option<u64>,
}

impl SyntheticSource {
    pub fn new(count: usize) -> Self {
        Self { count, seed: None }
    }

    /// Make the output reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl ImageSource for SyntheticSource {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn load(&self) -> Result<Vec<ImageRecord>, LoadError> {
        let now = Utc::now();
        let records = match self.seed {
            Some(seed) => synthesize(self.count, &mut StdRng::seed_from_u64(seed), now),
            None => synthesize(self.count, &mut rand::rng(), now),
        };
        Ok(records)
    }
}

/// Records `1..=count` with random sizes and upload dates before `now`.
pub fn synthesize<R: Rng>(count: usize, rng: &mut R, now: DateTime<Utc>) -> Vec<ImageRecord> {
    (1..=count)
        .map(|i| {
            let size = rng.random_range(MIN_SIZE..MAX_SIZE);
            let age = Duration::milliseconds(rng.random_range(0..MAX_AGE_MS));
            ImageRecord::new(
                i.to_string(),
                format!("https://picsum.photos/500/500?random={i}"),
                format!("Author {i}"),
            )
            .with_size(size)
            .with_uploaded_at(now - age)
        })
        .collect()
}

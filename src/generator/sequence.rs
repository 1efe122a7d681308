//! Random sequence generation

use ahash::AHashSet;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::SequenceProfile;
use crate::error::{Result, TrainerError};
use crate::trainer::Algorithm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Shuffled,
}

/// What to generate for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceSpec {
    pub size: usize,
    pub min_value: i64,
    pub max_value: i64,
    pub distinct: bool,
    pub order: Order,
}

impl SequenceSpec {
    /// Searching uses distinct ascending values; sorting uses shuffled values
    /// that may repeat.
    pub fn for_algorithm(algorithm: Algorithm, size: usize, profile: &SequenceProfile) -> Self {
        let searching = algorithm.needs_sorted_input();
        Self {
            size,
            min_value: profile.min_value,
            max_value: profile.max_value,
            distinct: searching,
            order: if searching {
                Order::Ascending
            } else {
                Order::Shuffled
            },
        }
    }

    /// Number of values in the inclusive range
    fn span(&self) -> i128 {
        i128::from(self.max_value) - i128::from(self.min_value) + 1
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<i64>> {
        if self.size == 0 {
            return Err(TrainerError::InvalidSize(0));
        }

        let span = self.span();
        if span < 1 || (self.distinct && span < self.size as i128) {
            return Err(TrainerError::InvalidRange {
                min: self.min_value,
                max: self.max_value,
                size: self.size,
            });
        }

        let mut values = if !self.distinct {
            (0..self.size)
                .map(|_| rng.gen_range(self.min_value..=self.max_value))
                .collect()
        } else if span <= 4 * self.size as i128 {
            // Small range: take a shuffled prefix of every candidate
            let mut pool: Vec<i64> = (self.min_value..=self.max_value).collect();
            let (chosen, _) = pool.partial_shuffle(rng, self.size);
            chosen.to_vec()
        } else {
            let mut seen = AHashSet::with_capacity(self.size);
            let mut out = Vec::with_capacity(self.size);
            while out.len() < self.size {
                let v = rng.gen_range(self.min_value..=self.max_value);
                if seen.insert(v) {
                    out.push(v);
                }
            }
            out
        };

        match self.order {
            Order::Ascending => values.sort_unstable(),
            Order::Shuffled => values.shuffle(rng),
        }
        Ok(values)
    }
}

/// Uniform target index in `[0, len)`
pub fn pick_target<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Result<usize> {
    if len == 0 {
        return Err(TrainerError::InvalidSize(0));
    }
    Ok(rng.gen_range(0..len))
}

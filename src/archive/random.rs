//! Randomness used for User-Agent rotation and request pacing

use crate::config::DelayRange;
use rand::Rng;
use std::time::Duration;

/// Source of the pseudo-random choices made during a fetch.
///
/// Production uses [`ThreadRandom`]; tests plug in [`FixedRandom`] so the
/// chosen User-Agent is known and no time is spent sleeping.
pub trait RandomSource: Send + Sync {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick_index(&self, len: usize) -> usize;

    /// Returns a pause within `range`.
    fn delay_within(&self, range: &DelayRange) -> Duration;
}

/// Thread-local RNG backed source.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick_index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }

    fn delay_within(&self, range: &DelayRange) -> Duration {
        if range.max <= range.min {
            return range.min;
        }
        rand::thread_rng().gen_range(range.min..range.max)
    }
}

/// Deterministic source: always the same index, always the same pause.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom {
    pub index: usize,
    pub delay: Duration,
}

impl FixedRandom {
    /// First pool entry, no pauses.
    pub fn instant() -> Self {
        FixedRandom {
            index: 0,
            delay: Duration::ZERO,
        }
    }
}

impl RandomSource for FixedRandom {
    fn pick_index(&self, len: usize) -> usize {
        self.index % len
    }

    fn delay_within(&self, _range: &DelayRange) -> Duration {
        self.delay
    }
}

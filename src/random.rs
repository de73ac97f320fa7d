use std::collections::VecDeque;

use rand::{Rng, RngCore};

/// Uniform source of `f64` samples in `[0, 1)`.
///
/// Every generator in the crate draws through this trait so tests can swap in
/// a fixed sequence.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Returns an index in `0..upper`, or 0 when `upper` is 0.
    fn index(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        // floor(r * upper) can only reach `upper` through rounding.
        ((self.next_f64() * upper as f64).floor() as usize).min(upper - 1)
    }

    /// Returns true with probability `probability`.
    fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }
}

impl<R: RngCore> RandomSource for R {
    fn next_f64(&mut self) -> f64 {
        self.gen_range(0.0..1.0)
    }
}

/// Replays a fixed list of samples, then repeats a fallback value.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedRandom {
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            fallback: 0.5,
        }
    }

    /// A source that always yields `value`.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::new(Vec::new()).with_fallback(value)
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        self.values.pop_front().unwrap_or(self.fallback)
    }
}

/// Fisher–Yates shuffle driven by `rng`.
pub fn shuffle<T, R: RandomSource + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.index(i + 1);
        items.swap(i, j);
    }
}

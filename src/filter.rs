//! Moving average over the most recent current samples.

use crate::SAMPLE_COUNT;

/// Fixed-capacity ring of current samples.
///
/// All `N` slots start at zero and always take part in the mean, so the first
/// `N - 1` averages after power-up read low.
pub struct CurrentFilter<const N: usize = SAMPLE_COUNT> {
    samples: [f32; N],
    index: usize,
}

impl<const N: usize> CurrentFilter<N> {
    pub const fn new() -> Self {
        Self {
            samples: [0.0; N],
            index: 0,
        }
    }

    /// Overwrite the oldest slot with a new sample.
    pub fn push_sample(&mut self, current: f32) {
        self.samples[self.index] = current;
        self.index = (self.index + 1) % N;
    }

    /// Unweighted mean of every slot, recomputed on each call.
    pub fn mean_current(&self) -> f32 {
        let sum: f32 = self.samples.iter().sum();
        sum / N as f32
    }
}

impl<const N: usize> Default for CurrentFilter<N> {
    fn default() -> Self {
        Self::new()
    }
}

//! Discrete Distribution.

use crate::pbrt::*;

/// A discrete distribution over a finite set of weighted items.
#[derive(Clone, Debug)]
pub struct DiscreteDistribution {
    /// Normalized CDF; `cdf[0] = 0` and `cdf[n] = 1`.
    cdf: Vec<Float>,
}

impl DiscreteDistribution {
    /// Returns a new `DiscreteDistribution` for the given non-negative
    /// weights. Weights summing to zero yield a uniform distribution.
    ///
    /// * `weights` - Item weights.
    pub fn new(weights: &[Float]) -> Self {
        let n = weights.len();
        let mut cdf = Vec::with_capacity(n + 1);
        cdf.push(0.0);
        for (i, w) in weights.iter().enumerate() {
            cdf.push(cdf[i] + max(0.0, *w));
        }

        let total = cdf[n];
        if total == 0.0 {
            for (i, v) in cdf.iter_mut().enumerate().skip(1) {
                *v = i as Float / n as Float;
            }
        } else {
            for v in cdf.iter_mut().skip(1) {
                *v /= total;
            }
        }

        Self { cdf }
    }

    /// Returns a uniform distribution over `n` items.
    ///
    /// * `n` - Number of items.
    pub fn uniform(n: usize) -> Self {
        Self::new(&vec![1.0; n])
    }

    /// Returns the number of items.
    pub fn count(&self) -> usize {
        self.cdf.len() - 1
    }

    /// Returns a sampled item index.
    ///
    /// * `u` - Uniform random sample in [0, 1).
    pub fn sample(&self, u: Float) -> usize {
        let n = self.count();
        let i = self.cdf.partition_point(|&c| c <= u);
        clamp(i.saturating_sub(1), 0, n.saturating_sub(1))
    }

    /// Returns a sampled item index and the sample value rescaled to [0, 1)
    /// within the item's interval, so it can drive a further choice.
    ///
    /// * `u` - Uniform random sample in [0, 1).
    pub fn sample_remapped(&self, u: Float) -> (usize, Float) {
        let i = self.sample(u);
        let p = self.pmf(i);
        let u_remapped = if p > 0.0 {
            clamp((u - self.cdf[i]) / p, 0.0, 1.0 - Float::EPSILON)
        } else {
            0.0
        };
        (i, u_remapped)
    }

    /// Returns the probability of sampling the given item.
    ///
    /// * `i` - Item index.
    pub fn pmf(&self, i: usize) -> Float {
        if i < self.count() {
            self.cdf[i + 1] - self.cdf[i]
        } else {
            0.0
        }
    }
}

//! # Weighted sampling
//!
//! `AliasSampler` implements Vose's variant of the Walker alias method: an
//! O(n) build over a fixed weight vector followed by O(1) draws. Selection
//! strategies build one sampler per generation and spin it once per parent.
//!
//! ## Example
//!
//! ```rust
//! use evoloop::rng::RandomNumberGenerator;
//! use evoloop::sampling::AliasSampler;
//!
//! let sampler = AliasSampler::new(&[1.0, 0.0, 3.0]).unwrap();
//! let mut rng = RandomNumberGenerator::from_seed(1);
//!
//! for _ in 0..100 {
//!     assert_ne!(sampler.spin(&mut rng), 1);
//! }
//! ```
use crate::error::{EvolutionError, Result};
use crate::rng::RandomSource;

/// O(1) weighted discrete sampler over indices `0..len()`.
///
/// The sampler holds no reference to the elements it was built from and is
/// never modified after construction; rebuild it when the weights change.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasSampler {
    probability: Vec<f64>,
    alias: Vec<usize>,
}

impl AliasSampler {
    /// Builds a sampler whose draw probabilities are `weights[i] / sum(weights)`.
    ///
    /// # Errors
    ///
    /// - `EvolutionError::EmptyDomain` if `weights` is empty or every weight is zero.
    /// - `EvolutionError::InvalidWeight` if a weight is negative or not finite.
    pub fn new(weights: &[f64]) -> Result<Self> {
        let n = weights.len();
        if n == 0 {
            return Err(EvolutionError::EmptyDomain(
                "no elements to sample from".to_string(),
            ));
        }

        let mut max_weight = 0.0_f64;
        for (index, &weight) in weights.iter().enumerate() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(EvolutionError::InvalidWeight { index, weight });
            }
            max_weight = max_weight.max(weight);
        }
        if max_weight <= 0.0 {
            return Err(EvolutionError::EmptyDomain(format!(
                "all {} weights are zero",
                n
            )));
        }

        // Dividing by the largest weight first keeps the sum in [1, n], so tiny
        // or huge inputs neither underflow to zero nor overflow to infinity.
        let total: f64 = weights.iter().map(|w| w / max_weight).sum();
        let factor = n as f64 / total;
        let mut scaled: Vec<f64> = weights
            .iter()
            .map(|w| (w / max_weight) * factor)
            .collect();

        let mut small = Vec::with_capacity(n);
        let mut large = Vec::with_capacity(n);
        for (i, &p) in scaled.iter().enumerate() {
            if p < 1.0 {
                small.push(i);
            } else {
                large.push(i);
            }
        }

        let mut probability = vec![1.0; n];
        let mut alias: Vec<usize> = (0..n).collect();

        while let (Some(&less), Some(&more)) = (small.last(), large.last()) {
            small.pop();
            large.pop();

            probability[less] = scaled[less];
            alias[less] = more;

            scaled[more] = (scaled[more] + scaled[less]) - 1.0;
            if scaled[more] < 1.0 {
                small.push(more);
            } else {
                large.push(more);
            }
        }

        // Whatever is left is 1.0 up to rounding error and keeps the
        // default probability of 1.0.

        Ok(Self { probability, alias })
    }

    /// Builds a sampler over `elements`, weighting each by `weight(index, element)`.
    pub fn from_elements<T, F>(elements: &[T], mut weight: F) -> Result<Self>
    where
        F: FnMut(usize, &T) -> f64,
    {
        let weights: Vec<f64> = elements
            .iter()
            .enumerate()
            .map(|(i, e)| weight(i, e))
            .collect();
        Self::new(&weights)
    }

    pub fn len(&self) -> usize {
        self.probability.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probability.is_empty()
    }

    /// Draws one index. Repeated calls are independent.
    pub fn spin(&self, rng: &mut dyn RandomSource) -> usize {
        let column = rng.next_below(self.probability.len());
        if rng.next_f64() < self.probability[column] {
            column
        } else {
            self.alias[column]
        }
    }

    /// The exact draw probability of every index, reconstructed from the
    /// table.
    pub fn distribution(&self) -> Vec<f64> {
        let n = self.probability.len() as f64;
        let mut result = vec![0.0; self.probability.len()];
        for (i, (&p, &a)) in self.probability.iter().zip(&self.alias).enumerate() {
            result[i] += p / n;
            result[a] += (1.0 - p) / n;
        }
        result
    }
}

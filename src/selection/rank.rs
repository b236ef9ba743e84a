use tracing::instrument;

use crate::error::{EvolutionError, Result};
use crate::genotype::Genotype;
use crate::mode::Mode;
use crate::population::Population;
use crate::rng::RandomSource;
use crate::sampling::AliasSampler;
use crate::selection::parent_selection::{ParentPair, ParentSelection};

/// Default weight of the best-ranked individual.
pub const DEFAULT_MAX_PROBABILITY: f64 = 1.5;

/// Default weight of the worst-ranked individual.
pub const DEFAULT_MIN_PROBABILITY: f64 = 0.5;

/// A selection strategy that weights individuals by rank instead of fitness.
///
/// The weights fall linearly from `max` at rank 0 to `min` at the last rank:
/// `max - (max - min) * rank / (size - 1)`. Large fitness gaps between the
/// best individuals therefore do not translate into runaway selection
/// pressure. The population must be sorted.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankSelection {
    min: f64,
    max: f64,
}

impl RankSelection {
    /// Creates a rank selection strategy.
    ///
    /// # Errors
    ///
    /// `EvolutionError::Configuration` if `min` is negative, `max < min`, or
    /// `max` is not positive.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min < 0.0 || max < min || max <= 0.0 {
            return Err(EvolutionError::Configuration(format!(
                "Invalid rank probabilities: min {} max {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// Selection weight of `rank` in a population of `size`.
    pub fn weight(&self, rank: usize, size: usize) -> f64 {
        if size <= 1 {
            return self.max;
        }
        self.max - (self.max - self.min) * (rank as f64 / (size as f64 - 1.0))
    }
}

impl Default for RankSelection {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_PROBABILITY,
            max: DEFAULT_MAX_PROBABILITY,
        }
    }
}

impl<G: Genotype> ParentSelection<G> for RankSelection {
    #[instrument(level = "trace", skip_all, fields(n = n, size = population.len()))]
    fn select_parents(
        &self,
        population: &Population<G>,
        n: usize,
        mode: Mode,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<ParentPair>> {
        if population.sorted_by() != Some(mode) {
            return Err(EvolutionError::NotSorted);
        }

        let size = population.len();
        let weights: Vec<f64> = (0..size).map(|rank| self.weight(rank, size)).collect();
        let sampler = AliasSampler::new(&weights)?;

        Ok((0..n)
            .map(|_| (sampler.spin(rng), sampler.spin(rng)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RandomNumberGenerator;
    use crate::selection::test_support::{assert_binomial, histogram, population_of};

    #[test]
    fn test_weights_form_linear_ramp() {
        let selection = RankSelection::default();
        assert_eq!(selection.weight(0, 11), 1.5);
        assert!((selection.weight(5, 11) - 1.0).abs() < 1e-12);
        assert!((selection.weight(10, 11) - 0.5).abs() < 1e-12);
        assert_eq!(selection.weight(0, 1), 1.5);
    }

    #[test]
    fn test_invalid_bounds() {
        assert!(RankSelection::new(-0.1, 1.0).is_err());
        assert!(RankSelection::new(1.0, 0.5).is_err());
        assert!(RankSelection::new(0.0, 0.0).is_err());
        assert!(RankSelection::new(0.0, 2.0).is_ok());
    }

    #[test]
    fn test_requires_sorted_population() {
        let population = population_of(&[3.0, 1.0, 2.0]);
        let mut rng = RandomNumberGenerator::from_seed(1);
        assert_eq!(
            RankSelection::default().select_parents(&population, 3, Mode::Maximize, &mut rng),
            Err(EvolutionError::NotSorted)
        );
    }

    #[test]
    fn test_frequencies_follow_ramp() {
        const SIZE: usize = 10;
        const PAIRS: usize = 150_000;

        let fitness: Vec<f64> = (0..SIZE).map(|i| (i * i) as f64).collect();
        let mut population = population_of(&fitness);
        population.sort(Mode::Minimize).unwrap();

        let selection = RankSelection::new(0.2, 1.8).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(42);
        let pairs = selection
            .select_parents(&population, PAIRS, Mode::Minimize, &mut rng)
            .unwrap();
        assert_eq!(pairs.len(), PAIRS);

        let counts = histogram(&pairs, SIZE);
        let total: f64 = (0..SIZE).map(|r| selection.weight(r, SIZE)).sum();
        for (rank, &count) in counts.iter().enumerate() {
            let p = selection.weight(rank, SIZE) / total;
            assert_binomial(count, 2 * PAIRS, p, &format!("rank {}", rank));
        }
    }

    #[test]
    fn test_single_individual() {
        let mut population = population_of(&[4.0]);
        population.sort(Mode::Maximize).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(5);
        let pairs = RankSelection::default()
            .select_parents(&population, 4, Mode::Maximize, &mut rng)
            .unwrap();
        assert_eq!(pairs, vec![(0, 0); 4]);
    }
}

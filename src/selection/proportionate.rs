use tracing::instrument;

use crate::error::Result;
use crate::genotype::Genotype;
use crate::mode::Mode;
use crate::population::Population;
use crate::rng::RandomSource;
use crate::sampling::AliasSampler;
use crate::selection::parent_selection::{ParentPair, ParentSelection};

/// Roulette wheel selection backed by an alias table.
///
/// Weights come from [`Population::probability_selector`]: the fitness itself
/// when maximizing, `(max + min) - fitness` when minimizing. Maximizing
/// therefore requires non-negative fitness values; a negative one fails with
/// `EvolutionError::InvalidWeight`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FitnessProportionateSelection;

impl<G: Genotype> ParentSelection<G> for FitnessProportionateSelection {
    #[instrument(level = "trace", skip_all, fields(n = n, size = population.len()))]
    fn select_parents(
        &self,
        population: &Population<G>,
        n: usize,
        mode: Mode,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<ParentPair>> {
        let selector = population.probability_selector(mode)?;
        let sampler = AliasSampler::from_elements(population.as_slice(), |_, p| selector.weight(p))?;

        Ok((0..n)
            .map(|_| (sampler.spin(rng), sampler.spin(rng)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvolutionError;
    use crate::rng::RandomNumberGenerator;
    use crate::selection::test_support::{assert_binomial, histogram, population_of};

    const PAIRS: usize = 50_000;

    #[test]
    fn test_maximize_is_proportional_to_fitness() {
        let fitness = [1.0, 2.0, 3.0, 4.0];
        let population = population_of(&fitness);
        let mut rng = RandomNumberGenerator::from_seed(21);
        let pairs = FitnessProportionateSelection
            .select_parents(&population, PAIRS, Mode::Maximize, &mut rng)
            .unwrap();
        let counts = histogram(&pairs, 4);
        for (i, &count) in counts.iter().enumerate() {
            assert_binomial(count, 2 * PAIRS, fitness[i] / 10.0, &format!("index {}", i));
        }
    }

    #[test]
    fn test_minimize_inverts_weights() {
        // weights become 4, 3, 2, 1
        let population = population_of(&[1.0, 2.0, 3.0, 4.0]);
        let mut rng = RandomNumberGenerator::from_seed(22);
        let pairs = FitnessProportionateSelection
            .select_parents(&population, PAIRS, Mode::Minimize, &mut rng)
            .unwrap();
        let counts = histogram(&pairs, 4);
        for (i, &count) in counts.iter().enumerate() {
            let p = (4 - i) as f64 / 10.0;
            assert_binomial(count, 2 * PAIRS, p, &format!("index {}", i));
        }
    }

    #[test]
    fn test_negative_fitness_when_maximizing() {
        let population = population_of(&[1.0, -2.0]);
        let mut rng = RandomNumberGenerator::from_seed(23);
        assert!(matches!(
            FitnessProportionateSelection.select_parents(&population, 1, Mode::Maximize, &mut rng),
            Err(EvolutionError::InvalidWeight { index: 1, .. })
        ));
    }

    #[test]
    fn test_all_zero_fitness() {
        let population = population_of(&[0.0, 0.0]);
        let mut rng = RandomNumberGenerator::from_seed(24);
        assert!(matches!(
            FitnessProportionateSelection.select_parents(&population, 1, Mode::Maximize, &mut rng),
            Err(EvolutionError::EmptyDomain(_))
        ));
    }
}

use tracing::{debug, instrument, warn};

use crate::error::{EvolutionError, Result};
use crate::genotype::Genotype;
use crate::mode::Mode;
use crate::population::Population;
use crate::rng::RandomSource;
use crate::sampling::AliasSampler;
use crate::selection::adult_selection::AdultSelection;

/// Number of consecutive draws of already chosen offspring tolerated before
/// the sampler is rebuilt over the remaining ones.
pub const DEFAULT_REBUILD_AFTER_MISSES: usize = 16;

/// Samples `n` distinct adults from the offspring, proportionally to fitness.
///
/// Weights are the fitness when maximizing and `(max + min) - fitness` when
/// minimizing. Sampling is without replacement: an alias table is built once
/// and redrawn when it lands on an offspring that was already chosen. After
/// too many misses in a row the table is rebuilt over the offspring that are
/// still available. If all of those have zero weight the remaining adults are
/// drawn uniformly.
///
/// Only the offspring are considered; incumbents are discarded.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overproduction {
    rebuild_after_misses: usize,
}

impl Overproduction {
    pub fn new(rebuild_after_misses: usize) -> Self {
        Self {
            rebuild_after_misses: rebuild_after_misses.max(1),
        }
    }

    fn build_sampler(&self, weights: &[f64], available: &[usize]) -> Result<AliasSampler> {
        let remaining: Vec<f64> = available.iter().map(|&i| weights[i]).collect();
        match AliasSampler::new(&remaining) {
            Err(EvolutionError::EmptyDomain(_)) => {
                warn!(
                    available = available.len(),
                    "All remaining offspring have zero weight, drawing uniformly"
                );
                AliasSampler::new(&vec![1.0; available.len()])
            }
            other => other,
        }
    }
}

impl Default for Overproduction {
    fn default() -> Self {
        Self::new(DEFAULT_REBUILD_AFTER_MISSES)
    }
}

impl<G: Genotype> AdultSelection<G> for Overproduction {
    #[instrument(level = "trace", skip_all, fields(n = n, offspring = offspring.len()))]
    fn select_adults(
        &self,
        offspring: &mut Population<G>,
        incumbents: &mut Population<G>,
        n: usize,
        mode: Mode,
        rng: &mut dyn RandomSource,
    ) -> Result<()> {
        if n > offspring.len() {
            return Err(EvolutionError::Evolution(format!(
                "Cannot keep {} adults from {} offspring",
                n,
                offspring.len()
            )));
        }
        if n == 0 {
            offspring.clear();
            incumbents.clear();
            return Ok(());
        }

        let selector = offspring.probability_selector(mode)?;
        let weights: Vec<f64> = offspring.iter().map(|p| selector.weight(p)).collect();

        let mut taken = vec![false; weights.len()];
        let mut chosen = Vec::with_capacity(n);
        let mut available: Vec<usize> = (0..weights.len()).collect();
        let mut sampler = self.build_sampler(&weights, &available)?;
        let mut misses = 0;

        while chosen.len() < n {
            let index = available[sampler.spin(rng)];
            if taken[index] {
                misses += 1;
                if misses >= self.rebuild_after_misses {
                    available.retain(|&i| !taken[i]);
                    debug!(available = available.len(), "Rebuilding overproduction sampler");
                    sampler = self.build_sampler(&weights, &available)?;
                    misses = 0;
                }
                continue;
            }

            taken[index] = true;
            chosen.push(index);
            misses = 0;
        }

        let mut slots: Vec<_> = offspring.take_all().into_iter().map(Some).collect();
        incumbents.clear();
        for index in chosen {
            if let Some(phenotype) = slots[index].take() {
                incumbents.add(phenotype)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RandomNumberGenerator;
    use crate::selection::test_support::{assert_binomial, population_of, tags};
    use std::collections::HashSet;

    #[test]
    fn test_selects_distinct_adults() {
        let fitness: Vec<f64> = (1..=30).map(|i| i as f64).collect();
        let mut rng = RandomNumberGenerator::from_seed(31);

        for mode in [Mode::Maximize, Mode::Minimize] {
            let mut offspring = population_of(&fitness);
            let mut incumbents = population_of(&[0.0; 10]);
            Overproduction::default()
                .select_adults(&mut offspring, &mut incumbents, 10, mode, &mut rng)
                .unwrap();

            let selected: HashSet<i64> = tags(&incumbents).into_iter().collect();
            assert_eq!(selected.len(), 10);
            assert!(incumbents.is_filled());
        }
    }

    #[test]
    fn test_can_take_every_offspring() {
        let mut offspring = population_of(&[5.0, 0.0, 1.0, 0.0]);
        let mut incumbents = population_of(&[0.0; 4]);
        let mut rng = RandomNumberGenerator::from_seed(32);

        Overproduction::default()
            .select_adults(&mut offspring, &mut incumbents, 4, Mode::Maximize, &mut rng)
            .unwrap();

        let mut selected = tags(&incumbents);
        selected.sort_unstable();
        assert_eq!(selected, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_all_zero_weights_fall_back_to_uniform() {
        let mut offspring = population_of(&[0.0; 6]);
        let mut incumbents = population_of(&[0.0; 3]);
        let mut rng = RandomNumberGenerator::from_seed(33);

        Overproduction::default()
            .select_adults(&mut offspring, &mut incumbents, 3, Mode::Maximize, &mut rng)
            .unwrap();

        assert_eq!(incumbents.len(), 3);
    }

    #[test]
    fn test_first_pick_follows_fitness_when_maximizing() {
        const TRIALS: usize = 20_000;
        let fitness = [1.0, 3.0, 6.0];
        let mut counts = [0usize; 3];
        let mut rng = RandomNumberGenerator::from_seed(34);

        for _ in 0..TRIALS {
            let mut offspring = population_of(&fitness);
            let mut incumbents = population_of(&[0.0]);
            Overproduction::default()
                .select_adults(&mut offspring, &mut incumbents, 1, Mode::Maximize, &mut rng)
                .unwrap();
            counts[incumbents[0].genotype()[0] as usize] += 1;
        }

        for (i, &count) in counts.iter().enumerate() {
            assert_binomial(count, TRIALS, fitness[i] / 10.0, &format!("index {}", i));
        }
    }

    #[test]
    fn test_minimize_never_picks_worst_first() {
        // weights become 3, 2, 1, 0
        let mut rng = RandomNumberGenerator::from_seed(35);
        for _ in 0..500 {
            let mut offspring = population_of(&[0.0, 1.0, 2.0, 3.0]);
            let mut incumbents = population_of(&[0.0; 3]);
            Overproduction::default()
                .select_adults(&mut offspring, &mut incumbents, 3, Mode::Minimize, &mut rng)
                .unwrap();
            let mut selected = tags(&incumbents);
            selected.sort_unstable();
            assert_eq!(selected, vec![0, 1, 2]);
        }
    }

    #[test]
    fn test_more_adults_than_offspring() {
        let mut offspring = population_of(&[1.0, 2.0]);
        let mut incumbents = population_of(&[0.0; 3]);
        let mut rng = RandomNumberGenerator::from_seed(36);
        assert!(Overproduction::default()
            .select_adults(&mut offspring, &mut incumbents, 3, Mode::Maximize, &mut rng)
            .is_err());
    }
}

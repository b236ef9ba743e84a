//! # Checkpoints
//!
//! An `EvolutionSnapshot` is a plain value holding everything needed to
//! continue a run: the population, the generation counter, the accumulated
//! runtime, the random source, the statistics history and the best phenotype
//! found so far. It is created by [`EvolutionLauncher::snapshot`] and consumed
//! by [`EvolutionLauncher::restore`]; writing it to disk is left to the caller
//! (with the `serde` feature the snapshot derives `Serialize`/`Deserialize`).
//!
//! [`EvolutionLauncher::snapshot`]: super::EvolutionLauncher::snapshot
//! [`EvolutionLauncher::restore`]: super::EvolutionLauncher::restore
use std::time::Duration;

use crate::error::{EvolutionError, Result};
use crate::evolution::options::EvolutionOptions;
use crate::genotype::Genotype;
use crate::phenotype::Phenotype;
use crate::population::{Population, PopulationStatistics};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct EvolutionSnapshot<G, R> {
    /// Options of the run that produced the snapshot.
    pub options: EvolutionOptions,
    pub population: Population<G>,
    pub generation: usize,
    pub runtime: Duration,
    pub rng: R,
    pub statistics: Vec<PopulationStatistics>,
    pub best: Option<Phenotype<G>>,
}

impl<G: Genotype, R> EvolutionSnapshot<G, R> {
    /// Checks that the snapshot can be resumed under `options`.
    ///
    /// # Errors
    ///
    /// `EvolutionError::IncompatibleSnapshot` if the population size differs
    /// from the one the snapshot was taken with, or the stored population
    /// does not match it.
    pub fn check_compatible(&self, options: &EvolutionOptions) -> Result<()> {
        if self.options.get_population_size() != options.get_population_size() {
            return Err(EvolutionError::IncompatibleSnapshot(format!(
                "Population size cannot differ between snapshots. In snapshot: {}, configured: {}",
                self.options.get_population_size(),
                options.get_population_size()
            )));
        }
        if self.population.capacity() != options.get_population_size() {
            return Err(EvolutionError::IncompatibleSnapshot(format!(
                "Stored population has capacity {}, expected {}",
                self.population.capacity(),
                options.get_population_size()
            )));
        }
        Ok(())
    }
}

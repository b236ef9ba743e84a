//! # OrdinaryStrategy
//!
//! Every parent pair yields one child: with probability `crossover_rate` the
//! child is the crossover of both parents, otherwise it is a copy of the first
//! parent. The child is then mutated with `mutation_rate`.
use super::BreedStrategy;
use crate::{
    error::{EvolutionError, Result},
    evolution::options::EvolutionOptions,
    genotype::Genotype,
    phenotype::Phenotype,
    population::Population,
    rng::RandomSource,
    selection::ParentPair,
};

#[derive(Debug, Clone, Default)]
pub struct OrdinaryStrategy;

impl OrdinaryStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl<G: Genotype> BreedStrategy<G> for OrdinaryStrategy {
    /// # Errors
    ///
    /// `EvolutionError::Breeding` if a pair points outside `parents`, and any
    /// error raised by the genotype's crossover.
    fn breed(
        &self,
        parents: &Population<G>,
        pairs: &[ParentPair],
        options: &EvolutionOptions,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<Phenotype<G>>> {
        let crossover_rate = options.get_crossover_rate();
        let mutation_rate = options.get_mutation_rate();
        let kind = options.get_crossover();

        let mut children = Vec::with_capacity(pairs.len());
        for &(first, second) in pairs {
            let (mother, father) = match (parents.get(first), parents.get(second)) {
                (Some(m), Some(f)) => (m.genotype(), f.genotype()),
                _ => {
                    return Err(EvolutionError::Breeding(format!(
                        "Parent pair ({}, {}) is out of range for {} parents",
                        first,
                        second,
                        parents.len()
                    )))
                }
            };

            let mut child = if rng.next_f64() < crossover_rate {
                mother.crossover_with(father, kind, rng)?
            } else {
                mother.clone()
            };
            child.mutate(mutation_rate, rng);

            children.push(Phenotype::new(child));
        }

        Ok(children)
    }
}

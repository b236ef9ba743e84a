//! # Breeding
//!
//! A `BreedStrategy` turns the parent pairs chosen by parent selection into
//! unevaluated offspring. Breeding runs on the driving thread and consumes the
//! random source sequentially, so a seeded run is reproducible.
use std::fmt::Debug;

use crate::error::Result;
use crate::evolution::options::EvolutionOptions;
use crate::genotype::Genotype;
use crate::phenotype::Phenotype;
use crate::population::Population;
use crate::rng::RandomSource;
use crate::selection::ParentPair;

pub mod ordinary;

pub use ordinary::OrdinaryStrategy;

pub trait BreedStrategy<G: Genotype>: Debug + Send + Sync {
    /// Produces one unevaluated child per entry of `pairs`, in order.
    ///
    /// `pairs` index into `parents`.
    fn breed(
        &self,
        parents: &Population<G>,
        pairs: &[ParentPair],
        options: &EvolutionOptions,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<Phenotype<G>>>;
}

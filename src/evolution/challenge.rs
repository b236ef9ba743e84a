use crate::error::Result;
use crate::genotype::Genotype;
use crate::rng::RandomSource;

/// The problem being optimized: a fitness function plus a factory for random
/// starting genotypes.
///
/// `score` may be called concurrently from worker threads when multi-threaded
/// evaluation is enabled, so it should be free of side effects if runs are
/// expected to be reproducible.
pub trait Challenge<G: Genotype>: Send + Sync {
    /// Computes the fitness of `genotype`.
    ///
    /// Errors are propagated unchanged and abort the run.
    fn score(&self, genotype: &G) -> Result<f64>;

    /// Creates a random genotype for the initial population.
    fn random_genotype(&self, rng: &mut dyn RandomSource) -> G;
}

//! # Phenotype
//!
//! A `Phenotype` owns exactly one genotype and caches its fitness. The cache
//! is empty until [`Phenotype::evaluate`] runs; reading the fitness before
//! that fails with `EvolutionError::UnevaluatedAccess`.
//!
//! ## Example
//!
//! ```rust
//! use evoloop::error::{EvolutionError, Result};
//! use evoloop::evolution::Challenge;
//! use evoloop::genotype::{BitFlip, ListGenotype};
//! use evoloop::phenotype::Phenotype;
//! use evoloop::rng::RandomSource;
//!
//! type Bits = ListGenotype<bool, BitFlip>;
//!
//! struct OneMax;
//!
//! impl Challenge<Bits> for OneMax {
//!     fn score(&self, genotype: &Bits) -> Result<f64> {
//!         Ok(genotype.genes().iter().filter(|&&b| b).count() as f64)
//!     }
//!
//!     fn random_genotype(&self, rng: &mut dyn RandomSource) -> Bits {
//!         ListGenotype::random(8, BitFlip, || rng.next_bool())
//!     }
//! }
//!
//! let mut phenotype = Phenotype::new(ListGenotype::new(vec![true, true, false], BitFlip));
//! assert_eq!(phenotype.fitness(), Err(EvolutionError::UnevaluatedAccess));
//! assert_eq!(phenotype.evaluate(&OneMax).unwrap(), 2.0);
//! assert_eq!(phenotype.fitness().unwrap(), 2.0);
//! ```
use std::cmp::Ordering;

use crate::error::{EvolutionError, Result};
use crate::evolution::Challenge;
use crate::genotype::Genotype;
use crate::mode::Mode;

/// A genotype together with its cached fitness.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Phenotype<G> {
    genotype: G,
    fitness: Option<f64>,
}

impl<G: Genotype> Phenotype<G> {
    /// Wraps an unevaluated genotype.
    pub fn new(genotype: G) -> Self {
        Self {
            genotype,
            fitness: None,
        }
    }

    /// Wraps a genotype whose fitness is already known, e.g. when restoring
    /// a population.
    pub fn with_fitness(genotype: G, fitness: f64) -> Self {
        Self {
            genotype,
            fitness: Some(fitness),
        }
    }

    pub fn genotype(&self) -> &G {
        &self.genotype
    }

    pub fn into_genotype(self) -> G {
        self.genotype
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Returns the cached fitness.
    ///
    /// # Errors
    ///
    /// `EvolutionError::UnevaluatedAccess` if the phenotype was never evaluated.
    pub fn fitness(&self) -> Result<f64> {
        self.fitness.ok_or(EvolutionError::UnevaluatedAccess)
    }

    /// Scores the genotype with `challenge` and caches the result, replacing
    /// any previous value.
    ///
    /// # Errors
    ///
    /// Propagates errors from the challenge, and rejects non-finite scores
    /// with `EvolutionError::FitnessCalculation`. The cache is left untouched
    /// on error.
    pub fn evaluate<C>(&mut self, challenge: &C) -> Result<f64>
    where
        C: Challenge<G> + ?Sized,
    {
        let score = challenge.score(&self.genotype)?;

        if !score.is_finite() {
            return Err(EvolutionError::FitnessCalculation(format!(
                "Non-finite fitness score encountered: {}",
                score
            )));
        }

        self.fitness = Some(score);
        Ok(score)
    }

    /// Returns the cached fitness, evaluating first if needed.
    pub fn ensure_evaluated<C>(&mut self, challenge: &C) -> Result<f64>
    where
        C: Challenge<G> + ?Sized,
    {
        match self.fitness {
            Some(fitness) => Ok(fitness),
            None => self.evaluate(challenge),
        }
    }

    /// Drops the cached fitness.
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }

    /// Compares two phenotypes by fitness only, better first under `mode`.
    ///
    /// # Errors
    ///
    /// `EvolutionError::UnevaluatedAccess` if either side is unevaluated.
    pub fn compare(&self, other: &Self, mode: Mode) -> Result<Ordering> {
        Ok(mode.best_first(self.fitness()?, other.fitness()?))
    }

    /// Fitness for callers that already checked every phenotype is evaluated.
    pub(crate) fn fitness_or_nan(&self) -> f64 {
        self.fitness.unwrap_or(f64::NAN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genotype::{BitFlip, ListGenotype};
    use crate::rng::RandomSource;

    type Bits = ListGenotype<bool, BitFlip>;

    struct CountOnes;

    impl Challenge<Bits> for CountOnes {
        fn score(&self, genotype: &Bits) -> Result<f64> {
            Ok(genotype.genes().iter().filter(|&&b| b).count() as f64)
        }

        fn random_genotype(&self, rng: &mut dyn RandomSource) -> Bits {
            ListGenotype::random(4, BitFlip, || rng.next_bool())
        }
    }

    struct Broken;

    impl Challenge<Bits> for Broken {
        fn score(&self, _genotype: &Bits) -> Result<f64> {
            Ok(f64::NAN)
        }

        fn random_genotype(&self, _rng: &mut dyn RandomSource) -> Bits {
            ListGenotype::new(vec![], BitFlip)
        }
    }

    fn pheno(values: &[bool]) -> Phenotype<Bits> {
        Phenotype::new(ListGenotype::new(values.to_vec(), BitFlip))
    }

    #[test]
    fn test_unevaluated_access() {
        let p = pheno(&[true]);
        assert!(!p.is_evaluated());
        assert_eq!(p.fitness(), Err(EvolutionError::UnevaluatedAccess));
    }

    #[test]
    fn test_evaluate_caches() {
        let mut p = pheno(&[true, true, false]);
        assert_eq!(p.evaluate(&CountOnes).unwrap(), 2.0);
        assert!(p.is_evaluated());
        assert_eq!(p.fitness().unwrap(), 2.0);
        p.invalidate();
        assert!(!p.is_evaluated());
        assert_eq!(p.ensure_evaluated(&CountOnes).unwrap(), 2.0);
    }

    #[test]
    fn test_non_finite_score_is_rejected() {
        let mut p = pheno(&[true]);
        assert!(matches!(
            p.evaluate(&Broken),
            Err(EvolutionError::FitnessCalculation(_))
        ));
        assert!(!p.is_evaluated());
    }

    #[test]
    fn test_compare_by_fitness_only() {
        let a = Phenotype::with_fitness(ListGenotype::new(vec![true], BitFlip), 1.0);
        let b = Phenotype::with_fitness(ListGenotype::new(vec![false], BitFlip), 2.0);
        assert_eq!(a.compare(&b, Mode::Maximize).unwrap(), Ordering::Greater);
        assert_eq!(a.compare(&b, Mode::Minimize).unwrap(), Ordering::Less);
        assert!(a.compare(&pheno(&[true]), Mode::Maximize).is_err());
    }
}

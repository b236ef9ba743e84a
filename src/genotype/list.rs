//! A generic fixed-length genotype with per-element mutation.
//!
//! `ListGenotype<T, M>` stores its genes in a `Vec<T>` and delegates the
//! mutation of a single gene to an [`ElementMutator`]. Every gene is visited
//! on mutation and mutated with the configured probability.
use std::fmt::Debug;
use std::ops::Index;

use crate::error::{EvolutionError, Result};
use crate::genotype::{crossover, CrossoverKind, Genotype};
use crate::rng::RandomSource;

/// Mutation rule for a single gene.
pub trait ElementMutator<T>: Clone + Debug + PartialEq + Send + Sync {
    /// Mutates `element` in place.
    fn mutate_element(&self, element: &mut T, rng: &mut dyn RandomSource);
}

/// Flips a boolean gene.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BitFlip;

impl ElementMutator<bool> for BitFlip {
    fn mutate_element(&self, element: &mut bool, _rng: &mut dyn RandomSource) {
        *element = !*element;
    }
}

/// Redraws a byte gene uniformly from `[min, max]`.
///
/// Prefer [`ByteRange::new`], which rejects an empty range.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ByteRange {
    pub min: u8,
    pub max: u8,
}

impl ByteRange {
    /// # Errors
    ///
    /// `EvolutionError::Configuration` if `min > max`.
    pub fn new(min: u8, max: u8) -> Result<Self> {
        if min > max {
            return Err(EvolutionError::Configuration(format!(
                "Byte range is empty: min {} > max {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// Printable ASCII, space through tilde.
    pub fn printable_ascii() -> Self {
        Self { min: 32, max: 126 }
    }

    /// Draws a fresh byte from the range.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`, which [`ByteRange::new`] rules out.
    pub fn sample(&self, rng: &mut dyn RandomSource) -> u8 {
        rng.next_in_range(i64::from(self.min), i64::from(self.max) + 1) as u8
    }
}

impl ElementMutator<u8> for ByteRange {
    fn mutate_element(&self, element: &mut u8, rng: &mut dyn RandomSource) {
        *element = self.sample(rng);
    }
}

/// Redraws an integer gene uniformly from `[min, max)`.
///
/// Mutating panics if `min >= max`; [`IntegerRange::new`] rejects such a range.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegerRange {
    pub min: i64,
    pub max: i64,
}

impl IntegerRange {
    /// # Errors
    ///
    /// `EvolutionError::Configuration` if `min >= max`.
    pub fn new(min: i64, max: i64) -> Result<Self> {
        if min >= max {
            return Err(EvolutionError::Configuration(format!(
                "Integer range is empty: [{}, {})",
                min, max
            )));
        }
        Ok(Self { min, max })
    }
}

impl ElementMutator<i64> for IntegerRange {
    fn mutate_element(&self, element: &mut i64, rng: &mut dyn RandomSource) {
        *element = rng.next_in_range(self.min, self.max);
    }
}

/// Adds a uniform offset from `[-amplitude, amplitude)` to a real gene,
/// then clamps it into `[min, max]`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealPerturbation {
    pub amplitude: f64,
    pub min: f64,
    pub max: f64,
}

impl ElementMutator<f64> for RealPerturbation {
    fn mutate_element(&self, element: &mut f64, rng: &mut dyn RandomSource) {
        let delta = rng.next_f64_in(-self.amplitude, self.amplitude);
        *element = (*element + delta).clamp(self.min, self.max);
    }
}

/// Fixed-length sequence genotype.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ListGenotype<T, M> {
    genes: Vec<T>,
    mutator: M,
}

impl<T, M> ListGenotype<T, M>
where
    T: Clone + Debug + PartialEq + Send + Sync,
    M: ElementMutator<T>,
{
    pub fn new(genes: Vec<T>, mutator: M) -> Self {
        Self { genes, mutator }
    }

    /// Builds a genotype of `len` genes drawn from `gene`.
    pub fn random<F>(len: usize, mutator: M, mut gene: F) -> Self
    where
        F: FnMut() -> T,
    {
        Self {
            genes: (0..len).map(|_| gene()).collect(),
            mutator,
        }
    }

    pub fn genes(&self) -> &[T] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn mutator(&self) -> &M {
        &self.mutator
    }

    pub fn into_genes(self) -> Vec<T> {
        self.genes
    }
}

impl<T, M> Index<usize> for ListGenotype<T, M> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.genes[index]
    }
}

impl<T, M> Genotype for ListGenotype<T, M>
where
    T: Clone + Debug + PartialEq + Send + Sync,
    M: ElementMutator<T>,
{
    fn crossover_with(
        &self,
        other: &Self,
        kind: CrossoverKind,
        rng: &mut dyn RandomSource,
    ) -> Result<Self> {
        let genes = crossover::crossover(&self.genes, &other.genes, kind, rng)?;
        Ok(Self {
            genes,
            mutator: self.mutator.clone(),
        })
    }

    fn mutate(&mut self, probability: f64, rng: &mut dyn RandomSource) {
        for gene in self.genes.iter_mut() {
            if rng.next_f64() < probability {
                self.mutator.mutate_element(gene, rng);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RandomNumberGenerator;

    fn bits(values: &[bool]) -> ListGenotype<bool, BitFlip> {
        ListGenotype::new(values.to_vec(), BitFlip)
    }

    #[test]
    fn test_range_constructors_reject_empty_ranges() {
        assert!(matches!(
            IntegerRange::new(5, 5),
            Err(EvolutionError::Configuration(_))
        ));
        assert!(matches!(
            IntegerRange::new(6, 5),
            Err(EvolutionError::Configuration(_))
        ));
        assert!(matches!(
            ByteRange::new(b'z', b'a'),
            Err(EvolutionError::Configuration(_))
        ));

        let mut rng = RandomNumberGenerator::from_seed(2);
        let single = ByteRange::new(b'x', b'x').unwrap();
        assert_eq!(single.sample(&mut rng), b'x');

        let range = IntegerRange::new(-3, -2).unwrap();
        let mut value = 100;
        range.mutate_element(&mut value, &mut rng);
        assert_eq!(value, -3);
    }

    #[test]
    fn test_mutation_probability_one_flips_every_bit() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let mut genotype = bits(&[true, false, true, false]);
        genotype.mutate(1.0, &mut rng);
        assert_eq!(genotype.genes(), &[false, true, false, true]);
    }

    #[test]
    fn test_mutation_probability_zero_is_identity() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let mut genotype = bits(&[true, false, true, false]);
        genotype.mutate(0.0, &mut rng);
        assert_eq!(genotype, bits(&[true, false, true, false]));
    }

    #[test]
    fn test_clone_is_deep() {
        let mut rng = RandomNumberGenerator::from_seed(2);
        let parent = bits(&[true; 16]);
        let mut child = parent.clone();
        child.mutate(1.0, &mut rng);
        assert!(parent.genes().iter().all(|&b| b));
        assert!(child.genes().iter().all(|&b| !b));
    }

    #[test]
    fn test_crossover_children_do_not_alias_parents() {
        let mut rng = RandomNumberGenerator::from_seed(3);
        let a = bits(&[true; 8]);
        let b = bits(&[false; 8]);
        let mut child = a.crossover_with(&b, CrossoverKind::Uniform, &mut rng).unwrap();
        child.mutate(1.0, &mut rng);
        assert_eq!(a, bits(&[true; 8]));
        assert_eq!(b, bits(&[false; 8]));
    }

    #[test]
    fn test_byte_range_stays_in_range() {
        let mut rng = RandomNumberGenerator::from_seed(4);
        let range = ByteRange::printable_ascii();
        let mut genotype = ListGenotype::random(64, range, || b'a');
        genotype.mutate(1.0, &mut rng);
        assert!(genotype.genes().iter().all(|&c| (32..=126).contains(&c)));
    }

    #[test]
    fn test_integer_range() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let mut genotype = ListGenotype::new(vec![0i64; 32], IntegerRange { min: -5, max: 5 });
        genotype.mutate(1.0, &mut rng);
        assert!(genotype.genes().iter().all(|g| (-5..5).contains(g)));
    }

    #[test]
    fn test_real_perturbation_is_clamped() {
        let mut rng = RandomNumberGenerator::from_seed(6);
        let mutator = RealPerturbation {
            amplitude: 10.0,
            min: -1.0,
            max: 1.0,
        };
        let mut genotype = ListGenotype::new(vec![0.0; 32], mutator);
        genotype.mutate(1.0, &mut rng);
        assert!(genotype.genes().iter().all(|g| (-1.0..=1.0).contains(g)));
    }

    #[test]
    fn test_index() {
        let genotype = bits(&[true, false]);
        assert!(genotype[0]);
        assert!(!genotype[1]);
        assert_eq!(genotype.len(), 2);
        assert!(!genotype.is_empty());
    }
}

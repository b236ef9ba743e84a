//! # Genotype Trait
//!
//! The `Genotype` trait is the single capability interface a candidate
//! solution has to provide: cloning (through `Clone`), value equality (through
//! `PartialEq`), crossover and mutation. The engine never looks inside a
//! genotype.
//!
//! Fixed-length sequence genotypes can reuse the free helpers in
//! [`crossover`] or the ready made [`ListGenotype`].
//!
//! ## Example
//!
//! ```rust
//! use evoloop::error::Result;
//! use evoloop::genotype::{crossover, CrossoverKind, Genotype};
//! use evoloop::rng::RandomSource;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Weights(Vec<f64>);
//!
//! impl Genotype for Weights {
//!     fn crossover_with(
//!         &self,
//!         other: &Self,
//!         kind: CrossoverKind,
//!         rng: &mut dyn RandomSource,
//!     ) -> Result<Self> {
//!         crossover::crossover(&self.0, &other.0, kind, rng).map(Weights)
//!     }
//!
//!     fn mutate(&mut self, probability: f64, rng: &mut dyn RandomSource) {
//!         for w in self.0.iter_mut() {
//!             if rng.next_f64() < probability {
//!                 *w += rng.next_f64_in(-0.1, 0.1);
//!             }
//!         }
//!     }
//! }
//! ```
pub mod crossover;
pub mod list;

use std::fmt::{self, Debug};
use std::str::FromStr;

use crate::error::{EvolutionError, Result};
use crate::rng::RandomSource;

pub use list::{BitFlip, ByteRange, ElementMutator, IntegerRange, ListGenotype, RealPerturbation};

/// The crossover operator requested by the engine.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CrossoverKind {
    /// Split both parents at one random point.
    OnePoint,
    /// Pick every gene from either parent with equal probability.
    #[default]
    Uniform,
}

impl fmt::Display for CrossoverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossoverKind::OnePoint => write!(f, "OnePoint"),
            CrossoverKind::Uniform => write!(f, "Uniform"),
        }
    }
}

impl FromStr for CrossoverKind {
    type Err = EvolutionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "onepoint" | "one_point" | "one-point" => Ok(CrossoverKind::OnePoint),
            "uniform" => Ok(CrossoverKind::Uniform),
            _ => Err(EvolutionError::UnsupportedStrategy(format!(
                "crossover '{}'",
                s
            ))),
        }
    }
}

/// Trait for types that encode a candidate solution.
///
/// Types implementing this trait must also implement `Clone`, `Debug`,
/// `PartialEq`, `Send`, and `Sync`. `Clone` must produce a deep copy.
pub trait Genotype: Clone + Debug + PartialEq + Send + Sync {
    /// Produces a child from `self` and `other`.
    ///
    /// The child must own all of its data: mutating it must never change
    /// either parent.
    ///
    /// # Errors
    ///
    /// Returns an error when the two parents cannot be recombined, for example
    /// when fixed-length parents differ in length.
    fn crossover_with(
        &self,
        other: &Self,
        kind: CrossoverKind,
        rng: &mut dyn RandomSource,
    ) -> Result<Self>;

    /// Mutates the genotype in place. `probability` is the configured
    /// mutation rate; how it is applied is up to the implementation.
    fn mutate(&mut self, probability: f64, rng: &mut dyn RandomSource);
}

//! # Error Types
//!
//! This module defines the error type shared by every part of the engine.
//! Precondition violations (an unfilled or unsorted population, a full
//! population, an unevaluated phenotype) are reported through dedicated
//! variants so callers can tell them apart from failures raised by their own
//! fitness functions.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use evoloop::error::{EvolutionError, Result};
//!
//! fn check_size(size: usize) -> Result<()> {
//!     if size == 0 {
//!         return Err(EvolutionError::Configuration(
//!             "Population size cannot be zero".to_string(),
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_size(10).is_ok());
//! assert!(check_size(0).is_err());
//! ```
//!
//! Using the `ResultExt` trait to wrap a foreign error inside a fitness function:
//!
//! ```rust
//! use evoloop::error::{Result, ResultExt};
//!
//! fn parse_score(raw: &str) -> Result<f64> {
//!     raw.parse::<f64>().context("Failed to parse score")
//! }
//!
//! assert_eq!(parse_score("1.5").unwrap(), 1.5);
//! assert!(parse_score("abc").is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use evoloop::error::{EvolutionError, OptionExt};
//!
//! fn first_score(scores: &[f64]) -> evoloop::error::Result<f64> {
//!     scores.first().copied().ok_or_else_evolution(|| EvolutionError::EmptyPopulation)
//! }
//!
//! assert!(first_score(&[]).is_err());
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Represents errors that can occur while running an evolutionary algorithm.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvolutionError {
    /// Error that occurs when producing offspring fails.
    #[error("Breeding error: {0}")]
    Breeding(String),

    /// Error that occurs when the evolution process cannot continue.
    #[error("Evolution error: {0}")]
    Evolution(String),

    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A selection strategy or mode name that the engine does not know.
    #[error("Unsupported strategy: {0}")]
    UnsupportedStrategy(String),

    /// The population must be filled to capacity for this operation.
    #[error("The population is not filled ({count}/{capacity})")]
    NotFilled { count: usize, capacity: usize },

    /// The population must be sorted for this operation.
    #[error("The population is not sorted")]
    NotSorted,

    /// A phenotype was added to a population that is already full.
    #[error("Population is full (capacity {0})")]
    CapacityExceeded(usize),

    /// The fitness of a phenotype was read before it was evaluated.
    #[error("Cannot read the fitness of an unevaluated phenotype")]
    UnevaluatedAccess,

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// A weighted sampler was built over no elements or over zero total weight.
    #[error("Empty sampling domain: {0}")]
    EmptyDomain(String),

    /// A weighted sampler received a negative or non-finite weight.
    #[error("Invalid sampling weight {weight} at index {index}")]
    InvalidWeight { index: usize, weight: f64 },

    /// Error raised by, or about the output of, a fitness function.
    #[error("Fitness calculation error: {0}")]
    FitnessCalculation(String),

    /// A snapshot does not fit the configuration of the engine restoring it.
    #[error("Incompatible snapshot: {0}")]
    IncompatibleSnapshot(String),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for evolutionary algorithm operations.
pub type Result<T> = std::result::Result<T, EvolutionError>;

/// Extension trait for Result to add context to errors.
///
/// This trait provides a convenient way to turn a foreign error into an
/// `EvolutionError`, typically inside a user supplied fitness function.
pub trait ResultExt<T, E> {
    /// Converts the error to an `EvolutionError::Other` prefixed with `context`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| EvolutionError::Other(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T>` using a closure to generate the error.
    fn ok_or_else_evolution<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> EvolutionError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_evolution<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> EvolutionError,
    {
        self.ok_or_else(err_fn)
    }
}

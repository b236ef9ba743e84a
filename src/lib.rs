//! A generational evolutionary algorithm engine.
//!
//! The caller supplies a [`Genotype`] (how candidates recombine and mutate)
//! and a [`Challenge`] (how candidates are scored and created). The
//! [`EvolutionLauncher`] runs the loop: evaluate, sort, select parents, breed,
//! select adults, repeat until a stop condition holds.
//!
//! Selection strategies draw from an alias-method sampler
//! ([`sampling::AliasSampler`]), fitness evaluation can fan out over rayon,
//! and a run can be captured in an [`EvolutionSnapshot`] and resumed later.
pub mod breeding;
pub mod error;
pub mod evolution;
pub mod genotype;
pub mod mode;
pub mod phenotype;
pub mod population;
pub mod rng;
pub mod sampling;
pub mod selection;

// Re-export commonly used types for convenience
pub use error::{EvolutionError, OptionExt, Result, ResultExt};
pub use evolution::{
    AbortHandle, Challenge, EvolutionLauncher, EvolutionLauncherBuilder, EvolutionObserver,
    EvolutionOptions, EvolutionResult, EvolutionSnapshot, TerminationReason,
};
pub use genotype::{CrossoverKind, Genotype, ListGenotype};
pub use mode::Mode;
pub use phenotype::Phenotype;
pub use population::Population;
pub use rng::{RandomNumberGenerator, RandomSource};

//! # EvolutionOptions
//!
//! The `EvolutionOptions` struct holds every setting of an evolutionary run:
//! population size, selection strategies, crossover and mutation rates, elitism,
//! termination limits and threading.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use evoloop::evolution::options::EvolutionOptions;
//! use evoloop::mode::Mode;
//! use evoloop::selection::{AdultSelectionKind, ParentSelectionKind};
//!
//! // Create options with a fluent builder; `build` validates them.
//! let options = EvolutionOptions::builder()
//!     .population_size(50)
//!     .overproduction_factor(2.0)
//!     .parent_selection(ParentSelectionKind::Rank)
//!     .adult_selection(AdultSelectionKind::Overproduction)
//!     .mode(Mode::Minimize)
//!     .target_fitness(0.0)
//!     .max_duration(Duration::from_secs(10))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(options.get_offspring_size(), 100);
//!
//! // Or start from the defaults.
//! let default_options = EvolutionOptions::default();
//! assert_eq!(default_options.get_population_size(), 100);
//! ```
use std::time::Duration;

use crate::error::{EvolutionError, Result};
use crate::genotype::CrossoverKind;
use crate::mode::Mode;
use crate::selection::rank::{DEFAULT_MAX_PROBABILITY, DEFAULT_MIN_PROBABILITY};
use crate::selection::{AdultSelectionKind, ParentSelectionKind};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionOptions {
    population_size: usize,
    /// Offspring per generation relative to the population size; values below
    /// 1 are treated as 1.
    overproduction_factor: f64,
    max_generations: usize,
    crossover: CrossoverKind,
    adult_selection: AdultSelectionKind,
    parent_selection: ParentSelectionKind,
    crossover_rate: f64,
    mutation_rate: f64,
    tournament_size: usize,
    tournament_probability: f64,
    elites: usize,
    reevaluate_elites: bool,
    rank_min_probability: f64,
    rank_max_probability: f64,
    calculate_statistics: bool,
    multi_threaded: bool,
    /// Size of the dedicated evaluation pool; 0 uses rayon's global pool.
    worker_threads: usize,
    target_fitness: Option<f64>,
    max_duration: Option<Duration>,
    mode: Mode,
}

impl EvolutionOptions {
    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_overproduction_factor(&self) -> f64 {
        self.overproduction_factor
    }

    /// Offspring bred per generation: `population_size * max(overproduction_factor, 1)`.
    pub fn get_offspring_size(&self) -> usize {
        (self.population_size as f64 * self.overproduction_factor.max(1.0)) as usize
    }

    pub fn get_max_generations(&self) -> usize {
        self.max_generations
    }

    pub fn get_crossover(&self) -> CrossoverKind {
        self.crossover
    }

    pub fn get_adult_selection(&self) -> AdultSelectionKind {
        self.adult_selection
    }

    pub fn get_parent_selection(&self) -> ParentSelectionKind {
        self.parent_selection
    }

    pub fn get_crossover_rate(&self) -> f64 {
        self.crossover_rate
    }

    pub fn get_mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn get_tournament_size(&self) -> usize {
        self.tournament_size
    }

    pub fn get_tournament_probability(&self) -> f64 {
        self.tournament_probability
    }

    pub fn get_elites(&self) -> usize {
        self.elites
    }

    pub fn get_reevaluate_elites(&self) -> bool {
        self.reevaluate_elites
    }

    pub fn get_rank_min_probability(&self) -> f64 {
        self.rank_min_probability
    }

    pub fn get_rank_max_probability(&self) -> f64 {
        self.rank_max_probability
    }

    pub fn get_calculate_statistics(&self) -> bool {
        self.calculate_statistics
    }

    pub fn get_multi_threaded(&self) -> bool {
        self.multi_threaded
    }

    pub fn get_worker_threads(&self) -> usize {
        self.worker_threads
    }

    pub fn get_target_fitness(&self) -> Option<f64> {
        self.target_fitness
    }

    pub fn get_max_duration(&self) -> Option<Duration> {
        self.max_duration
    }

    pub fn get_mode(&self) -> Mode {
        self.mode
    }

    pub fn set_population_size(&mut self, population_size: usize) {
        self.population_size = population_size;
    }

    pub fn set_overproduction_factor(&mut self, factor: f64) {
        self.overproduction_factor = factor;
    }

    pub fn set_max_generations(&mut self, max_generations: usize) {
        self.max_generations = max_generations;
    }

    pub fn set_crossover(&mut self, crossover: CrossoverKind) {
        self.crossover = crossover;
    }

    pub fn set_adult_selection(&mut self, kind: AdultSelectionKind) {
        self.adult_selection = kind;
    }

    pub fn set_parent_selection(&mut self, kind: ParentSelectionKind) {
        self.parent_selection = kind;
    }

    pub fn set_crossover_rate(&mut self, rate: f64) {
        self.crossover_rate = rate;
    }

    pub fn set_mutation_rate(&mut self, rate: f64) {
        self.mutation_rate = rate;
    }

    pub fn set_tournament_size(&mut self, size: usize) {
        self.tournament_size = size;
    }

    pub fn set_tournament_probability(&mut self, probability: f64) {
        self.tournament_probability = probability;
    }

    pub fn set_elites(&mut self, elites: usize) {
        self.elites = elites;
    }

    pub fn set_reevaluate_elites(&mut self, reevaluate: bool) {
        self.reevaluate_elites = reevaluate;
    }

    pub fn set_rank_probabilities(&mut self, min: f64, max: f64) {
        self.rank_min_probability = min;
        self.rank_max_probability = max;
    }

    pub fn set_calculate_statistics(&mut self, calculate: bool) {
        self.calculate_statistics = calculate;
    }

    pub fn set_multi_threaded(&mut self, multi_threaded: bool) {
        self.multi_threaded = multi_threaded;
    }

    pub fn set_worker_threads(&mut self, threads: usize) {
        self.worker_threads = threads;
    }

    pub fn set_target_fitness(&mut self, target: Option<f64>) {
        self.target_fitness = target;
    }

    pub fn set_max_duration(&mut self, duration: Option<Duration>) {
        self.max_duration = duration;
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Checks that the options describe a runnable configuration.
    ///
    /// # Errors
    ///
    /// `EvolutionError::Configuration` naming the first offending option.
    pub fn validate(&self) -> Result<()> {
        fn invalid(message: String) -> Result<()> {
            Err(EvolutionError::Configuration(message))
        }
        fn is_rate(value: f64) -> bool {
            (0.0..=1.0).contains(&value)
        }

        if self.population_size == 0 {
            return invalid("Population size cannot be zero".to_string());
        }
        if !self.overproduction_factor.is_finite() || self.overproduction_factor <= 0.0 {
            return invalid(format!(
                "Overproduction factor must be positive, but is {}",
                self.overproduction_factor
            ));
        }
        if self.max_generations == 0 {
            return invalid("Max generations cannot be zero".to_string());
        }
        if !is_rate(self.crossover_rate) {
            return invalid(format!(
                "Crossover rate must be in [0, 1], but is {}",
                self.crossover_rate
            ));
        }
        if !is_rate(self.mutation_rate) {
            return invalid(format!(
                "Mutation rate must be in [0, 1], but is {}",
                self.mutation_rate
            ));
        }
        if self.tournament_size < 2 {
            return invalid(format!(
                "Tournament size must be >= 2, but is {}",
                self.tournament_size
            ));
        }
        if !is_rate(self.tournament_probability) {
            return invalid(format!(
                "Tournament probability must be in [0, 1], but is {}",
                self.tournament_probability
            ));
        }
        if !self.rank_min_probability.is_finite()
            || !self.rank_max_probability.is_finite()
            || self.rank_min_probability < 0.0
            || self.rank_max_probability < self.rank_min_probability
            || self.rank_max_probability <= 0.0
        {
            return invalid(format!(
                "Invalid rank probabilities: min {} max {}",
                self.rank_min_probability, self.rank_max_probability
            ));
        }
        if self.elites >= self.population_size {
            return invalid(format!(
                "Elite count {} must be smaller than the population size {}",
                self.elites, self.population_size
            ));
        }
        if let Some(target) = self.target_fitness {
            if !target.is_finite() {
                return invalid(format!("Target fitness must be finite, but is {}", target));
            }
        }
        Ok(())
    }

    /// Returns a builder for creating an `EvolutionOptions` instance.
    pub fn builder() -> EvolutionOptionsBuilder {
        EvolutionOptionsBuilder::default()
    }
}

impl Default for EvolutionOptions {
    fn default() -> Self {
        Self {
            population_size: 100,
            overproduction_factor: 1.0,
            max_generations: usize::MAX,
            crossover: CrossoverKind::Uniform,
            adult_selection: AdultSelectionKind::GenerationalReplacement,
            parent_selection: ParentSelectionKind::Tournament,
            crossover_rate: 0.5,
            mutation_rate: 0.05,
            tournament_size: 2,
            tournament_probability: 1.0,
            elites: 1,
            reevaluate_elites: false,
            rank_min_probability: DEFAULT_MIN_PROBABILITY,
            rank_max_probability: DEFAULT_MAX_PROBABILITY,
            calculate_statistics: false,
            multi_threaded: false,
            worker_threads: 0,
            target_fitness: None,
            max_duration: None,
            mode: Mode::Maximize,
        }
    }
}

/// Builder for `EvolutionOptions`.
///
/// Unset fields keep their default value.
#[derive(Debug, Clone, Default)]
pub struct EvolutionOptionsBuilder {
    options: EvolutionOptions,
}

impl EvolutionOptionsBuilder {
    pub fn population_size(mut self, value: usize) -> Self {
        self.options.population_size = value;
        self
    }

    pub fn overproduction_factor(mut self, value: f64) -> Self {
        self.options.overproduction_factor = value;
        self
    }

    pub fn max_generations(mut self, value: usize) -> Self {
        self.options.max_generations = value;
        self
    }

    pub fn crossover(mut self, value: CrossoverKind) -> Self {
        self.options.crossover = value;
        self
    }

    pub fn adult_selection(mut self, value: AdultSelectionKind) -> Self {
        self.options.adult_selection = value;
        self
    }

    pub fn parent_selection(mut self, value: ParentSelectionKind) -> Self {
        self.options.parent_selection = value;
        self
    }

    pub fn crossover_rate(mut self, value: f64) -> Self {
        self.options.crossover_rate = value;
        self
    }

    pub fn mutation_rate(mut self, value: f64) -> Self {
        self.options.mutation_rate = value;
        self
    }

    pub fn tournament_size(mut self, value: usize) -> Self {
        self.options.tournament_size = value;
        self
    }

    pub fn tournament_probability(mut self, value: f64) -> Self {
        self.options.tournament_probability = value;
        self
    }

    pub fn elites(mut self, value: usize) -> Self {
        self.options.elites = value;
        self
    }

    pub fn reevaluate_elites(mut self, value: bool) -> Self {
        self.options.reevaluate_elites = value;
        self
    }

    pub fn rank_probabilities(mut self, min: f64, max: f64) -> Self {
        self.options.rank_min_probability = min;
        self.options.rank_max_probability = max;
        self
    }

    pub fn calculate_statistics(mut self, value: bool) -> Self {
        self.options.calculate_statistics = value;
        self
    }

    pub fn multi_threaded(mut self, value: bool) -> Self {
        self.options.multi_threaded = value;
        self
    }

    pub fn worker_threads(mut self, value: usize) -> Self {
        self.options.worker_threads = value;
        self
    }

    pub fn target_fitness(mut self, value: f64) -> Self {
        self.options.target_fitness = Some(value);
        self
    }

    pub fn max_duration(mut self, value: Duration) -> Self {
        self.options.max_duration = Some(value);
        self
    }

    pub fn mode(mut self, value: Mode) -> Self {
        self.options.mode = value;
        self
    }

    /// Builds and validates the `EvolutionOptions` instance.
    ///
    /// # Errors
    ///
    /// See [`EvolutionOptions::validate`].
    pub fn build(self) -> Result<EvolutionOptions> {
        self.options.validate()?;
        Ok(self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = EvolutionOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.get_population_size(), 100);
        assert_eq!(options.get_max_generations(), usize::MAX);
        assert_eq!(options.get_elites(), 1);
        assert_eq!(options.get_mode(), Mode::Maximize);
        assert_eq!(options.get_target_fitness(), None);
    }

    #[test]
    fn test_offspring_size() {
        let mut options = EvolutionOptions::default();
        options.set_population_size(40);
        options.set_overproduction_factor(2.5);
        assert_eq!(options.get_offspring_size(), 100);

        options.set_overproduction_factor(0.5);
        assert_eq!(options.get_offspring_size(), 40);
    }

    #[test]
    fn test_builder_sets_fields() {
        let options = EvolutionOptions::builder()
            .population_size(10)
            .elites(2)
            .tournament_size(4)
            .tournament_probability(0.7)
            .rank_probabilities(0.1, 1.9)
            .multi_threaded(true)
            .worker_threads(3)
            .max_duration(Duration::from_millis(500))
            .build()
            .unwrap();

        assert_eq!(options.get_population_size(), 10);
        assert_eq!(options.get_elites(), 2);
        assert_eq!(options.get_tournament_size(), 4);
        assert_eq!(options.get_tournament_probability(), 0.7);
        assert_eq!(options.get_rank_min_probability(), 0.1);
        assert_eq!(options.get_rank_max_probability(), 1.9);
        assert!(options.get_multi_threaded());
        assert_eq!(options.get_worker_threads(), 3);
        assert_eq!(options.get_max_duration(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        let cases = vec![
            EvolutionOptions::builder().population_size(0),
            EvolutionOptions::builder().overproduction_factor(f64::NAN),
            EvolutionOptions::builder().max_generations(0),
            EvolutionOptions::builder().crossover_rate(1.2),
            EvolutionOptions::builder().mutation_rate(-0.1),
            EvolutionOptions::builder().tournament_size(1),
            EvolutionOptions::builder().tournament_probability(2.0),
            EvolutionOptions::builder().rank_probabilities(1.0, 0.5),
            EvolutionOptions::builder().population_size(5).elites(5),
            EvolutionOptions::builder().target_fitness(f64::INFINITY),
        ];

        for builder in cases {
            assert!(matches!(
                builder.build(),
                Err(EvolutionError::Configuration(_))
            ));
        }
    }
}

//! # Population
//!
//! A fixed-capacity, ordered container of phenotypes. The population knows
//! whether it is filled (count equals capacity) and whether it is sorted, and
//! every structural change clears the sorted flag. After a successful
//! [`Population::sort`] the best phenotype for that mode is at index 0.
//!
//! ## Example
//!
//! ```rust
//! use evoloop::genotype::{BitFlip, ListGenotype};
//! use evoloop::mode::Mode;
//! use evoloop::phenotype::Phenotype;
//! use evoloop::population::Population;
//!
//! let mut population = Population::new(3);
//! for fitness in [0.2, 0.9, 0.5] {
//!     let genotype = ListGenotype::new(vec![true], BitFlip);
//!     population.add(Phenotype::with_fitness(genotype, fitness)).unwrap();
//! }
//!
//! population.sort(Mode::Maximize).unwrap();
//! assert_eq!(population[0].fitness().unwrap(), 0.9);
//! ```
pub mod statistics;

use std::ops::Index;

use rayon::prelude::*;

use crate::error::{EvolutionError, Result};
use crate::evolution::Challenge;
use crate::genotype::Genotype;
use crate::mode::Mode;
use crate::phenotype::Phenotype;
use crate::rng::RandomSource;

pub use statistics::{PopulationStatistics, RunningStatistics};

/// Maps a phenotype to a non-negative selection weight.
///
/// The fitness range is captured when the selector is created, so weights
/// handed out earlier are not affected by later changes to the population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilitySelector {
    mode: Mode,
    pivot: f64,
    tolerance: f64,
}

impl ProbabilitySelector {
    /// Selector over a known fitness range. Maximize uses the fitness as is;
    /// Minimize uses `(max + min) - fitness`.
    pub fn new(mode: Mode, max_fitness: f64, min_fitness: f64) -> Self {
        Self {
            mode,
            pivot: max_fitness + min_fitness,
            tolerance: 4.0 * f64::EPSILON * (max_fitness.abs() + min_fitness.abs()),
        }
    }

    pub fn weight_of(&self, fitness: f64) -> f64 {
        match self.mode {
            Mode::Maximize => fitness,
            Mode::Minimize => {
                let weight = self.pivot - fitness;
                // rounding can push the worst individual just below zero
                if weight < 0.0 && weight >= -self.tolerance {
                    0.0
                } else {
                    weight
                }
            }
        }
    }

    /// Weight of `phenotype`; `NaN` for an unevaluated phenotype, which the
    /// alias sampler rejects.
    pub fn weight<G: Genotype>(&self, phenotype: &Phenotype<G>) -> f64 {
        self.weight_of(phenotype.fitness_or_nan())
    }
}

/// A fixed-capacity ordered sequence of phenotypes.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Population<G> {
    slots: Vec<Phenotype<G>>,
    capacity: usize,
    sorted: Option<Mode>,
}

impl<G: Genotype> Population<G> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            sorted: None,
        }
    }

    /// Builds a population from existing phenotypes.
    ///
    /// # Errors
    ///
    /// `EvolutionError::CapacityExceeded` if there are more phenotypes than
    /// `capacity`.
    pub fn from_phenotypes(capacity: usize, phenotypes: Vec<Phenotype<G>>) -> Result<Self> {
        if phenotypes.len() > capacity {
            return Err(EvolutionError::CapacityExceeded(capacity));
        }
        let mut population = Self::new(capacity);
        population.slots.extend(phenotypes);
        Ok(population)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_filled(&self) -> bool {
        self.slots.len() == self.capacity
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted.is_some()
    }

    /// The mode of the last sort, if the population has not changed since.
    pub fn sorted_by(&self) -> Option<Mode> {
        self.sorted
    }

    pub fn get(&self, index: usize) -> Option<&Phenotype<G>> {
        self.slots.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Phenotype<G>> {
        self.slots.iter()
    }

    pub fn as_slice(&self) -> &[Phenotype<G>] {
        &self.slots
    }

    /// Removes and returns every phenotype, leaving the population empty.
    pub fn take_all(&mut self) -> Vec<Phenotype<G>> {
        self.sorted = None;
        std::mem::take(&mut self.slots)
    }

    /// Calls `factory` until the population is full.
    pub fn fill<F>(&mut self, mut factory: F)
    where
        F: FnMut() -> Phenotype<G>,
    {
        while self.slots.len() < self.capacity {
            self.slots.push(factory());
        }
        self.sorted = None;
    }

    /// Appends a phenotype.
    ///
    /// # Errors
    ///
    /// `EvolutionError::CapacityExceeded` if the population is already full.
    pub fn add(&mut self, phenotype: Phenotype<G>) -> Result<()> {
        if self.slots.len() >= self.capacity {
            return Err(EvolutionError::CapacityExceeded(self.capacity));
        }
        self.slots.push(phenotype);
        self.sorted = None;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.sorted = None;
    }

    /// Clears the population but keeps the `elites` best phenotypes under
    /// `mode`. Zero elites behaves like [`Population::clear`]; one elite is
    /// found with a linear scan; more elites sort the population first.
    ///
    /// # Errors
    ///
    /// `EvolutionError::NotFilled` if elites are requested from an unfilled
    /// population, `EvolutionError::UnevaluatedAccess` if any phenotype is
    /// unevaluated.
    pub fn clear_with_elites(&mut self, elites: usize, mode: Mode) -> Result<()> {
        if elites == 0 {
            self.clear();
            return Ok(());
        }

        self.ensure_filled()?;

        if elites == 1 {
            let best = self.best_index(mode)?;
            let elite = self.slots.swap_remove(best);
            self.clear();
            self.slots.push(elite);
            return Ok(());
        }

        self.sort(mode)?;
        self.slots.truncate(elites);
        self.sorted = None;
        Ok(())
    }

    /// Sorts best-first: descending fitness for `Mode::Maximize`, ascending
    /// for `Mode::Minimize`. The sort is stable.
    ///
    /// # Errors
    ///
    /// `EvolutionError::NotFilled` if the population is not full,
    /// `EvolutionError::UnevaluatedAccess` if any phenotype is unevaluated.
    pub fn sort(&mut self, mode: Mode) -> Result<()> {
        self.ensure_filled()?;
        self.ensure_evaluated()?;
        self.slots
            .sort_by(|a, b| mode.best_first(a.fitness_or_nan(), b.fitness_or_nan()));
        self.sorted = Some(mode);
        Ok(())
    }

    /// Index of the best phenotype under `mode`, found by a linear scan.
    /// The first of several equally good phenotypes wins.
    pub fn best_index(&self, mode: Mode) -> Result<usize> {
        if self.slots.is_empty() {
            return Err(EvolutionError::EmptyPopulation);
        }
        if self.sorted == Some(mode) {
            return Ok(0);
        }

        let mut best = 0;
        let mut best_fitness = self.slots[0].fitness()?;
        for (i, phenotype) in self.slots.iter().enumerate().skip(1) {
            let fitness = phenotype.fitness()?;
            if mode.is_better(fitness, best_fitness) {
                best = i;
                best_fitness = fitness;
            }
        }
        Ok(best)
    }

    /// Evaluates every unevaluated phenotype, or every phenotype when `force`
    /// is set, calling `on_each` after each evaluation. Returns the number of
    /// phenotypes evaluated.
    ///
    /// # Errors
    ///
    /// `EvolutionError::NotFilled` if the population is not full. The first
    /// error raised by the challenge stops the evaluation and is returned.
    pub fn evaluate<C, F>(&mut self, challenge: &C, force: bool, mut on_each: F) -> Result<usize>
    where
        C: Challenge<G> + ?Sized,
        F: FnMut(&Phenotype<G>),
    {
        self.ensure_filled()?;

        let mut evaluated = 0;
        for phenotype in self
            .slots
            .iter_mut()
            .filter(|p| force || !p.is_evaluated())
        {
            phenotype.evaluate(challenge)?;
            on_each(phenotype);
            evaluated += 1;
        }

        if evaluated > 0 {
            self.sorted = None;
        }
        Ok(evaluated)
    }

    /// Parallel counterpart of [`Population::evaluate`].
    ///
    /// One rayon task per pending phenotype; each task writes only the
    /// fitness cache of its own slot, and the call returns once every task
    /// has finished. Slot order is unchanged. `on_each` runs on the worker
    /// threads.
    pub fn evaluate_parallel<C, F>(&mut self, challenge: &C, force: bool, on_each: F) -> Result<usize>
    where
        C: Challenge<G> + ?Sized,
        F: Fn(&Phenotype<G>) + Send + Sync,
    {
        self.ensure_filled()?;

        let pending = self
            .slots
            .iter()
            .filter(|p| force || !p.is_evaluated())
            .count();

        self.slots
            .par_iter_mut()
            .filter(|p| force || !p.is_evaluated())
            .try_for_each(|phenotype| {
                phenotype.evaluate(challenge)?;
                on_each(phenotype);
                Ok::<(), EvolutionError>(())
            })?;

        if pending > 0 {
            self.sorted = None;
        }
        Ok(pending)
    }

    /// Fitness statistics over the whole population.
    ///
    /// # Errors
    ///
    /// `EvolutionError::NotFilled` if the population is not full,
    /// `EvolutionError::EmptyPopulation` for a zero-capacity population,
    /// `EvolutionError::UnevaluatedAccess` if any phenotype is unevaluated.
    pub fn statistics(&self) -> Result<PopulationStatistics> {
        Ok(self.running_statistics()?.summary())
    }

    pub(crate) fn running_statistics(&self) -> Result<RunningStatistics> {
        self.ensure_filled()?;
        if self.slots.is_empty() {
            return Err(EvolutionError::EmptyPopulation);
        }

        let mut stats = RunningStatistics::new();
        for phenotype in &self.slots {
            stats.push(phenotype.fitness()?);
        }
        Ok(stats)
    }

    /// Creates a fitness-proportionate weight function for `mode`.
    ///
    /// The returned selector does not follow later changes to the population;
    /// create a new one after the population changes.
    pub fn probability_selector(&self, mode: Mode) -> Result<ProbabilitySelector> {
        let stats = self.running_statistics()?;
        Ok(ProbabilitySelector::new(mode, stats.max(), stats.min()))
    }

    /// Index of a uniformly drawn phenotype.
    pub fn draw_random_index(&self, rng: &mut dyn RandomSource) -> Result<usize> {
        self.ensure_filled()?;
        if self.slots.is_empty() {
            return Err(EvolutionError::EmptyPopulation);
        }
        Ok(rng.next_below(self.slots.len()))
    }

    /// A uniformly drawn phenotype.
    ///
    /// # Errors
    ///
    /// `EvolutionError::NotFilled` if the population is not full.
    pub fn draw_random(&self, rng: &mut dyn RandomSource) -> Result<&Phenotype<G>> {
        let index = self.draw_random_index(rng)?;
        Ok(&self.slots[index])
    }

    pub(crate) fn ensure_filled(&self) -> Result<()> {
        if !self.is_filled() {
            return Err(EvolutionError::NotFilled {
                count: self.slots.len(),
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    fn ensure_evaluated(&self) -> Result<()> {
        if self.slots.iter().any(|p| !p.is_evaluated()) {
            return Err(EvolutionError::UnevaluatedAccess);
        }
        Ok(())
    }
}

impl<G> Index<usize> for Population<G> {
    type Output = Phenotype<G>;

    fn index(&self, index: usize) -> &Phenotype<G> {
        &self.slots[index]
    }
}

impl<'a, G> IntoIterator for &'a Population<G> {
    type Item = &'a Phenotype<G>;
    type IntoIter = std::slice::Iter<'a, Phenotype<G>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

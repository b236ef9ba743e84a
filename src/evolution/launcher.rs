use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::{
    challenge::Challenge,
    observer::{AbortHandle, EvolutionObserver},
    options::EvolutionOptions,
    snapshot::EvolutionSnapshot,
    termination::{check_termination, TerminationReason},
};
use crate::{
    breeding::{BreedStrategy, OrdinaryStrategy},
    error::{EvolutionError, OptionExt, Result},
    genotype::Genotype,
    phenotype::Phenotype,
    population::{Population, PopulationStatistics},
    rng::{RandomNumberGenerator, RandomSource},
    selection::{adult_selection_for, parent_selection_for, AdultSelection, ParentSelection},
};

/// Represents the result of an evolution.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionResult<G> {
    /// The best phenotype found over the whole run.
    pub winner: Phenotype<G>,
    /// The fitness of the winner.
    pub score: f64,
    /// The population at the moment the run stopped, sorted best-first.
    pub population: Population<G>,
    /// Index of the last generation.
    pub generations: usize,
    pub termination: TerminationReason,
    /// Accumulated runtime, including time carried over from a snapshot.
    pub runtime: Duration,
}

/// Lifecycle of a launcher.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    Terminated(TerminationReason),
    /// The last call to `evolve` returned an error. The population of the
    /// last completed generation is kept, so calling `evolve` again retries
    /// from there.
    Failed,
}

/// Drives the generational loop.
///
/// Each generation evaluates the population, sorts it, tracks the best
/// phenotype, optionally records statistics and then checks the stop
/// conditions. If the run continues, the configured number of elites is set
/// aside, parents are selected, offspring are bred and evaluated, adult
/// selection fills the next population and the elites are put back.
///
/// Only fitness evaluation runs in parallel (when `multi_threaded` is set).
/// Selection and breeding consume the random source sequentially on the
/// calling thread, so a seeded single-threaded run is reproducible.
pub struct EvolutionLauncher<G, C, R = RandomNumberGenerator>
where
    G: Genotype,
    C: Challenge<G>,
    R: RandomSource,
{
    options: EvolutionOptions,
    challenge: C,
    rng: R,
    parent_selection: Box<dyn ParentSelection<G>>,
    adult_selection: Box<dyn AdultSelection<G>>,
    breed_strategy: Box<dyn BreedStrategy<G>>,
    observers: Vec<Box<dyn EvolutionObserver<G>>>,
    pool: Option<rayon::ThreadPool>,
    abort: AbortHandle,
    population: Option<Population<G>>,
    generation: usize,
    best: Option<Phenotype<G>>,
    generation_best: Option<Phenotype<G>>,
    statistics: Vec<PopulationStatistics>,
    runtime: Duration,
    state: RunState,
}

impl<G, C, R> EvolutionLauncher<G, C, R>
where
    G: Genotype,
    C: Challenge<G>,
    R: RandomSource,
{
    /// Creates a launcher with the strategies named in `options`.
    ///
    /// # Errors
    ///
    /// `EvolutionError::Configuration` if the options are invalid or the
    /// evaluation pool cannot be created.
    pub fn new(options: EvolutionOptions, challenge: C, rng: R) -> Result<Self> {
        options.validate()?;
        let parent_selection = parent_selection_for(&options)?;
        let adult_selection = adult_selection_for(&options);
        Self::with_strategies(
            options,
            challenge,
            rng,
            parent_selection,
            adult_selection,
            Box::new(OrdinaryStrategy::new()),
        )
    }

    pub(crate) fn with_strategies(
        options: EvolutionOptions,
        challenge: C,
        rng: R,
        parent_selection: Box<dyn ParentSelection<G>>,
        adult_selection: Box<dyn AdultSelection<G>>,
        breed_strategy: Box<dyn BreedStrategy<G>>,
    ) -> Result<Self> {
        options.validate()?;

        let pool = if options.get_multi_threaded() && options.get_worker_threads() > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(options.get_worker_threads())
                .build()
                .map_err(|e| {
                    EvolutionError::Configuration(format!("Failed to build evaluation pool: {}", e))
                })?;
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            options,
            challenge,
            rng,
            parent_selection,
            adult_selection,
            breed_strategy,
            observers: Vec::new(),
            pool,
            abort: AbortHandle::new(),
            population: None,
            generation: 0,
            best: None,
            generation_best: None,
            statistics: Vec::new(),
            runtime: Duration::ZERO,
            state: RunState::NotStarted,
        })
    }

    pub fn options(&self) -> &EvolutionOptions {
        &self.options
    }

    pub fn challenge(&self) -> &C {
        &self.challenge
    }

    /// The current population, if the run has started or was seeded.
    pub fn population(&self) -> Option<&Population<G>> {
        self.population.as_ref()
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    /// The best phenotype seen so far. Ties never replace the incumbent.
    pub fn best(&self) -> Option<&Phenotype<G>> {
        self.best.as_ref()
    }

    /// The best phenotype of the latest generation.
    pub fn generation_best(&self) -> Option<&Phenotype<G>> {
        self.generation_best.as_ref()
    }

    /// One entry per generation when statistics are enabled.
    pub fn statistics(&self) -> &[PopulationStatistics] {
        &self.statistics
    }

    /// Runtime accumulated over all calls to `evolve`, including the runtime
    /// restored from a snapshot.
    pub fn runtime(&self) -> Duration {
        self.runtime
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// A handle that stops the run at the end of the current generation.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub fn abort(&self) {
        self.abort.abort();
    }

    pub fn add_observer(&mut self, observer: Box<dyn EvolutionObserver<G>>) {
        self.observers.push(observer);
    }

    pub(crate) fn set_abort_handle(&mut self, abort: AbortHandle) {
        self.abort = abort;
    }

    /// Seeds the run with a possibly partial population. Missing slots are
    /// filled with random phenotypes when the run starts.
    ///
    /// # Errors
    ///
    /// `EvolutionError::Configuration` if the capacity differs from the
    /// configured population size.
    pub fn set_initial_population(&mut self, population: Population<G>) -> Result<()> {
        if population.capacity() != self.options.get_population_size() {
            return Err(EvolutionError::Configuration(format!(
                "Initial population has capacity {}, expected {}",
                population.capacity(),
                self.options.get_population_size()
            )));
        }
        self.population = Some(population);
        self.generation = 0;
        self.best = None;
        self.generation_best = None;
        Ok(())
    }

    /// Runs generations until a stop condition is met.
    ///
    /// A fresh launcher starts at generation 1 with a random (or seeded)
    /// population. A launcher that already ran, or was restored from a
    /// snapshot, continues by breeding the next generation from its current
    /// population.
    ///
    /// # Errors
    ///
    /// Errors from the fitness function abort the run and are returned
    /// unchanged; so are precondition violations raised by the strategies.
    pub fn evolve(&mut self) -> Result<EvolutionResult<G>> {
        let started = Instant::now();
        let carried = self.runtime;
        self.state = RunState::Running;

        let mut population = match self.population.take() {
            Some(population) => population,
            None => Population::new(self.options.get_population_size()),
        };

        let outcome = self.run(&mut population, started, carried);
        self.runtime = carried + started.elapsed();
        self.population = Some(population);

        match outcome {
            Ok(reason) => {
                self.state = RunState::Terminated(reason);
                self.result(reason)
            }
            Err(e) => {
                self.state = RunState::Failed;
                Err(e)
            }
        }
    }

    fn run(
        &mut self,
        population: &mut Population<G>,
        started: Instant,
        carried: Duration,
    ) -> Result<TerminationReason> {
        let mode = self.options.get_mode();
        let resuming = self.generation > 0 && self.best.is_some() && population.is_filled();

        if resuming {
            if self.abort.is_aborted() {
                self.notify_termination(TerminationReason::Aborted);
                return Ok(TerminationReason::Aborted);
            }
            info!(generation = self.generation, "Resuming evolution");
        } else {
            let challenge = &self.challenge;
            let rng = &mut self.rng;
            population.fill(|| Phenotype::new(challenge.random_genotype(rng)));
            self.generation = 1;
            self.best = None;
            self.statistics.clear();
            info!(
                population_size = population.capacity(),
                offspring_size = self.options.get_offspring_size(),
                "Starting evolution"
            );
        }

        let mut breed_first = resuming;
        loop {
            if breed_first {
                self.next_generation(population)?;
                self.generation += 1;
            }
            breed_first = true;

            self.evaluate(population)?;
            population.sort(mode)?;

            let generation_best = population
                .get(0)
                .cloned()
                .ok_or_else_evolution(|| EvolutionError::EmptyPopulation)?;
            let best_fitness = generation_best.fitness()?;
            self.track_best(&generation_best, best_fitness)?;
            self.generation_best = Some(generation_best);

            if self.options.get_calculate_statistics() {
                let stats = population.statistics()?;
                for observer in &self.observers {
                    observer.on_statistics(&stats);
                }
                self.statistics.push(stats);
            }

            for observer in &self.observers {
                observer.on_new_generation(self.generation);
            }

            let overall_best = match &self.best {
                Some(best) => best.fitness()?,
                None => best_fitness,
            };
            debug!(
                generation = self.generation,
                generation_best = best_fitness,
                best = overall_best,
                "Generation complete"
            );

            let runtime = carried + started.elapsed();
            if let Some(reason) = check_termination(
                &self.options,
                self.abort.is_aborted(),
                runtime,
                self.generation,
                overall_best,
            ) {
                info!(
                    generation = self.generation,
                    best = overall_best,
                    reason = %reason,
                    runtime_ms = runtime.as_millis() as u64,
                    "Evolution terminated"
                );
                self.notify_termination(reason);
                return Ok(reason);
            }
        }
    }

    fn track_best(&mut self, candidate: &Phenotype<G>, fitness: f64) -> Result<()> {
        let improved = match &self.best {
            None => true,
            Some(best) => self.options.get_mode().is_better(fitness, best.fitness()?),
        };

        if improved {
            info!(generation = self.generation, fitness, "New best phenotype");
            for observer in &self.observers {
                observer.on_new_best(candidate, self.generation);
            }
            self.best = Some(candidate.clone());
        }
        Ok(())
    }

    /// Replaces `population` with the next generation. On error
    /// `population` is left as it was.
    fn next_generation(&mut self, population: &mut Population<G>) -> Result<()> {
        let mode = self.options.get_mode();
        let elite_count = self.options.get_elites();
        let offspring_size = self.options.get_offspring_size();

        self.evaluate(population)?;
        if population.sorted_by() != Some(mode) {
            population.sort(mode)?;
        }

        let elites: Vec<Phenotype<G>> = population.iter().take(elite_count).cloned().collect();
        let adults = self.options.get_population_size() - elites.len();

        let pairs = self.parent_selection.select_parents(
            population,
            offspring_size - elites.len(),
            mode,
            &mut self.rng,
        )?;

        let children = self
            .breed_strategy
            .breed(population, &pairs, &self.options, &mut self.rng)?;
        if children.len() != pairs.len() {
            return Err(EvolutionError::Breeding(format!(
                "Expected {} offspring, got {}",
                pairs.len(),
                children.len()
            )));
        }

        let mut offspring = Population::from_phenotypes(pairs.len(), children)?;
        self.evaluate(&mut offspring)?;

        // `population` stays intact until the next generation is complete
        let mut next = population.clone();
        self.adult_selection
            .select_adults(&mut offspring, &mut next, adults, mode, &mut self.rng)?;

        let reevaluate = self.options.get_reevaluate_elites();
        for mut elite in elites {
            if reevaluate {
                elite.evaluate(&self.challenge)?;
                for observer in &self.observers {
                    observer.on_phenotype_evaluated(&elite);
                }
            }
            next.add(elite)?;
        }

        *population = next;
        Ok(())
    }

    /// Evaluates every unevaluated phenotype of `population`, fanning out to
    /// rayon when multi-threaded evaluation is enabled.
    fn evaluate(&self, population: &mut Population<G>) -> Result<usize> {
        let challenge = &self.challenge;
        let observers = &self.observers;
        let notify = |phenotype: &Phenotype<G>| {
            for observer in observers {
                observer.on_phenotype_evaluated(phenotype);
            }
        };

        if !self.options.get_multi_threaded() {
            return population.evaluate(challenge, false, notify);
        }

        match &self.pool {
            Some(pool) => pool.install(|| population.evaluate_parallel(challenge, false, notify)),
            None => population.evaluate_parallel(challenge, false, notify),
        }
    }

    fn notify_termination(&self, reason: TerminationReason) {
        for observer in &self.observers {
            observer.on_termination(reason);
        }
    }

    fn result(&self, termination: TerminationReason) -> Result<EvolutionResult<G>> {
        let winner = self
            .best
            .clone()
            .ok_or_else_evolution(|| EvolutionError::Evolution("No phenotype was evaluated".to_string()))?;
        let population = self
            .population
            .clone()
            .ok_or_else_evolution(|| EvolutionError::EmptyPopulation)?;

        Ok(EvolutionResult {
            score: winner.fitness()?,
            winner,
            population,
            generations: self.generation,
            termination,
            runtime: self.runtime,
        })
    }
}

impl<G, C, R> EvolutionLauncher<G, C, R>
where
    G: Genotype,
    C: Challenge<G>,
    R: RandomSource + Clone,
{
    /// Captures the state needed to resume the run later.
    ///
    /// # Errors
    ///
    /// `EvolutionError::Evolution` if the run has not produced a population yet.
    pub fn snapshot(&self) -> Result<EvolutionSnapshot<G, R>> {
        let population = self.population.clone().ok_or_else_evolution(|| {
            EvolutionError::Evolution("Nothing to snapshot: the run has not started".to_string())
        })?;

        Ok(EvolutionSnapshot {
            options: self.options.clone(),
            population,
            generation: self.generation,
            runtime: self.runtime,
            rng: self.rng.clone(),
            statistics: self.statistics.clone(),
            best: self.best.clone(),
        })
    }

    /// Replaces the run state with `snapshot`. The launcher keeps its own
    /// options, so limits such as the generation count may differ from the
    /// snapshot's.
    ///
    /// # Errors
    ///
    /// `EvolutionError::IncompatibleSnapshot` if the population sizes differ.
    pub fn restore(&mut self, snapshot: EvolutionSnapshot<G, R>) -> Result<()> {
        snapshot.check_compatible(&self.options)?;

        self.population = Some(snapshot.population);
        self.generation = snapshot.generation;
        self.runtime = snapshot.runtime;
        self.rng = snapshot.rng;
        self.statistics = snapshot.statistics;
        self.best = snapshot.best;
        self.generation_best = None;
        self.state = RunState::NotStarted;
        Ok(())
    }
}

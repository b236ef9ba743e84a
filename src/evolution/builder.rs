use crate::{
    breeding::{BreedStrategy, OrdinaryStrategy},
    error::{EvolutionError, Result},
    genotype::Genotype,
    population::Population,
    rng::{RandomNumberGenerator, RandomSource},
    selection::{adult_selection_for, parent_selection_for, AdultSelection, ParentSelection},
};

use super::{
    AbortHandle, Challenge, EvolutionLauncher, EvolutionObserver, EvolutionOptions,
    EvolutionSnapshot,
};

/// Fluent construction of an [`EvolutionLauncher`].
///
/// Only the challenge is mandatory. Options default to
/// `EvolutionOptions::default()` (or to the options stored in a snapshot),
/// the random source defaults to `R::default()`, and strategies not given
/// explicitly are created from the options.
///
/// # Examples
///
/// ```
/// use evoloop::error::Result;
/// use evoloop::evolution::{Challenge, EvolutionLauncherBuilder, EvolutionOptions};
/// use evoloop::genotype::{BitFlip, ListGenotype};
/// use evoloop::rng::{RandomNumberGenerator, RandomSource};
///
/// type Bits = ListGenotype<bool, BitFlip>;
///
/// struct OneMax;
///
/// impl Challenge<Bits> for OneMax {
///     fn score(&self, genotype: &Bits) -> Result<f64> {
///         Ok(genotype.genes().iter().filter(|&&b| b).count() as f64)
///     }
///
///     fn random_genotype(&self, rng: &mut dyn RandomSource) -> Bits {
///         ListGenotype::random(10, BitFlip, || rng.next_bool())
///     }
/// }
///
/// let options = EvolutionOptions::builder()
///     .population_size(20)
///     .max_generations(50)
///     .target_fitness(10.0)
///     .build()
///     .unwrap();
///
/// let mut launcher = EvolutionLauncherBuilder::<Bits, OneMax>::new()
///     .with_options(options)
///     .with_challenge(OneMax)
///     .with_rng(RandomNumberGenerator::from_seed(1))
///     .build()
///     .unwrap();
///
/// let result = launcher.evolve().unwrap();
/// assert!(result.score <= 10.0);
/// ```
pub struct EvolutionLauncherBuilder<G, C, R = RandomNumberGenerator>
where
    G: Genotype,
    C: Challenge<G>,
    R: RandomSource,
{
    options: Option<EvolutionOptions>,
    challenge: Option<C>,
    rng: Option<R>,
    parent_selection: Option<Box<dyn ParentSelection<G>>>,
    adult_selection: Option<Box<dyn AdultSelection<G>>>,
    breed_strategy: Option<Box<dyn BreedStrategy<G>>>,
    initial_population: Option<Population<G>>,
    snapshot: Option<EvolutionSnapshot<G, R>>,
    observers: Vec<Box<dyn EvolutionObserver<G>>>,
    abort: Option<AbortHandle>,
}

impl<G, C, R> EvolutionLauncherBuilder<G, C, R>
where
    G: Genotype,
    C: Challenge<G>,
    R: RandomSource + Clone + Default,
{
    pub fn new() -> Self {
        Self {
            options: None,
            challenge: None,
            rng: None,
            parent_selection: None,
            adult_selection: None,
            breed_strategy: None,
            initial_population: None,
            snapshot: None,
            observers: Vec::new(),
            abort: None,
        }
    }

    pub fn with_options(mut self, options: EvolutionOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_challenge(mut self, challenge: C) -> Self {
        self.challenge = Some(challenge);
        self
    }

    pub fn with_rng(mut self, rng: R) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Uses `strategy` instead of the one named by the options.
    pub fn with_parent_selection<S>(mut self, strategy: S) -> Self
    where
        S: ParentSelection<G> + 'static,
    {
        self.parent_selection = Some(Box::new(strategy));
        self
    }

    /// Uses `strategy` instead of the one named by the options.
    pub fn with_adult_selection<S>(mut self, strategy: S) -> Self
    where
        S: AdultSelection<G> + 'static,
    {
        self.adult_selection = Some(Box::new(strategy));
        self
    }

    pub fn with_breed_strategy<B>(mut self, strategy: B) -> Self
    where
        B: BreedStrategy<G> + 'static,
    {
        self.breed_strategy = Some(Box::new(strategy));
        self
    }

    /// Seeds the first generation. The population may be partially filled.
    pub fn with_initial_population(mut self, population: Population<G>) -> Self {
        self.initial_population = Some(population);
        self
    }

    /// Resumes from `snapshot`; takes precedence over an initial population.
    pub fn with_snapshot(mut self, snapshot: EvolutionSnapshot<G, R>) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn with_observer<O>(mut self, observer: O) -> Self
    where
        O: EvolutionObserver<G> + 'static,
    {
        self.observers.push(Box::new(observer));
        self
    }

    /// Shares an existing abort handle with the launcher.
    pub fn with_abort_handle(mut self, abort: AbortHandle) -> Self {
        self.abort = Some(abort);
        self
    }

    /// Builds the launcher.
    ///
    /// # Errors
    ///
    /// `EvolutionError::Configuration` if no challenge was given or the
    /// options are invalid, `EvolutionError::IncompatibleSnapshot` if the
    /// snapshot does not fit the options.
    pub fn build(self) -> Result<EvolutionLauncher<G, C, R>> {
        let challenge = self
            .challenge
            .ok_or_else(|| EvolutionError::Configuration("Challenge not specified".to_string()))?;

        let options = match (self.options, &self.snapshot) {
            (Some(options), _) => options,
            (None, Some(snapshot)) => snapshot.options.clone(),
            (None, None) => EvolutionOptions::default(),
        };
        options.validate()?;

        let parent_selection = match self.parent_selection {
            Some(strategy) => strategy,
            None => parent_selection_for(&options)?,
        };
        let adult_selection = self
            .adult_selection
            .unwrap_or_else(|| adult_selection_for(&options));
        let breed_strategy = self
            .breed_strategy
            .unwrap_or_else(|| Box::new(OrdinaryStrategy::new()));

        let mut launcher = EvolutionLauncher::with_strategies(
            options,
            challenge,
            self.rng.unwrap_or_default(),
            parent_selection,
            adult_selection,
            breed_strategy,
        )?;

        for observer in self.observers {
            launcher.add_observer(observer);
        }
        if let Some(abort) = self.abort {
            launcher.set_abort_handle(abort);
        }

        if let Some(snapshot) = self.snapshot {
            launcher.restore(snapshot)?;
        } else if let Some(population) = self.initial_population {
            launcher.set_initial_population(population)?;
        }

        Ok(launcher)
    }
}

impl<G, C, R> Default for EvolutionLauncherBuilder<G, C, R>
where
    G: Genotype,
    C: Challenge<G>,
    R: RandomSource + Clone + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<G, C, R> EvolutionLauncher<G, C, R>
where
    G: Genotype,
    C: Challenge<G>,
    R: RandomSource + Clone + Default,
{
    /// Returns a builder for creating an `EvolutionLauncher` instance.
    pub fn builder() -> EvolutionLauncherBuilder<G, C, R> {
        EvolutionLauncherBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genotype::{IntegerRange, ListGenotype};
    use crate::mode::Mode;
    use crate::selection::{GenerationalMixing, RankSelection};

    type Numbers = ListGenotype<i64, IntegerRange>;

    const RANGE: IntegerRange = IntegerRange { min: 0, max: 10 };

    struct Sum;

    impl Challenge<Numbers> for Sum {
        fn score(&self, genotype: &Numbers) -> Result<f64> {
            Ok(genotype.genes().iter().sum::<i64>() as f64)
        }

        fn random_genotype(&self, rng: &mut dyn RandomSource) -> Numbers {
            ListGenotype::random(4, RANGE, || rng.next_in_range(RANGE.min, RANGE.max))
        }
    }

    #[test]
    fn test_missing_challenge() {
        let result = EvolutionLauncherBuilder::<Numbers, Sum, RandomNumberGenerator>::new().build();
        assert!(matches!(result, Err(EvolutionError::Configuration(_))));
    }

    #[test]
    fn test_invalid_options() {
        let mut options = EvolutionOptions::default();
        options.set_population_size(0);
        let result = EvolutionLauncherBuilder::<Numbers, Sum, RandomNumberGenerator>::new()
            .with_options(options)
            .with_challenge(Sum)
            .build();
        assert!(matches!(result, Err(EvolutionError::Configuration(_))));
    }

    #[test]
    fn test_custom_strategies() {
        let options = EvolutionOptions::builder()
            .population_size(10)
            .max_generations(20)
            .mode(Mode::Minimize)
            .build()
            .unwrap();

        let mut launcher = EvolutionLauncher::<Numbers, Sum, RandomNumberGenerator>::builder()
            .with_options(options)
            .with_challenge(Sum)
            .with_rng(RandomNumberGenerator::from_seed(3))
            .with_parent_selection(RankSelection::default())
            .with_adult_selection(GenerationalMixing)
            .build()
            .unwrap();

        let result = launcher.evolve().unwrap();
        assert_eq!(result.generations, 20);
        assert!(result.score <= result.population[result.population.len() - 1].fitness().unwrap());
    }

    #[test]
    fn test_initial_population_capacity_is_checked() {
        let options = EvolutionOptions::builder().population_size(4).build().unwrap();
        let result = EvolutionLauncherBuilder::<Numbers, Sum, RandomNumberGenerator>::new()
            .with_options(options)
            .with_challenge(Sum)
            .with_initial_population(Population::new(3))
            .build();
        assert!(result.is_err());
    }
}

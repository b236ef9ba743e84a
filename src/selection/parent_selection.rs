use std::fmt::{self, Debug};
use std::str::FromStr;

use crate::error::{EvolutionError, Result};
use crate::evolution::options::EvolutionOptions;
use crate::genotype::Genotype;
use crate::mode::Mode;
use crate::population::Population;
use crate::rng::RandomSource;
use crate::selection::{
    FitnessProportionateSelection, RankSelection, SigmaScalingSelection, TournamentSelection,
};

/// Two population indices chosen to breed together.
pub type ParentPair = (usize, usize);

/// Chooses parents from a population.
///
/// Implementations are stateless with respect to the population: every call
/// looks only at the population it is handed and draws from `rng`.
///
/// # Examples
///
/// ```
/// use evoloop::genotype::{BitFlip, ListGenotype};
/// use evoloop::mode::Mode;
/// use evoloop::phenotype::Phenotype;
/// use evoloop::population::Population;
/// use evoloop::rng::RandomNumberGenerator;
/// use evoloop::selection::{ParentSelection, TournamentSelection};
///
/// let mut population = Population::new(4);
/// for fitness in [1.0, 4.0, 2.0, 3.0] {
///     let genotype = ListGenotype::new(vec![true], BitFlip);
///     population.add(Phenotype::with_fitness(genotype, fitness)).unwrap();
/// }
/// population.sort(Mode::Maximize).unwrap();
///
/// let selection = TournamentSelection::new(3, 1.0).unwrap();
/// let mut rng = RandomNumberGenerator::from_seed(9);
/// let pairs = selection
///     .select_parents(&population, 10, Mode::Maximize, &mut rng)
///     .unwrap();
///
/// assert_eq!(pairs.len(), 10);
/// assert!(pairs.iter().all(|&(a, b)| a < 4 && b < 4));
/// ```
pub trait ParentSelection<G: Genotype>: Debug + Send + Sync {
    /// Returns exactly `n` parent pairs, drawn with replacement.
    ///
    /// # Errors
    ///
    /// Strategies that rank individuals fail with `EvolutionError::NotSorted`
    /// unless the population was sorted under `mode`. All strategies fail
    /// with `EvolutionError::NotFilled` on an unfilled population.
    fn select_parents(
        &self,
        population: &Population<G>,
        n: usize,
        mode: Mode,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<ParentPair>>;
}

/// The built-in parent selection strategies.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParentSelectionKind {
    #[default]
    Tournament,
    Rank,
    SigmaScaling,
    FitnessProportionate,
}

impl fmt::Display for ParentSelectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParentSelectionKind::Tournament => "Tournament",
            ParentSelectionKind::Rank => "Rank",
            ParentSelectionKind::SigmaScaling => "SigmaScaling",
            ParentSelectionKind::FitnessProportionate => "FitnessProportionate",
        };
        f.write_str(name)
    }
}

impl FromStr for ParentSelectionKind {
    type Err = EvolutionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tournament" => Ok(ParentSelectionKind::Tournament),
            "rank" => Ok(ParentSelectionKind::Rank),
            "sigmascaling" | "sigma" => Ok(ParentSelectionKind::SigmaScaling),
            "fitnessproportionate" | "proportionate" => {
                Ok(ParentSelectionKind::FitnessProportionate)
            }
            _ => Err(EvolutionError::UnsupportedStrategy(format!(
                "unknown parent selection '{}'",
                s
            ))),
        }
    }
}

/// Builds the parent selection strategy configured in `options`.
pub fn parent_selection_for<G: Genotype>(
    options: &EvolutionOptions,
) -> Result<Box<dyn ParentSelection<G>>> {
    let strategy: Box<dyn ParentSelection<G>> = match options.get_parent_selection() {
        ParentSelectionKind::Tournament => Box::new(TournamentSelection::new(
            options.get_tournament_size(),
            options.get_tournament_probability(),
        )?),
        ParentSelectionKind::Rank => Box::new(RankSelection::new(
            options.get_rank_min_probability(),
            options.get_rank_max_probability(),
        )?),
        ParentSelectionKind::SigmaScaling => Box::new(SigmaScalingSelection::new()),
        ParentSelectionKind::FitnessProportionate => Box::new(FitnessProportionateSelection),
    };
    Ok(strategy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!(
            "Tournament".parse::<ParentSelectionKind>().unwrap(),
            ParentSelectionKind::Tournament
        );
        assert_eq!(
            "sigmaScaling".parse::<ParentSelectionKind>().unwrap(),
            ParentSelectionKind::SigmaScaling
        );
        assert_eq!(
            "FitnessProportionate".parse::<ParentSelectionKind>().unwrap(),
            ParentSelectionKind::FitnessProportionate
        );
        assert!(matches!(
            "roulette".parse::<ParentSelectionKind>(),
            Err(EvolutionError::UnsupportedStrategy(_))
        ));
    }

    #[test]
    fn test_display_round_trips() {
        for kind in [
            ParentSelectionKind::Tournament,
            ParentSelectionKind::Rank,
            ParentSelectionKind::SigmaScaling,
            ParentSelectionKind::FitnessProportionate,
        ] {
            assert_eq!(kind.to_string().parse::<ParentSelectionKind>().unwrap(), kind);
        }
    }
}

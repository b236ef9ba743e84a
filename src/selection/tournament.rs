use tracing::instrument;

use crate::error::{EvolutionError, Result};
use crate::genotype::Genotype;
use crate::mode::Mode;
use crate::population::Population;
use crate::rng::RandomSource;
use crate::selection::parent_selection::{ParentPair, ParentSelection};

/// A selection strategy that emulates tournament selection on a sorted
/// population.
///
/// A real tournament draws `tournament_size` individuals uniformly and keeps
/// the best. On a population sorted best-first the winner is simply the
/// smallest drawn index, whose distribution has the closed-form inverse
/// `floor(size * (1 - u^(1 / tournament_size)))`. One uniform draw therefore
/// replaces the whole pool. With probability `1 - probability` the tournament
/// is skipped and a uniformly random individual is picked instead.
///
/// Tournaments of size 2 draw the two contestants directly.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TournamentSelection {
    tournament_size: usize,
    probability: f64,
}

impl TournamentSelection {
    /// Creates a tournament selection strategy.
    ///
    /// # Errors
    ///
    /// `EvolutionError::Configuration` if `tournament_size < 2` or
    /// `probability` is outside `[0, 1]`.
    pub fn new(tournament_size: usize, probability: f64) -> Result<Self> {
        if tournament_size < 2 {
            return Err(EvolutionError::Configuration(format!(
                "Tournament size must be >= 2, but is {}",
                tournament_size
            )));
        }
        if !(0.0..=1.0).contains(&probability) {
            return Err(EvolutionError::Configuration(format!(
                "Tournament probability must be in [0, 1], but is {}",
                probability
            )));
        }
        Ok(Self {
            tournament_size,
            probability,
        })
    }

    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    fn select_one(&self, size: usize, rng: &mut dyn RandomSource) -> usize {
        if self.tournament_size == 2 {
            let first = rng.next_below(size);
            return if rng.next_f64() < self.probability {
                first.min(rng.next_below(size))
            } else {
                first
            };
        }

        if rng.next_f64() < self.probability {
            let normalized = 1.0 - rng.next_f64().powf(1.0 / self.tournament_size as f64);
            ((normalized * size as f64) as usize).min(size - 1)
        } else {
            rng.next_below(size)
        }
    }
}

impl Default for TournamentSelection {
    fn default() -> Self {
        Self {
            tournament_size: 2,
            probability: 1.0,
        }
    }
}

impl<G: Genotype> ParentSelection<G> for TournamentSelection {
    #[instrument(level = "trace", skip_all, fields(n = n, size = population.len(), tournament_size = self.tournament_size))]
    fn select_parents(
        &self,
        population: &Population<G>,
        n: usize,
        mode: Mode,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<ParentPair>> {
        if population.sorted_by() != Some(mode) {
            return Err(EvolutionError::NotSorted);
        }
        let size = population.len();
        if size == 0 {
            return Err(EvolutionError::EmptyPopulation);
        }

        Ok((0..n)
            .map(|_| (self.select_one(size, rng), self.select_one(size, rng)))
            .collect())
    }
}

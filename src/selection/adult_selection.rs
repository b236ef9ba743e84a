use std::fmt::{self, Debug};
use std::str::FromStr;

use crate::error::{EvolutionError, Result};
use crate::evolution::options::EvolutionOptions;
use crate::genotype::Genotype;
use crate::mode::Mode;
use crate::population::Population;
use crate::rng::RandomSource;
use crate::selection::{GenerationalMixing, GenerationalReplacement, Overproduction};

/// Decides which individuals survive into the next generation.
pub trait AdultSelection<G: Genotype>: Debug + Send + Sync {
    /// Replaces the contents of `incumbents` with exactly `n` adults chosen
    /// from `offspring` (and, depending on the strategy, the incumbents
    /// themselves). `offspring` is drained.
    ///
    /// # Errors
    ///
    /// Fails when fewer than `n` candidates are available, and propagates
    /// population precondition errors.
    fn select_adults(
        &self,
        offspring: &mut Population<G>,
        incumbents: &mut Population<G>,
        n: usize,
        mode: Mode,
        rng: &mut dyn RandomSource,
    ) -> Result<()>;
}

/// The built-in adult selection strategies.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdultSelectionKind {
    #[default]
    GenerationalReplacement,
    GenerationalMixing,
    Overproduction,
}

impl fmt::Display for AdultSelectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdultSelectionKind::GenerationalReplacement => "GenerationalReplacement",
            AdultSelectionKind::GenerationalMixing => "GenerationalMixing",
            AdultSelectionKind::Overproduction => "Overproduction",
        };
        f.write_str(name)
    }
}

impl FromStr for AdultSelectionKind {
    type Err = EvolutionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "generationalreplacement" | "replacement" => {
                Ok(AdultSelectionKind::GenerationalReplacement)
            }
            "generationalmixing" | "mixing" => Ok(AdultSelectionKind::GenerationalMixing),
            "overproduction" => Ok(AdultSelectionKind::Overproduction),
            _ => Err(EvolutionError::UnsupportedStrategy(format!(
                "unknown adult selection '{}'",
                s
            ))),
        }
    }
}

/// Builds the adult selection strategy configured in `options`.
pub fn adult_selection_for<G: Genotype>(options: &EvolutionOptions) -> Box<dyn AdultSelection<G>> {
    match options.get_adult_selection() {
        AdultSelectionKind::GenerationalReplacement => Box::new(GenerationalReplacement),
        AdultSelectionKind::GenerationalMixing => Box::new(GenerationalMixing),
        AdultSelectionKind::Overproduction => Box::new(Overproduction::default()),
    }
}

use crate::error::{EvolutionError, Result};
use crate::genotype::Genotype;
use crate::mode::Mode;
use crate::population::Population;
use crate::rng::RandomSource;
use crate::selection::adult_selection::AdultSelection;

/// Keeps the first `n` offspring and discards every incumbent.
///
/// The offspring are taken in the order they were bred, without looking at
/// their fitness.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GenerationalReplacement;

impl<G: Genotype> AdultSelection<G> for GenerationalReplacement {
    fn select_adults(
        &self,
        offspring: &mut Population<G>,
        incumbents: &mut Population<G>,
        n: usize,
        _mode: Mode,
        _rng: &mut dyn RandomSource,
    ) -> Result<()> {
        if n > offspring.len() {
            return Err(EvolutionError::Evolution(format!(
                "Cannot keep {} adults from {} offspring",
                n,
                offspring.len()
            )));
        }

        incumbents.clear();
        for phenotype in offspring.take_all().into_iter().take(n) {
            incumbents.add(phenotype)?;
        }
        Ok(())
    }
}

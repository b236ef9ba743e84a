use crate::error::{EvolutionError, Result};
use crate::genotype::Genotype;
use crate::mode::Mode;
use crate::population::Population;
use crate::rng::RandomSource;
use crate::selection::adult_selection::AdultSelection;

/// Pools offspring and incumbents and keeps the `n` fittest.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GenerationalMixing;

impl<G: Genotype> AdultSelection<G> for GenerationalMixing {
    fn select_adults(
        &self,
        offspring: &mut Population<G>,
        incumbents: &mut Population<G>,
        n: usize,
        mode: Mode,
        _rng: &mut dyn RandomSource,
    ) -> Result<()> {
        let combined = offspring.len() + incumbents.len();
        if n > combined {
            return Err(EvolutionError::Evolution(format!(
                "Cannot keep {} adults from {} candidates",
                n, combined
            )));
        }

        let mut pool = offspring.take_all();
        pool.extend(incumbents.take_all());
        let mut pool = Population::from_phenotypes(combined, pool)?;
        pool.clear_with_elites(n, mode)?;

        for phenotype in pool.take_all() {
            incumbents.add(phenotype)?;
        }
        Ok(())
    }
}

use tracing::instrument;

use crate::error::Result;
use crate::genotype::Genotype;
use crate::mode::Mode;
use crate::population::Population;
use crate::rng::RandomSource;
use crate::sampling::AliasSampler;
use crate::selection::parent_selection::{ParentPair, ParentSelection};

/// Fitness-proportionate selection on sigma-scaled weights.
///
/// Each individual gets `scale + (fitness - mean) / (2 * std)`, so the
/// selection pressure depends on how far an individual stands out from the
/// rest of the population rather than on the absolute fitness. Under
/// `Mode::Minimize` the deviation is negated. Individuals more than two
/// standard deviations on the wrong side of the mean get weight zero, and a
/// population with no spread at all is sampled uniformly.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SigmaScalingSelection {
    scale: f64,
}

impl SigmaScalingSelection {
    pub fn new() -> Self {
        Self { scale: 1.0 }
    }

    fn weight(&self, fitness: f64, mean: f64, std: f64, mode: Mode) -> f64 {
        let deviation = match mode {
            Mode::Maximize => fitness - mean,
            Mode::Minimize => mean - fitness,
        };
        (self.scale + deviation / (2.0 * std)).max(0.0)
    }
}

impl Default for SigmaScalingSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Genotype> ParentSelection<G> for SigmaScalingSelection {
    #[instrument(level = "trace", skip_all, fields(n = n, size = population.len()))]
    fn select_parents(
        &self,
        population: &Population<G>,
        n: usize,
        mode: Mode,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<ParentPair>> {
        let stats = population.running_statistics()?;
        let mean = stats.mean();
        let std = stats.standard_deviation();

        let sampler = if std > 0.0 {
            AliasSampler::from_elements(population.as_slice(), |_, p| {
                self.weight(p.fitness_or_nan(), mean, std, mode)
            })?
        } else {
            AliasSampler::new(&vec![1.0; population.len()])?
        };

        Ok((0..n)
            .map(|_| (sampler.spin(rng), sampler.spin(rng)))
            .collect())
    }
}

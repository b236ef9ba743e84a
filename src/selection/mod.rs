//! Parent and adult selection.
//!
//! Parent selection turns a population into a list of index pairs to breed;
//! adult selection decides which offspring (and incumbents) make up the next
//! generation. Both are object-safe traits so the engine can hold them as
//! boxed strategies chosen from the configured kind.
pub mod adult_selection;
pub mod mixing;
pub mod overproduction;
pub mod parent_selection;
pub mod proportionate;
pub mod rank;
pub mod replacement;
pub mod sigma;
pub mod tournament;

pub use adult_selection::{adult_selection_for, AdultSelection, AdultSelectionKind};
pub use mixing::GenerationalMixing;
pub use overproduction::Overproduction;
pub use parent_selection::{parent_selection_for, ParentPair, ParentSelection, ParentSelectionKind};
pub use proportionate::FitnessProportionateSelection;
pub use rank::RankSelection;
pub use replacement::GenerationalReplacement;
pub use sigma::SigmaScalingSelection;
pub use tournament::TournamentSelection;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::genotype::{IntegerRange, ListGenotype};
    use crate::phenotype::Phenotype;
    use crate::population::Population;

    pub type Genes = ListGenotype<i64, IntegerRange>;

    const RANGE: IntegerRange = IntegerRange { min: 0, max: 1000 };

    /// A scored phenotype whose single gene tags where it came from.
    pub fn scored(tag: i64, fitness: f64) -> Phenotype<Genes> {
        Phenotype::with_fitness(ListGenotype::new(vec![tag], RANGE), fitness)
    }

    /// A filled population; gene `i` tags the phenotype built from `fitness[i]`.
    pub fn population_of(fitness: &[f64]) -> Population<Genes> {
        let phenotypes = fitness
            .iter()
            .enumerate()
            .map(|(i, &f)| scored(i as i64, f))
            .collect();
        Population::from_phenotypes(fitness.len(), phenotypes)
            .expect("test population fits its capacity")
    }

    pub fn tags(population: &Population<Genes>) -> Vec<i64> {
        population.iter().map(|p| p.genotype()[0]).collect()
    }

    /// Counts how often each index appears in `pairs`.
    pub fn histogram(pairs: &[(usize, usize)], size: usize) -> Vec<usize> {
        let mut counts = vec![0; size];
        for &(a, b) in pairs {
            counts[a] += 1;
            counts[b] += 1;
        }
        counts
    }

    /// Asserts `observed` is within five standard deviations of a binomial
    /// count with `trials` trials and success probability `p`.
    pub fn assert_binomial(observed: usize, trials: usize, p: f64, label: &str) {
        let expected = trials as f64 * p;
        let tolerance = 5.0 * (trials as f64 * p * (1.0 - p)).sqrt() + 1.0;
        assert!(
            (observed as f64 - expected).abs() <= tolerance,
            "{}: observed {}, expected {:.1} +- {:.1}",
            label,
            observed,
            expected,
            tolerance
        );
    }
}

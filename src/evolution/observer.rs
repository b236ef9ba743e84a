use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::evolution::termination::TerminationReason;
use crate::genotype::Genotype;
use crate::phenotype::Phenotype;
use crate::population::PopulationStatistics;

/// Receives progress notifications from an [`EvolutionLauncher`](super::EvolutionLauncher).
///
/// Every method has an empty default body, so observers implement only what
/// they need. Events of one generation are delivered in the order new best,
/// statistics, new generation, termination. `on_phenotype_evaluated` runs on
/// rayon worker threads when multi-threaded evaluation is enabled.
///
/// Observers are called while the launcher is mutably borrowed; use an
/// [`AbortHandle`] rather than the launcher to stop a run from inside one.
pub trait EvolutionObserver<G: Genotype>: Send + Sync {
    fn on_new_generation(&self, _generation: usize) {}

    fn on_new_best(&self, _best: &Phenotype<G>, _generation: usize) {}

    fn on_statistics(&self, _statistics: &PopulationStatistics) {}

    fn on_phenotype_evaluated(&self, _phenotype: &Phenotype<G>) {}

    fn on_termination(&self, _reason: TerminationReason) {}
}

/// Lets the caller keep a handle on an observer after handing it to a launcher.
impl<G, T> EvolutionObserver<G> for Arc<T>
where
    G: Genotype,
    T: EvolutionObserver<G> + ?Sized,
{
    fn on_new_generation(&self, generation: usize) {
        (**self).on_new_generation(generation)
    }

    fn on_new_best(&self, best: &Phenotype<G>, generation: usize) {
        (**self).on_new_best(best, generation)
    }

    fn on_statistics(&self, statistics: &PopulationStatistics) {
        (**self).on_statistics(statistics)
    }

    fn on_phenotype_evaluated(&self, phenotype: &Phenotype<G>) {
        (**self).on_phenotype_evaluated(phenotype)
    }

    fn on_termination(&self, reason: TerminationReason) {
        (**self).on_termination(reason)
    }
}

/// A cloneable request to stop a run after the current generation.
///
/// Once raised the flag stays raised, so a launcher that was aborted stops
/// again immediately if `evolve` is called once more.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    requested: Arc<AtomicBool>,
}

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_abort_is_shared_between_clones() {
        let handle = AbortHandle::new();
        let remote = handle.clone();
        assert!(!handle.is_aborted());

        thread::spawn(move || remote.abort()).join().unwrap();

        assert!(handle.is_aborted());
    }
}

use std::fmt;
use std::time::Duration;

use crate::evolution::options::EvolutionOptions;

/// Why a run stopped.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    Aborted,
    DurationLimitReached,
    GenerationLimitReached,
    FitnessLimitReached,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TerminationReason::Aborted => "Aborted",
            TerminationReason::DurationLimitReached => "DurationLimitReached",
            TerminationReason::GenerationLimitReached => "GenerationLimitReached",
            TerminationReason::FitnessLimitReached => "FitnessLimitReached",
        };
        f.write_str(name)
    }
}

/// Evaluates the stop conditions after a generation.
///
/// The first matching condition wins, in this order: abort request, duration
/// limit exceeded, generation limit reached, target fitness met or exceeded.
pub fn check_termination(
    options: &EvolutionOptions,
    aborted: bool,
    runtime: Duration,
    generation: usize,
    best_fitness: f64,
) -> Option<TerminationReason> {
    if aborted {
        return Some(TerminationReason::Aborted);
    }
    if let Some(limit) = options.get_max_duration() {
        if runtime > limit {
            return Some(TerminationReason::DurationLimitReached);
        }
    }
    if generation >= options.get_max_generations() {
        return Some(TerminationReason::GenerationLimitReached);
    }
    if let Some(target) = options.get_target_fitness() {
        if options.get_mode().has_reached(best_fitness, target) {
            return Some(TerminationReason::FitnessLimitReached);
        }
    }
    None
}

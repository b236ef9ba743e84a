pub mod builder;
pub mod challenge;
pub mod launcher;
pub mod observer;
pub mod options;
pub mod snapshot;
pub mod termination;

pub use builder::EvolutionLauncherBuilder;
pub use challenge::Challenge;
pub use launcher::{EvolutionLauncher, EvolutionResult, RunState};
pub use observer::{AbortHandle, EvolutionObserver};
pub use options::{EvolutionOptions, EvolutionOptionsBuilder};
pub use snapshot::EvolutionSnapshot;
pub use termination::{check_termination, TerminationReason};

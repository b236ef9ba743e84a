use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::EvolutionError;

/// The optimization objective of a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Higher fitness is better.
    #[default]
    Maximize,
    /// Lower fitness is better.
    Minimize,
}

impl Mode {
    /// Returns `true` when `candidate` is strictly better than `incumbent`.
    /// Ties are never an improvement.
    pub fn is_better(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Mode::Maximize => candidate > incumbent,
            Mode::Minimize => candidate < incumbent,
        }
    }

    /// Returns `true` when `fitness` meets or passes `target`.
    pub fn has_reached(self, fitness: f64, target: f64) -> bool {
        match self {
            Mode::Maximize => fitness >= target,
            Mode::Minimize => fitness <= target,
        }
    }

    /// Ordering that places the better fitness first.
    pub fn best_first(self, a: f64, b: f64) -> Ordering {
        match self {
            Mode::Maximize => b.total_cmp(&a),
            Mode::Minimize => a.total_cmp(&b),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Maximize => write!(f, "Maximize"),
            Mode::Minimize => write!(f, "Minimize"),
        }
    }
}

impl FromStr for Mode {
    type Err = EvolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "maximize" | "maximizefitness" | "max" => Ok(Mode::Maximize),
            "minimize" | "minimizefitness" | "min" => Ok(Mode::Minimize),
            _ => Err(EvolutionError::UnsupportedStrategy(format!("mode '{}'", s))),
        }
    }
}

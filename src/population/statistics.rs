use std::fmt;

/// Streaming max/min/mean/variance accumulator (Welford's algorithm).
///
/// Variance uses the population divisor `n`, not `n - 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningStatistics {
    count: usize,
    mean: f64,
    m2: f64,
    max: f64,
    min: f64,
}

impl RunningStatistics {
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            max: f64::NEG_INFINITY,
            min: f64::INFINITY,
        }
    }

    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.max = self.max.max(value);
        self.min = self.min.min(value);

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance, `0.0` for fewer than one sample.
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.m2 / self.count as f64
        }
    }

    pub fn standard_deviation(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    /// Freezes the accumulator into a `PopulationStatistics` value.
    pub fn summary(&self) -> PopulationStatistics {
        PopulationStatistics {
            max_fitness: self.max,
            min_fitness: self.min,
            average_fitness: self.mean,
            variance_fitness: self.variance(),
            standard_deviation_fitness: self.standard_deviation(),
        }
    }
}

impl Default for RunningStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<f64> for RunningStatistics {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = RunningStatistics::new();
        for value in iter {
            stats.push(value);
        }
        stats
    }
}

/// Fitness statistics of one generation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationStatistics {
    pub max_fitness: f64,
    pub min_fitness: f64,
    pub average_fitness: f64,
    pub variance_fitness: f64,
    pub standard_deviation_fitness: f64,
}

impl fmt::Display for PopulationStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Max: {}   Min: {}   Avg: {:.1}   Var: {:.1}   Std: {:.1}",
            self.max_fitness,
            self.min_fitness,
            self.average_fitness,
            self.variance_fitness,
            self.standard_deviation_fitness
        )
    }
}

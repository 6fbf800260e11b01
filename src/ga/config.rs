//! Grouping GA configuration.
//!
//! [`GroupingConfig`] is the parameter record of a run: group count,
//! operator rates, termination conditions, seeding and parallelism.

use crate::error::{GroupingError, Result};
use crate::models::VocabularyMode;

/// Configuration for a grouping run.
///
/// # Defaults
///
/// ```
/// use u_grouping::ga::GroupingConfig;
///
/// let config = GroupingConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.max_generations, 200);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_grouping::ga::GroupingConfig;
///
/// let config = GroupingConfig::new(4)
///     .with_population_size(80)
///     .with_crossover_rate(0.8)
///     .with_mutation_rate(0.2)
///     .with_target_fraction(0.95)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupingConfig {
    /// Number of groups K to form.
    pub group_count: usize,

    /// Number of chromosomes kept after every replacement.
    pub population_size: usize,

    /// Upper bound on generations executed.
    pub max_generations: usize,

    /// Fraction of the population drawn as crossover parents (0.0–1.0).
    ///
    /// The parent count is `floor(population_size * crossover_rate)`,
    /// rounded up to the next even number.
    pub crossover_rate: f64,

    /// Fraction of the population drawn as mutation parents (0.0–1.0).
    pub mutation_rate: f64,

    /// Stop once the generation best reaches this fraction of the maximum
    /// attainable fitness (0.0–1.0).
    pub target_fraction: f64,

    /// Random seed for reproducibility. `None` seeds from OS entropy.
    pub seed: Option<u64>,

    /// Whether to score offspring in parallel (requires the `parallel`
    /// feature; ignored otherwise). Scoring draws no randomness, so results
    /// are identical either way.
    pub parallel: bool,

    /// Strictness of tag-attribute normalization for raw input records.
    pub vocabulary: VocabularyMode,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            group_count: 1,
            population_size: 50,
            max_generations: 200,
            crossover_rate: 0.8,
            mutation_rate: 0.2,
            target_fraction: 1.0,
            seed: None,
            parallel: false,
            vocabulary: VocabularyMode::Strict,
        }
    }
}

impl GroupingConfig {
    /// Default configuration for `group_count` groups.
    pub fn new(group_count: usize) -> Self {
        Self {
            group_count,
            ..Self::default()
        }
    }

    /// Sets the number of groups.
    pub fn with_group_count(mut self, k: usize) -> Self {
        self.group_count = k;
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the termination threshold as a fraction of maximum fitness.
    pub fn with_target_fraction(mut self, fraction: f64) -> Self {
        self.target_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel scoring.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the vocabulary mode for raw input normalization.
    pub fn with_vocabulary(mut self, mode: VocabularyMode) -> Self {
        self.vocabulary = mode;
        self
    }

    /// Preset for quick feasibility checks.
    ///
    /// - Population: 20, Generations: 50
    pub fn fast(group_count: usize) -> Self {
        Self {
            population_size: 20,
            max_generations: 50,
            ..Self::new(group_count)
        }
    }

    /// Preset trading solution quality against run time.
    ///
    /// - Population: 50, Generations: 200
    pub fn balanced(group_count: usize) -> Self {
        Self::new(group_count)
    }

    /// Preset for large cohorts where solution quality matters most.
    ///
    /// - Population: 150, Generations: 1000
    pub fn quality(group_count: usize) -> Self {
        Self {
            population_size: 150,
            max_generations: 1000,
            ..Self::new(group_count)
        }
    }

    /// Validates the parameter record.
    ///
    /// Rates set through the builder are already clamped; this catches
    /// records built by struct literal or deserialization.
    pub fn validate(&self) -> Result<()> {
        if self.group_count == 0 {
            return Err(invalid("group_count must be at least 1"));
        }
        if self.population_size == 0 {
            return Err(invalid("population_size must be at least 1"));
        }
        if self.max_generations == 0 {
            return Err(invalid("max_generations must be at least 1"));
        }
        for (name, value) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
            ("target_fraction", self.target_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{name} must be within [0, 1], got {value}")));
            }
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> GroupingError {
    GroupingError::InvalidConfig(msg.into())
}

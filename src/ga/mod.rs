//! Permutation-encoded genetic algorithm for group partitioning.
//!
//! A candidate partition is a permutation of the individuals, cut into
//! contiguous groups by the run's target sizes. Each generation draws
//! crossover and mutation parents uniformly without replacement, produces
//! offspring with PMX and reciprocal exchange, scores only the new
//! offspring, and keeps the fittest `population_size` chromosomes.
//!
//! # Key Types
//!
//! - [`GroupingConfig`]: Run parameters (group count, rates, termination)
//! - [`GroupingRunner`]: Executes the generation loop
//! - [`GroupingResult`]: Best partition with per-group constraint breakdown
//!
//! # Submodules
//!
//! - [`chromosome`]: Permutation encoding and group decoding
//! - [`fitness`]: The four per-group constraints and the evaluator
//! - [`operators`]: PMX crossover and reciprocal exchange mutation
//! - [`selection`]: Uniform parent sampling without replacement
//! - [`population`]: Scored population and elitist replacement
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"

pub mod chromosome;
mod config;
pub mod fitness;
pub mod operators;
pub mod population;
mod result;
mod runner;
pub mod selection;

pub use chromosome::{decode, Chromosome, Group};
pub use config::GroupingConfig;
pub use fitness::{ConstraintScores, FitnessEvaluator};
pub use population::{Population, Scored};
pub use result::{GroupAssignment, GroupDetail, GroupingResult, RunSummary};
pub use runner::{optimize, optimize_raw, GenerationStats, GroupingRunner};

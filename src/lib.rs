//! Constrained group partitioning with a permutation-encoded genetic algorithm.
//!
//! Splits a fixed population of individuals into K groups of prescribed
//! sizes so that every group, as far as possible, simultaneously:
//!
//! - contains at least one member carrying the tagged attribute,
//! - mixes majors (more distinct majors than half the group size),
//! - mirrors the population-wide gender proportions within ±10%,
//! - matches its target size exactly.
//!
//! The search is a generational GA over permutations: PMX crossover,
//! reciprocal exchange mutation and elitist replacement with cached fitness.
//!
//! # Modules
//!
//! - [`models`]: Input records and vocabulary normalization
//! - [`stats`]: Per-run statistics (target sizes, gender ratios, max fitness)
//! - [`ga`]: Encoding, fitness, operators and the generation loop
//! - [`jobs`]: Job-store abstraction for hosts running optimizations in the
//!   background
//!
//! # Example
//!
//! ```
//! use u_grouping::ga::{optimize, GroupingConfig};
//! use u_grouping::models::{Gender, Individual};
//!
//! let individuals: Vec<Individual> = (0..12)
//!     .map(|i| {
//!         let gender = if i % 2 == 0 { Gender::Male } else { Gender::Female };
//!         Individual::new(i, gender, format!("major-{}", i % 5), i % 4 == 0)
//!     })
//!     .collect();
//!
//! let config = GroupingConfig::new(3).with_max_generations(50).with_seed(42);
//! let result = optimize(&individuals, &config).unwrap();
//!
//! assert_eq!(result.groups.len(), 3);
//! assert!(result.statistics.normalized_fitness <= 1.0);
//! ```

pub mod error;
pub mod ga;
pub mod jobs;
pub mod models;
pub mod random;
pub mod stats;

pub use error::{GroupingError, Precondition, Result};

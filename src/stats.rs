//! Run statistics derived once per run from the individual list.
//!
//! [`RunStatistics`] fixes the target group sizes (and therefore the segment
//! lengths the codec slices), the population-wide gender ratios the balance
//! constraint compares against, and the maximum attainable fitness.

use crate::error::{Precondition, Result};
use crate::models::{Gender, Individual, RawIndividual, VocabularyMode};
use std::collections::HashSet;

/// Number of binary constraints scored per group.
pub const CONSTRAINTS_PER_GROUP: usize = 4;

/// Aggregate statistics of one run. Immutable once computed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunStatistics {
    /// Population size N.
    pub n: usize,
    /// Number of male individuals.
    pub male_count: usize,
    /// Number of female individuals.
    pub female_count: usize,
    /// Population-wide male proportion (PL).
    pub male_ratio: f64,
    /// Population-wide female proportion (PP).
    pub female_ratio: f64,
    /// Number of groups K.
    pub group_count: usize,
    /// `N / K`.
    pub base_size: usize,
    /// `N % K`; the first `remainder` groups get one extra member.
    pub remainder: usize,
    /// Target size of each group slot, in slot order.
    pub expected_sizes: Vec<usize>,
    /// `4 * K`.
    pub max_fitness: usize,
}

impl RunStatistics {
    /// Computes statistics for `individuals` split into `group_count` groups.
    ///
    /// # Errors
    /// [`GroupingError::Precondition`](crate::GroupingError::Precondition)
    /// if `group_count` is zero, exceeds the number of individuals, or two
    /// records share an id.
    pub fn compute(individuals: &[Individual], group_count: usize) -> Result<Self> {
        let n = individuals.len();
        if group_count == 0 || n < group_count {
            return Err(Precondition::TooFewIndividuals {
                individuals: n,
                groups: group_count,
            }
            .into());
        }

        let mut seen = HashSet::with_capacity(n);
        for ind in individuals {
            if !seen.insert(ind.id) {
                return Err(Precondition::DuplicateIdentifier(ind.id).into());
            }
        }

        let male_count = individuals
            .iter()
            .filter(|i| i.gender == Gender::Male)
            .count();
        let female_count = n - male_count;

        let base_size = n / group_count;
        let remainder = n % group_count;
        let expected_sizes = (0..group_count)
            .map(|i| if i < remainder { base_size + 1 } else { base_size })
            .collect();

        Ok(Self {
            n,
            male_count,
            female_count,
            male_ratio: male_count as f64 / n as f64,
            female_ratio: female_count as f64 / n as f64,
            group_count,
            base_size,
            remainder,
            expected_sizes,
            max_fitness: CONSTRAINTS_PER_GROUP * group_count,
        })
    }

    /// Expected proportion of `gender` in a perfectly balanced group.
    pub fn expected_ratio(&self, gender: Gender) -> f64 {
        match gender {
            Gender::Male => self.male_ratio,
            Gender::Female => self.female_ratio,
        }
    }
}

/// Normalizes raw records, then computes the run statistics.
///
/// Vocabulary errors are reported before the precondition check so that a
/// malformed record is never masked by a group-count problem.
pub fn preprocess(
    raw: &[RawIndividual],
    group_count: usize,
    mode: VocabularyMode,
) -> Result<(Vec<Individual>, RunStatistics)> {
    let individuals = raw
        .iter()
        .map(|r| r.normalize(mode))
        .collect::<Result<Vec<_>>>()?;
    let stats = RunStatistics::compute(&individuals, group_count)?;
    Ok((individuals, stats))
}

//! Result record of a grouping run.

use super::fitness::ConstraintScores;
use crate::models::IndividualId;

/// Members of one group in the final assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupAssignment {
    /// 1-based group number.
    pub index: usize,
    /// Member identifiers in chromosome order.
    pub members: Vec<IndividualId>,
}

/// Constraint breakdown of one group in the final assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupDetail {
    /// 1-based group number.
    pub index: usize,
    /// Member identifiers in chromosome order.
    pub members: Vec<IndividualId>,
    /// Number of members placed in the group.
    pub member_count: usize,
    /// Satisfaction of each of the four constraints.
    pub constraints: ConstraintScores,
    /// Sum of the four indicators.
    pub score: usize,
}

/// Summary statistics of a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    /// Best raw fitness seen during the run.
    pub best_fitness: usize,
    /// `best_fitness / max_fitness`, in `[0, 1]`.
    pub normalized_fitness: f64,
    /// Generations actually executed.
    pub generations_run: usize,
    /// Wall-clock time from initialization to termination.
    pub elapsed_seconds: f64,
    /// `4 * group_count`.
    pub max_fitness: usize,
    /// Chromosome evaluations performed (initial population + offspring).
    pub evaluations: usize,
}

/// Final output of [`optimize`](super::optimize).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupingResult {
    /// Best-ever partition, group by group.
    pub groups: Vec<GroupAssignment>,
    /// Fitness, timing and evaluation counts of the run.
    pub statistics: RunSummary,
    /// Per-group constraint breakdown of the best partition.
    pub details: Vec<GroupDetail>,
    /// Best-ever fitness after initialization and after each generation.
    pub fitness_history: Vec<usize>,
}

impl GroupingResult {
    /// Whether every constraint of every group is satisfied.
    pub fn is_perfect(&self) -> bool {
        self.statistics.best_fitness == self.statistics.max_fitness
    }

    /// 1-based group number of `id`, if it was assigned.
    pub fn group_of(&self, id: IndividualId) -> Option<usize> {
        self.groups
            .iter()
            .find(|g| g.members.contains(&id))
            .map(|g| g.index)
    }
}

//! Constraint scoring.
//!
//! Every group earns one point per satisfied constraint:
//!
//! | Constraint | Satisfied when |
//! |---|---|
//! | C1 tag coverage | at least one member is tagged |
//! | C2 major diversity | distinct majors > half the group size |
//! | C3 gender balance | both in-group gender ratios within ±0.10 of the population ratios |
//! | C4 size match | member count equals the slot's expected size |
//!
//! A chromosome's fitness is the sum over all groups, in `0..=4K`.

use super::chromosome::{decode, Chromosome, Group};
use crate::models::{Gender, Individual};
use crate::stats::RunStatistics;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Largest allowed deviation of an in-group gender ratio.
pub const GENDER_TOLERANCE: f64 = 0.10;

/// Per-group constraint indicators, each 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintScores {
    /// C1: at least one tagged member.
    pub tag_coverage: u8,
    /// C2: more than half the members have distinct majors.
    pub major_diversity: u8,
    /// C3: gender ratio within tolerance of the population ratio.
    pub gender_balance: u8,
    /// C4: size equals the expected size.
    pub size_match: u8,
}

impl ConstraintScores {
    /// Sum of the four indicators.
    pub fn total(&self) -> usize {
        (self.tag_coverage + self.major_diversity + self.gender_balance + self.size_match) as usize
    }
}

/// C1: at least one tagged member.
pub fn tag_coverage(group: &Group<'_>) -> u8 {
    group.members.iter().any(|m| m.tagged) as u8
}

/// C2: more distinct majors than half the group size.
pub fn major_diversity(group: &Group<'_>) -> u8 {
    let distinct: HashSet<&str> = group.members.iter().map(|m| m.major.as_str()).collect();
    (distinct.len() as f64 > group.len() as f64 * 0.5) as u8
}

/// C3: in-group gender ratios close to the population ratios.
pub fn gender_balance(group: &Group<'_>, stats: &RunStatistics) -> u8 {
    let size = group.len();
    if size == 0 {
        return 0;
    }
    let male = group
        .members
        .iter()
        .filter(|m| m.gender == Gender::Male)
        .count();
    let male_ratio = male as f64 / size as f64;
    let female_ratio = (size - male) as f64 / size as f64;

    let male_ok = (male_ratio - stats.expected_ratio(Gender::Male)).abs() <= GENDER_TOLERANCE;
    let female_ok = (female_ratio - stats.expected_ratio(Gender::Female)).abs() <= GENDER_TOLERANCE;
    (male_ok && female_ok) as u8
}

/// C4: member count equals the slot's target size.
pub fn size_match(group: &Group<'_>) -> u8 {
    (group.len() == group.expected_size) as u8
}

/// Scores all four constraints for one group.
pub fn score_group(group: &Group<'_>, stats: &RunStatistics) -> ConstraintScores {
    ConstraintScores {
        tag_coverage: tag_coverage(group),
        major_diversity: major_diversity(group),
        gender_balance: gender_balance(group, stats),
        size_match: size_match(group),
    }
}

/// Scores chromosomes against the run's individuals and statistics.
///
/// Counts every chromosome evaluation so the runner (and tests) can verify
/// that cached fitness is never recomputed.
#[derive(Debug)]
pub struct FitnessEvaluator<'a> {
    individuals: &'a [Individual],
    stats: &'a RunStatistics,
    evaluations: AtomicUsize,
}

impl<'a> FitnessEvaluator<'a> {
    /// Creates an evaluator bound to one run.
    pub fn new(individuals: &'a [Individual], stats: &'a RunStatistics) -> Self {
        Self {
            individuals,
            stats,
            evaluations: AtomicUsize::new(0),
        }
    }

    /// Total fitness of `chromosome`, in `0..=stats.max_fitness`.
    pub fn evaluate(&self, chromosome: &Chromosome) -> usize {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        decode(chromosome, self.individuals, self.stats)
            .iter()
            .map(|g| score_group(g, self.stats).total())
            .sum()
    }

    /// Per-group breakdown, in slot order. Not counted as an evaluation.
    pub fn breakdown(&self, chromosome: &Chromosome) -> Vec<(Group<'a>, ConstraintScores)> {
        decode(chromosome, self.individuals, self.stats)
            .into_iter()
            .map(|g| {
                let scores = score_group(&g, self.stats);
                (g, scores)
            })
            .collect()
    }

    /// Number of chromosome evaluations performed so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }

    /// Run statistics the evaluator scores against.
    pub fn stats(&self) -> &RunStatistics {
        self.stats
    }

    /// Individuals the evaluator decodes into.
    pub fn individuals(&self) -> &'a [Individual] {
        self.individuals
    }
}

//! Population of scored chromosomes.
//!
//! Chromosomes and their fitness live together in one ordered collection,
//! so a fitness value can never drift out of sync with its chromosome.
//! Fitness is computed exactly once per chromosome instance: at
//! initialization for the first generation, and on creation for every
//! offspring afterwards.

use super::chromosome::Chromosome;
use super::fitness::FitnessEvaluator;
use crate::random::shuffle;
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A chromosome paired with its cached fitness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scored {
    pub chromosome: Chromosome,
    pub fitness: usize,
}

/// Ordered collection of scored chromosomes.
///
/// After [`replace`](Population::replace) the collection is sorted by
/// fitness descending, so index 0 is the generation's best.
#[derive(Debug, Clone, Default)]
pub struct Population {
    members: Vec<Scored>,
}

impl Population {
    /// Wraps already-scored members without reordering them.
    pub fn from_scored(members: Vec<Scored>) -> Self {
        Self { members }
    }

    /// `size` independent uniformly random permutations of `0..n`, scored.
    pub fn random<R: Rng>(
        n: usize,
        size: usize,
        evaluator: &FitnessEvaluator<'_>,
        parallel: bool,
        rng: &mut R,
    ) -> Self {
        let chromosomes: Vec<Chromosome> = (0..size)
            .map(|_| {
                let mut genes: Vec<usize> = (0..n).collect();
                shuffle(&mut genes, rng);
                Chromosome::from_genes(genes)
            })
            .collect();
        Self {
            members: score_all(chromosomes, evaluator, parallel),
        }
    }

    /// Members in current order.
    pub fn members(&self) -> &[Scored] {
        &self.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the population is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member at `index`.
    pub fn get(&self, index: usize) -> &Scored {
        &self.members[index]
    }

    /// Highest-fitness member; the first one on ties.
    pub fn best(&self) -> Option<&Scored> {
        self.members
            .iter()
            .reduce(|best, s| if s.fitness > best.fitness { s } else { best })
    }

    /// Elitist replacement.
    ///
    /// Appends the already-scored `offspring`, stably sorts everything by
    /// fitness descending (ties keep their input order, current members
    /// first) and keeps the top `size`.
    pub fn replace(&mut self, offspring: Vec<Scored>, size: usize) {
        self.members.extend(offspring);
        self.members.sort_by(|a, b| b.fitness.cmp(&a.fitness));
        self.members.truncate(size);
    }
}

/// Scores `chromosomes` in order, optionally in parallel.
///
/// Evaluation draws no randomness, so the parallel path returns exactly what
/// the sequential path would.
pub fn score_all(
    chromosomes: Vec<Chromosome>,
    evaluator: &FitnessEvaluator<'_>,
    parallel: bool,
) -> Vec<Scored> {
    if parallel {
        return score_parallel(chromosomes, evaluator);
    }
    chromosomes
        .into_iter()
        .map(|chromosome| score(chromosome, evaluator))
        .collect()
}

fn score(chromosome: Chromosome, evaluator: &FitnessEvaluator<'_>) -> Scored {
    let fitness = evaluator.evaluate(&chromosome);
    Scored { chromosome, fitness }
}

#[cfg(feature = "parallel")]
fn score_parallel(chromosomes: Vec<Chromosome>, evaluator: &FitnessEvaluator<'_>) -> Vec<Scored> {
    chromosomes
        .into_par_iter()
        .map(|chromosome| score(chromosome, evaluator))
        .collect()
}

// without rayon the parallel flag falls back to sequential scoring
#[cfg(not(feature = "parallel"))]
fn score_parallel(chromosomes: Vec<Chromosome>, evaluator: &FitnessEvaluator<'_>) -> Vec<Scored> {
    chromosomes
        .into_iter()
        .map(|chromosome| score(chromosome, evaluator))
        .collect()
}

//! Parent selection.
//!
//! Both selections draw population indices uniformly **without
//! replacement**; fitness plays no role. The two draws are independent, so a
//! chromosome may be a crossover parent and a mutation parent in the same
//! generation.

use rand::seq::index::sample;
use rand::Rng;

/// Number of crossover parents for a population of `population_len`.
///
/// `floor(population_len * rate)`, bumped to the next even number, clamped
/// to the population. Counts below two yield zero.
pub fn crossover_parent_count(population_len: usize, rate: f64) -> usize {
    let mut count = (population_len as f64 * rate).floor() as usize;
    if count % 2 != 0 {
        count += 1;
    }
    count = count.min(population_len);
    if count < 2 {
        0
    } else {
        count
    }
}

/// Number of mutation parents: `floor(population_len * rate)`, clamped.
pub fn mutation_parent_count(population_len: usize, rate: f64) -> usize {
    ((population_len as f64 * rate).floor() as usize).min(population_len)
}

/// Draws crossover parent pairs.
///
/// Indices are paired consecutively in draw order: the first drawn with the
/// second, the third with the fourth, and so on. When the clamped count is
/// odd (odd population with a rate near 1), the unpaired last draw is
/// dropped.
pub fn select_crossover_pairs<R: Rng>(
    population_len: usize,
    rate: f64,
    rng: &mut R,
) -> Vec<(usize, usize)> {
    let count = crossover_parent_count(population_len, rate);
    if count == 0 {
        return Vec::new();
    }
    let drawn = sample(rng, population_len, count).into_vec();
    drawn.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect()
}

/// Draws mutation parents.
pub fn select_mutation_parents<R: Rng>(population_len: usize, rate: f64, rng: &mut R) -> Vec<usize> {
    let count = mutation_parent_count(population_len, rate);
    if count == 0 {
        return Vec::new();
    }
    sample(rng, population_len, count).into_vec()
}

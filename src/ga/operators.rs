//! Permutation-preserving genetic operators.
//!
//! Operators are generic over the gene type, so they work on dense index
//! chromosomes as well as on identifier sequences.
//!
//! # Crossover
//!
//! - [`pmx_crossover`] (PMX): Goldberg & Lingle (1985); swaps a middle
//!   segment between two parents and repairs induced duplicates through the
//!   positional mapping between the two segments
//!
//! # Mutation
//!
//! - [`reciprocal_exchange`]: swap two distinct random positions on an O(n) copy
//!
//! # References
//!
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

use log::warn;
use rand::seq::index::sample;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

// ============================================================================
// Crossover
// ============================================================================

/// Partially Mapped Crossover (PMX).
///
/// Draws two cut points uniformly from `[0, size)`, orders them, and widens
/// an empty segment by one position, then delegates to [`pmx_with_cuts`].
///
/// # Panics
/// Panics if the parents have different lengths or are empty.
pub fn pmx_crossover<T, R>(parent1: &[T], parent2: &[T], rng: &mut R) -> (Vec<T>, Vec<T>)
where
    T: Copy + Eq + Hash,
    R: Rng,
{
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    assert!(n > 0, "parents must not be empty");

    let (lower, upper) = cut_points(n, rng);
    pmx_with_cuts(parent1, parent2, lower, upper)
}

/// PMX with explicit cut points; the swapped segment is `[lower, upper)`.
///
/// `child1` is `parent1` with the segment taken from `parent2`, `child2` is
/// the mirror image. Positions outside the segment that now duplicate a
/// segment value are repaired by following the mapping chain (see
/// [`repair_conflicts`]).
///
/// # Panics
/// Panics if the parents have different lengths or the cut points are out of
/// order or out of range.
pub fn pmx_with_cuts<T>(parent1: &[T], parent2: &[T], lower: usize, upper: usize) -> (Vec<T>, Vec<T>)
where
    T: Copy + Eq + Hash,
{
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    assert!(lower <= upper && upper <= n, "invalid cut points ({lower}, {upper}) for length {n}");

    let mut child1 = parent1.to_vec();
    let mut child2 = parent2.to_vec();
    child1[lower..upper].copy_from_slice(&parent2[lower..upper]);
    child2[lower..upper].copy_from_slice(&parent1[lower..upper]);

    repair_conflicts(&mut child1, parent1, parent2, lower, upper);
    repair_conflicts(&mut child2, parent2, parent1, lower, upper);

    let patched = patch_duplicates(&mut child1, parent1) + patch_duplicates(&mut child2, parent2);
    debug_assert_eq!(patched, 0, "PMX repair left duplicates; parents were not permutations of one set");

    (child1, child2)
}

/// Repairs duplicates introduced outside the swapped segment.
///
/// `child` is `own` with `[lower, upper)` replaced by `other`'s segment. For
/// every outside position whose value also sits in the segment, look up that
/// value in `other`'s segment and take `own`'s value at the same position;
/// repeat until the value is no longer in the segment. A visited set stops
/// cycles; an unresolved chain leaves the position unchanged.
pub fn repair_conflicts<T>(child: &mut [T], own: &[T], other: &[T], lower: usize, upper: usize)
where
    T: Copy + Eq + Hash,
{
    // value in the swapped-in segment -> its position
    let segment: HashMap<T, usize> = other[lower..upper]
        .iter()
        .enumerate()
        .map(|(offset, &v)| (v, lower + offset))
        .collect();

    for i in (0..lower).chain(upper..child.len()) {
        let mut value = child[i];
        if !segment.contains_key(&value) {
            continue;
        }
        let mut visited = HashSet::new();
        while let Some(&pos) = segment.get(&value) {
            if !visited.insert(value) {
                break;
            }
            value = own[pos];
        }
        if !segment.contains_key(&value) {
            child[i] = value;
        }
    }
}

/// Replaces leftover duplicates in `child` with values it is missing.
///
/// The multiset of `reference` defines the expected contents. Scanning left
/// to right, every repeated occurrence is overwritten with the next missing
/// value in `reference` order. Returns the number of positions patched.
pub fn patch_duplicates<T>(child: &mut [T], reference: &[T]) -> usize
where
    T: Copy + Eq + Hash,
{
    let mut remaining: HashMap<T, usize> = HashMap::with_capacity(reference.len());
    for &v in reference {
        *remaining.entry(v).or_insert(0) += 1;
    }

    let mut surplus = Vec::new();
    for (i, v) in child.iter().enumerate() {
        match remaining.get_mut(v) {
            Some(count) if *count > 0 => *count -= 1,
            _ => surplus.push(i),
        }
    }
    if surplus.is_empty() {
        return 0;
    }

    let mut missing = reference.iter().copied().filter(|v| match remaining.get_mut(v) {
        Some(count) if *count > 0 => {
            *count -= 1;
            true
        }
        _ => false,
    });
    let mut patched = 0;
    for i in surplus {
        if let Some(v) = missing.next() {
            child[i] = v;
            patched += 1;
        }
    }
    warn!("patched {patched} duplicate gene(s) left by crossover repair");
    patched
}

// ============================================================================
// Mutation
// ============================================================================

/// Reciprocal exchange mutation: copy the parent and swap two distinct
/// positions drawn without replacement.
///
/// Chromosomes shorter than two genes are returned unchanged.
pub fn reciprocal_exchange<T: Copy, R: Rng>(parent: &[T], rng: &mut R) -> Vec<T> {
    let mut child = parent.to_vec();
    if child.len() < 2 {
        return child;
    }
    let picks = sample(rng, child.len(), 2);
    child.swap(picks.index(0), picks.index(1));
    child
}

// ============================================================================
// Helpers
// ============================================================================

/// Two ordered cut points in `[0, n]` bounding a non-empty segment.
fn cut_points<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    let (lower, mut upper) = if a <= b { (a, b) } else { (b, a) };
    if lower == upper {
        upper = (lower + 1).min(n);
    }
    (lower, upper)
}

/// Whether `perm` holds exactly the values of `reference`, each as often.
pub fn same_multiset<T: Copy + Eq + Hash>(perm: &[T], reference: &[T]) -> bool {
    if perm.len() != reference.len() {
        return false;
    }
    let mut counts: HashMap<T, isize> = HashMap::with_capacity(reference.len());
    for &v in reference {
        *counts.entry(v).or_insert(0) += 1;
    }
    for &v in perm {
        *counts.entry(v).or_insert(0) -= 1;
    }
    counts.values().all(|&c| c == 0)
}

// ============================================================================
// Tests
// ============================================================================

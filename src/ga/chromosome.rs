//! Chromosome encoding and group decoding.
//!
//! A chromosome is a permutation of the run's individuals. Genes are dense
//! indices `0..N` into the individual slice handed to the engine, so every
//! gene is a bijective stand-in for an identifier. A chromosome carries no
//! group boundaries of its own: [`decode`] cuts it into contiguous segments
//! whose lengths come from [`RunStatistics::expected_sizes`].
//!
//! ```text
//! expected_sizes = [4, 3, 3]
//! genes          = [7 2 9 0 | 5 1 8 | 3 6 4]
//!                   group 0    group 1  group 2
//! ```

use crate::models::{Individual, IndividualId};
use crate::stats::RunStatistics;

/// A candidate partition encoded as a permutation of individual indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chromosome {
    genes: Vec<usize>,
}

impl Chromosome {
    /// Wraps a gene vector. The caller guarantees it is a permutation.
    pub fn from_genes(genes: Vec<usize>) -> Self {
        Self { genes }
    }

    /// The identity permutation `0..n`.
    pub fn identity(n: usize) -> Self {
        Self {
            genes: (0..n).collect(),
        }
    }

    /// Gene slice.
    pub fn genes(&self) -> &[usize] {
        &self.genes
    }

    /// Consumes the chromosome, returning its genes.
    pub fn into_genes(self) -> Vec<usize> {
        self.genes
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the chromosome has no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Whether the genes are exactly `0..n`, each once.
    pub fn is_permutation(&self, n: usize) -> bool {
        is_index_permutation(&self.genes, n)
    }

    /// Maps genes to identifiers of `individuals`.
    ///
    /// # Panics
    /// If a gene is not a valid index into `individuals`.
    pub fn member_ids(&self, individuals: &[Individual]) -> Vec<IndividualId> {
        self.genes.iter().map(|&g| individuals[g].id).collect()
    }
}

/// Checks that `genes` holds every value of `0..n` exactly once.
pub fn is_index_permutation(genes: &[usize], n: usize) -> bool {
    if genes.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &g in genes {
        if g >= n || seen[g] {
            return false;
        }
        seen[g] = true;
    }
    true
}

/// One decoded group: a view over a chromosome segment.
#[derive(Debug, Clone)]
pub struct Group<'a> {
    /// Zero-based slot index.
    pub slot: usize,
    /// Target size of this slot.
    pub expected_size: usize,
    /// Members in chromosome order.
    pub members: Vec<&'a Individual>,
}

impl Group<'_> {
    /// Number of members actually placed in the group.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member identifiers in chromosome order.
    pub fn member_ids(&self) -> Vec<IndividualId> {
        self.members.iter().map(|m| m.id).collect()
    }
}

/// Cuts `chromosome` into `stats.group_count` contiguous groups.
///
/// Segments are non-overlapping and exhaustive: their lengths follow
/// `stats.expected_sizes`, which sums to N.
///
/// The chromosome must be a permutation of `0..N`; debug builds assert it.
/// Release builds truncate a segment running past the end of a short
/// chromosome, and the resulting size mismatch shows up as a failed size
/// constraint.
///
/// # Panics
/// If a gene is not a valid index into `individuals`.
pub fn decode<'a>(
    chromosome: &Chromosome,
    individuals: &'a [Individual],
    stats: &RunStatistics,
) -> Vec<Group<'a>> {
    debug_assert!(
        chromosome.is_permutation(stats.n),
        "decoding a chromosome that is not a permutation of {} individuals",
        stats.n
    );
    let genes = chromosome.genes();
    let mut start = 0;
    stats
        .expected_sizes
        .iter()
        .enumerate()
        .map(|(slot, &size)| {
            let end = (start + size).min(genes.len());
            let members = genes[start..end]
                .iter()
                .map(|&g| &individuals[g])
                .collect();
            start = end;
            Group {
                slot,
                expected_size: size,
                members,
            }
        })
        .collect()
}

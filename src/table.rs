//! The shared k-mer table every rank inserts into and looks up from.

use clap::ValueEnum;

use crate::kmer::{KmerPair, PackedKmer};

/// A table of k-mers shared by all ranks.
///
/// Inserts and finds may be called concurrently from any number of ranks.
/// The assembler only calls `find` after every insert has returned.
pub trait KmerTable: Sync {
    /// Stores `pair`, returning `false` when no free slot is left.
    fn insert(&self, pair: &KmerPair) -> bool;

    /// Looks up the pair stored for `kmer`.
    fn find(&self, kmer: &PackedKmer) -> Option<KmerPair>;

    /// Number of slots.
    fn capacity(&self) -> usize;

    /// Number of stored k-mers.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which [`KmerTable`] implementation backs a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TableKind {
    /// Open-addressing table split into one segment per rank.
    #[default]
    Segmented,
    /// Sharded `DashMap` keyed by packed k-mer.
    Dashmap,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Segmented => write!(f, "segmented"),
            Self::Dashmap => write!(f, "dashmap"),
        }
    }
}

/// Slots per rank for `n_kmers` k-mers at a load factor of one half.
///
/// Never zero, so tiny inputs spread over many ranks still get a table.
#[must_use]
pub fn slots_per_rank(n_kmers: usize, n_ranks: usize) -> usize {
    (n_kmers * 2 / n_ranks.max(1)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizing_divides_evenly_and_fits() {
        for n_kmers in [0, 1, 5, 99, 1000] {
            for n_ranks in 1..=16 {
                let per_rank = slots_per_rank(n_kmers, n_ranks);
                assert!(per_rank >= 1);
                assert!(per_rank * n_ranks >= n_kmers);
            }
        }
    }

    #[test]
    fn display_matches_value_names() {
        assert_eq!(TableKind::Segmented.to_string(), "segmented");
        assert_eq!(TableKind::Dashmap.to_string(), "dashmap");
    }
}

use std::{
    hash::BuildHasherDefault,
    sync::atomic::{AtomicUsize, Ordering},
};

use dashmap::{mapref::entry::Entry, DashMap};
use rustc_hash::FxHasher;

use crate::{
    kmer::{KmerPair, PackedKmer},
    table::{slots_per_rank, KmerTable},
};

/// A custom `DashMap` w/ `FxHasher`, keyed by packed k-mer.
///
/// The key carries the k-mer length, so `AC` and `AAC` (both packing to `1`)
/// are distinct entries.
///
/// Useful: [Using a Custom Hash Function in Rust](https://docs.rs/hashers/1.0.1/hashers/#using-a-custom-hash-function-in-rust).
pub type DashFx = DashMap<PackedKmer, KmerPair, BuildHasherDefault<FxHasher>>;

/// [`KmerTable`] over a sharded [`DashFx`].
///
/// Holds at most as many k-mers as a [`DistributedHashMap`](crate::hash_map::DistributedHashMap)
/// sized for the same input, so both report a full table at the same point.
#[derive(Debug)]
pub struct DashTable {
    map: DashFx,
    capacity: usize,
    reserved: AtomicUsize,
}

impl DashTable {
    #[must_use]
    pub fn new(n_kmers: usize, n_ranks: usize) -> Self {
        let n_ranks = n_ranks.max(1);
        let capacity = slots_per_rank(n_kmers, n_ranks) * n_ranks;
        Self {
            map: DashMap::with_capacity_and_hasher(
                n_kmers,
                BuildHasherDefault::<FxHasher>::default(),
            ),
            capacity,
            reserved: AtomicUsize::new(0),
        }
    }
}

impl KmerTable for DashTable {
    fn insert(&self, pair: &KmerPair) -> bool {
        if self.reserved.fetch_add(1, Ordering::AcqRel) >= self.capacity {
            self.reserved.fetch_sub(1, Ordering::AcqRel);
            return false;
        }
        match self.map.entry(pair.kmer) {
            // The first copy of a duplicated k-mer wins; the copy takes no room.
            Entry::Occupied(_) => {
                self.reserved.fetch_sub(1, Ordering::AcqRel);
            }
            Entry::Vacant(slot) => {
                slot.insert(*pair);
            }
        }
        true
    }

    fn find(&self, kmer: &PackedKmer) -> Option<KmerPair> {
        self.map.get(kmer).map(|entry| *entry.value())
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_find() {
        let table = DashTable::new(2, 1);
        let pair = KmerPair::parse_line(b"GATTA CF", 1).unwrap();
        assert!(table.insert(&pair));
        assert_eq!(table.find(&pair.kmer), Some(pair));
        assert_eq!(table.find(&"GATTC".parse().unwrap()), None);
    }

    #[test]
    fn refuses_past_capacity() {
        let table = DashTable::new(1, 1);
        assert_eq!(table.capacity(), 2);
        for line in ["AAAA FF", "CCCC FF"] {
            assert!(table.insert(&KmerPair::parse_line(line.as_bytes(), 1).unwrap()));
        }
        assert!(!table.insert(&KmerPair::parse_line(b"GGGG FF", 1).unwrap()));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn lengths_sharing_bits_are_both_stored() {
        // AC and AAC pack to the same bits.
        let table = DashTable::new(2, 1);
        let short = KmerPair::parse_line(b"AC FF", 1).unwrap();
        let long = KmerPair::parse_line(b"AAC FF", 1).unwrap();
        assert_eq!(short.kmer.packed_bits(), long.kmer.packed_bits());
        assert!(table.insert(&short));
        assert!(table.insert(&long));
        assert_eq!(table.len(), 2);
        assert_eq!(table.find(&short.kmer), Some(short));
        assert_eq!(table.find(&long.kmer), Some(long));
        assert_eq!(table.find(&"AAAC".parse().unwrap()), None);
    }

    #[test]
    fn duplicates_take_no_capacity() {
        let table = DashTable::new(1, 1);
        let pair = KmerPair::parse_line(b"ACGT FF", 1).unwrap();
        for _ in 0..5 {
            assert!(table.insert(&pair));
        }
        assert_eq!(table.len(), 1);
        // One slot of the two is still free.
        assert!(table.insert(&KmerPair::parse_line(b"TTTT FF", 1).unwrap()));
        assert!(!table.insert(&KmerPair::parse_line(b"GGGG FF", 1).unwrap()));
        assert_eq!(table.len(), 2);
    }
}

//! Open-addressing k-mer table split into per-rank segments.
//!
//! The slot space `0..capacity` is cut into one contiguous segment per rank,
//! `per_rank` slots each. Slot `s` lives in segment `s / per_rank` at offset
//! `s % per_rank`. A k-mer's probe sequence is `(hash + i) % capacity` for
//! `i` in `0..capacity`, so every rank may write into every other rank's
//! segment.
//!
//! Each slot is written at most once. Claiming a slot and writing the k-mer
//! into it happen as one step, so two ranks racing for the same slot can never
//! both win it, and a reader never observes a claimed slot without its k-mer.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    OnceLock,
};

use crate::{
    kmer::{KmerPair, PackedKmer},
    table::{slots_per_rank, KmerTable},
};

/// One rank's block of slots.
#[derive(Debug)]
struct Segment {
    slots: Box<[OnceLock<KmerPair>]>,
    used: AtomicUsize,
}

impl Segment {
    fn new(size: usize) -> Self {
        Self {
            slots: (0..size).map(|_| OnceLock::new()).collect(),
            used: AtomicUsize::new(0),
        }
    }
}

/// Occupancy figures for a [`DistributedHashMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    pub capacity: usize,
    pub len: usize,
    /// Occupied slots in each rank's segment.
    pub segment_len: Vec<usize>,
    /// Longest probe sequence any insert needed, counting the final slot.
    pub max_probe: usize,
}

/// A fixed-size k-mer table with one segment per rank.
///
/// # Example
///
/// ```rust
/// use kmer_hash::hash_map::DistributedHashMap;
/// use kmer_hash::kmer::KmerPair;
/// use kmer_hash::table::KmerTable;
///
/// let table = DistributedHashMap::new(2, 2);
/// let pair = KmerPair::parse_line(b"ACGTA FC", 1)?;
/// assert!(table.insert(&pair));
/// assert_eq!(table.find(&pair.kmer), Some(pair));
/// # Ok::<(), kmer_hash::error::KmerHashError>(())
/// ```
#[derive(Debug)]
pub struct DistributedHashMap {
    segments: Vec<Segment>,
    per_rank: usize,
    capacity: usize,
    len: AtomicUsize,
    max_probe: AtomicUsize,
}

impl DistributedHashMap {
    /// Sizes a table for `n_kmers` k-mers spread over `n_ranks` ranks at a load
    /// factor of one half.
    #[must_use]
    pub fn new(n_kmers: usize, n_ranks: usize) -> Self {
        let n_ranks = n_ranks.max(1);
        Self::with_segments(slots_per_rank(n_kmers, n_ranks), n_ranks)
    }

    /// Builds a table of exactly `n_ranks` segments of `per_rank` slots.
    #[must_use]
    pub fn with_segments(per_rank: usize, n_ranks: usize) -> Self {
        let per_rank = per_rank.max(1);
        let n_ranks = n_ranks.max(1);
        Self {
            segments: (0..n_ranks).map(|_| Segment::new(per_rank)).collect(),
            per_rank,
            capacity: per_rank * n_ranks,
            len: AtomicUsize::new(0),
            max_probe: AtomicUsize::new(0),
        }
    }

    /// Number of slots in each rank's segment.
    #[must_use]
    pub const fn per_rank(&self) -> usize {
        self.per_rank
    }

    /// The rank whose segment holds `slot`.
    #[must_use]
    pub const fn owner_of(&self, slot: usize) -> usize {
        slot / self.per_rank
    }

    /// Offset of `slot` within its owner's segment.
    #[must_use]
    pub const fn segment_index(&self, slot: usize) -> usize {
        slot - self.owner_of(slot) * self.per_rank
    }

    fn slot(&self, slot: usize) -> (&Segment, &OnceLock<KmerPair>) {
        let segment = &self.segments[self.owner_of(slot)];
        (segment, &segment.slots[self.segment_index(slot)])
    }

    /// Slot visited on probe `probe` for a k-mer hashing to `hash`.
    fn probe_slot(&self, hash: u64, probe: usize) -> usize {
        let capacity = self.capacity as u64;
        ((hash % capacity + probe as u64) % capacity) as usize
    }

    #[must_use]
    pub fn stats(&self) -> TableStats {
        TableStats {
            capacity: self.capacity,
            len: self.len.load(Ordering::Relaxed),
            segment_len: self
                .segments
                .iter()
                .map(|segment| segment.used.load(Ordering::Relaxed))
                .collect(),
            max_probe: self.max_probe.load(Ordering::Relaxed),
        }
    }
}

impl KmerTable for DistributedHashMap {
    fn insert(&self, pair: &KmerPair) -> bool {
        let hash = pair.kmer.hash64();

        for probe in 0..self.capacity {
            let (segment, slot) = self.slot(self.probe_slot(hash, probe));
            if slot.set(*pair).is_ok() {
                segment.used.fetch_add(1, Ordering::Relaxed);
                self.len.fetch_add(1, Ordering::Relaxed);
                self.max_probe.fetch_max(probe + 1, Ordering::Relaxed);
                return true;
            }
        }
        false
    }

    /// Nothing is ever removed, so the first never-used slot on the probe
    /// sequence ends the search. Only valid once all inserts have returned.
    fn find(&self, kmer: &PackedKmer) -> Option<KmerPair> {
        let hash = kmer.hash64();

        for probe in 0..self.capacity {
            let (_, slot) = self.slot(self.probe_slot(hash, probe));
            match slot.get() {
                Some(stored) if stored.kmer == *kmer => return Some(*stored),
                Some(_) => {}
                None => return None,
            }
        }
        None
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }
}

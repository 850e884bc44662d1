//! Fuzz target for splitting and parsing whole k-mer files.
//!
//! Whatever the input, every rank's block must parse or fail cleanly, and the
//! blocks must cover each line exactly once.

#![no_main]

use bytes::Bytes;
use kmer_hash::reader::{rank_range, KmerFile};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let n_ranks = usize::from(data[0] % 16) + 1;
    let file = KmerFile::from_bytes(Bytes::copy_from_slice(&data[1..]));

    let mut covered = 0;
    for rank in 0..n_ranks {
        let range = rank_range(file.line_count(), n_ranks, rank);
        assert_eq!(range.start, covered);
        covered = range.end;

        if let Ok(kmers) = file.rank_kmers(n_ranks, rank) {
            assert_eq!(kmers.len(), range.len());
            for pair in kmers {
                assert_eq!(pair.kmer.len().get(), file.k());
            }
        }
    }
    assert_eq!(covered, file.line_count());
});

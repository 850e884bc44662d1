//! Fuzz target for `KmerPair::parse_line`.
//!
//! Arbitrary bytes must either parse into a k-mer with valid extensions or be
//! rejected with an error naming the line; never panic.

#![no_main]

use kmer_hash::error::KmerHashError;
use kmer_hash::kmer::KmerPair;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    match KmerPair::parse_line(data, 7) {
        Ok(pair) => {
            let k = pair.kmer.len().get();
            assert!((1..=32).contains(&k));

            // The printed form parses back to the same pair.
            let printed = pair.to_string();
            let reparsed = KmerPair::parse_line(printed.as_bytes(), 7).unwrap();
            assert_eq!(reparsed, pair);

            if let Some(next) = pair.next_kmer() {
                assert_eq!(next.len(), pair.kmer.len());
            }
        }
        Err(KmerHashError::KmerParse { line, .. }) => assert_eq!(line, 7),
        Err(other) => panic!("unexpected error kind: {other}"),
    }
});

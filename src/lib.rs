//! # kmer-hash
//!
//! A parallel k-mer hash table and de Bruijn contig assembler.
//!
//! The input is a file of k-mers, each annotated with the base that precedes
//! and follows it in the genome (`F` when there is none). The file is split
//! into contiguous blocks, one per rank. Every rank inserts its block into a
//! shared open-addressing table, then walks a contig forward from each of its
//! k-mers that has no backward extension.
//!
//! ## Library usage
//!
//! ```rust,no_run
//! use kmer_hash::builder::Assembler;
//!
//! let report = Assembler::new().ranks(4)?.assemble("test.txt")?;
//! println!(
//!     "{} contigs from {} k-mers in {:.3}s",
//!     report.contig_count(),
//!     report.total_kmers(),
//!     report.total_secs
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Lower-level pieces are public too: [`kmer::PackedKmer`] and
//! [`kmer::KmerPair`] for the data, [`hash_map::DistributedHashMap`] and
//! [`dashmaps::DashTable`] behind the [`table::KmerTable`] trait, and
//! [`contig::assemble_contig`] for a single walk.
//!
//! ## Features
//!
//! - `tracing` (default): spans and events for each phase
//! - `gzip`: read `.gz` k-mer files

pub mod bench;
pub mod builder;
pub mod cli;
pub mod contig;
pub mod dashmaps;
pub mod error;
pub mod hash_map;
pub mod kmer;
pub mod launch;
pub mod output;
pub mod progress;
pub mod reader;
pub mod run;
pub mod table;

//! Error types for kmer-hash.
//!
//! This module provides exhaustive, strongly-typed errors for reading k-mer
//! files, filling the shared table and walking contigs.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in kmer-hash operations.
#[derive(Debug, Error)]
pub enum KmerHashError {
    /// K-mer length is outside the valid range (1-32).
    #[error("invalid k-mer length {k}: must be between {min} and {max}")]
    InvalidKmerLength { k: usize, min: u8, max: u8 },

    /// Encountered an invalid DNA base.
    #[error("invalid base '{}' at position {position}", base_char(.base))]
    InvalidBase { base: u8, position: usize },

    /// Failed to read the k-mer file.
    #[error("failed to read k-mer file '{path}': {source}")]
    KmerRead {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// A line of the k-mer file could not be parsed.
    #[error("line {line}: {details}")]
    KmerParse { line: usize, details: String },

    /// The k-mer file holds no k-mers.
    #[error("k-mer file '{path}' is empty")]
    EmptyInput { path: PathBuf },

    /// A line holds a k-mer of a different length than the first line.
    #[error("line {line}: found a {found}-mer in a file of {expected}-mers")]
    InconsistentKmerLength {
        line: usize,
        found: usize,
        expected: usize,
    },

    /// The file's k-mer length differs from the one the run was configured for.
    #[error(
        "'{path}' contains {found}-mers, while this run expects {expected}-mers; pass --expect-k {found} or drop the flag"
    )]
    KmerLengthMismatch {
        path: PathBuf,
        found: usize,
        expected: usize,
    },

    /// Every slot of the table was probed without finding a free one.
    #[error("hash table is full ({capacity} slots)")]
    HashMapFull { capacity: usize },

    /// The successor of a k-mer on a contig walk is absent from the table.
    #[error("k-mer {kmer} not found in hash table")]
    KmerNotFound { kmer: String },

    /// A contig walk ran longer than the table could ever hold.
    #[error("contig starting at {start} exceeds {limit} k-mers; the input loops")]
    ContigCycle { start: String, limit: usize },

    /// No recorded benchmark series has this name.
    #[error("unknown benchmark series '{name}' (known: {known})")]
    UnknownSeries { name: String, known: String },

    /// The run was configured with zero ranks.
    #[error("rank count must be at least 1")]
    NoRanks,

    /// Failed to write output.
    #[error("failed to write output: {source}")]
    WriteError {
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a contig file.
    #[error("failed to write contig file '{path}': {source}")]
    ContigWrite {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to serialize JSON output.
    #[error("failed to serialize JSON: {source}")]
    JsonError {
        #[source]
        source: serde_json::Error,
    },
}

fn base_char(base: &u8) -> char {
    char::from(*base)
}

/// Error for invalid k-mer length.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("k-mer length {k} is out of range: must be between {min} and {max}")]
pub struct KmerLengthError {
    /// The invalid k value that was provided.
    pub k: usize,
    /// Minimum valid k-mer length.
    pub min: u8,
    /// Maximum valid k-mer length.
    pub max: u8,
}

/// Error for invalid DNA base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBaseError {
    /// The invalid byte value.
    pub base: u8,
    /// Position of the invalid byte in the sequence.
    pub position: usize,
}

impl std::fmt::Display for InvalidBaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.base.is_ascii_graphic() || self.base == b' ' {
            write!(
                f,
                "invalid base '{}' (0x{:02x}) at position {}",
                self.base as char, self.base, self.position
            )
        } else {
            write!(
                f,
                "invalid base 0x{:02x} at position {}",
                self.base, self.position
            )
        }
    }
}

impl std::error::Error for InvalidBaseError {}

impl From<std::io::Error> for KmerHashError {
    fn from(source: std::io::Error) -> Self {
        Self::WriteError { source }
    }
}

impl From<serde_json::Error> for KmerHashError {
    fn from(source: serde_json::Error) -> Self {
        Self::JsonError { source }
    }
}

impl From<KmerLengthError> for KmerHashError {
    fn from(err: KmerLengthError) -> Self {
        Self::InvalidKmerLength {
            k: err.k,
            min: err.min,
            max: err.max,
        }
    }
}

impl From<InvalidBaseError> for KmerHashError {
    fn from(err: InvalidBaseError) -> Self {
        Self::InvalidBase {
            base: err.base,
            position: err.position,
        }
    }
}

//! Progress tracking across ranks.
//!
//! Every rank bumps the same atomic counters as it inserts k-mers and
//! finishes contigs, so a caller can observe the whole run from any thread.
//!
//! # Example
//!
//! ```rust,no_run
//! use kmer_hash::builder::Assembler;
//!
//! let report = Assembler::new()
//!     .ranks(4)?
//!     .assemble_with_progress("test.txt", |progress| {
//!         eprintln!(
//!             "{} k-mers inserted, {} contigs assembled",
//!             progress.kmers_inserted, progress.contigs_assembled
//!         );
//!     })?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Progress snapshot during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    /// Number of k-mers inserted into the table so far.
    pub kmers_inserted: u64,
    /// Number of contigs walked to completion so far.
    pub contigs_assembled: u64,
}

/// Thread-safe progress tracker using atomic counters.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    kmers: AtomicU64,
    contigs: AtomicU64,
}

impl ProgressTracker {
    /// Create a new progress tracker with zero counts.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            kmers: AtomicU64::new(0),
            contigs: AtomicU64::new(0),
        }
    }

    /// Record that a rank inserted `count` k-mers.
    pub fn record_inserts(&self, count: u64) {
        self.kmers.fetch_add(count, Ordering::Relaxed);
    }

    /// Record that a contig has been assembled.
    pub fn record_contig(&self) {
        self.contigs.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of the current progress.
    ///
    /// The returned values represent the state at a point in time and may
    /// change immediately after this call returns.
    pub fn snapshot(&self) -> Progress {
        Progress {
            kmers_inserted: self.kmers.load(Ordering::Relaxed),
            contigs_assembled: self.contigs.load(Ordering::Relaxed),
        }
    }
}

//! Builder pattern API for configuring and running an assembly.
//!
//! # Example
//!
//! ```rust,no_run
//! use kmer_hash::builder::Assembler;
//! use kmer_hash::table::TableKind;
//!
//! let report = Assembler::new()
//!     .ranks(8)?
//!     .expect_k(19)?
//!     .table(TableKind::Segmented)
//!     .assemble("test.txt")?;
//!
//! for contig in report.all_contigs() {
//!     println!("{}", contig.sequence());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::{
    fmt::Debug,
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    error::{KmerHashError, KmerLengthError},
    kmer::KmerLength,
    output::ContigFormat,
    progress::Progress,
    run::{
        assemble_with_progress, print_report, write_rank_files, AssemblyOptions, AssemblyReport,
        RunMode,
    },
    table::TableKind,
};

/// A builder for configuring assembly runs.
///
/// Use [`Assembler::new()`] to create a new builder, configure it with the
/// fluent API, then call [`assemble()`](Assembler::assemble) for the report
/// alone or [`run()`](Assembler::run) to also print and write what the run
/// mode asks for.
#[derive(Debug, Clone)]
pub struct Assembler {
    options: AssemblyOptions,
    mode: RunMode,
    output_dir: PathBuf,
    format: ContigFormat,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    /// Creates a new `Assembler` builder with default settings.
    ///
    /// Default settings:
    /// - `ranks`: one per rayon worker thread
    /// - `expect_k`: None (accept whatever k the file holds)
    /// - `table`: segmented
    /// - `mode`: normal
    /// - `output_dir`: the current directory
    /// - `format`: one contig per line
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: AssemblyOptions::default(),
            mode: RunMode::Normal,
            output_dir: PathBuf::from("."),
            format: ContigFormat::Lines,
        }
    }

    /// Sets the number of ranks the input is split across.
    ///
    /// # Errors
    ///
    /// Returns [`KmerHashError::NoRanks`] for zero.
    pub fn ranks(mut self, ranks: usize) -> Result<Self, KmerHashError> {
        if ranks == 0 {
            return Err(KmerHashError::NoRanks);
        }
        self.options.ranks = ranks;
        Ok(self)
    }

    /// Requires the input to hold k-mers of exactly length `k`.
    ///
    /// # Errors
    ///
    /// Returns [`KmerLengthError`] if `k` is outside 1-32.
    ///
    /// # Example
    ///
    /// ```rust
    /// use kmer_hash::builder::Assembler;
    ///
    /// let assembler = Assembler::new().expect_k(19)?;
    /// assert_eq!(assembler.get_expect_k().map(|k| k.get()), Some(19));
    /// # Ok::<(), kmer_hash::error::KmerLengthError>(())
    /// ```
    pub fn expect_k(mut self, k: usize) -> Result<Self, KmerLengthError> {
        self.options.expect_k = Some(KmerLength::new(k)?);
        Ok(self)
    }

    #[must_use]
    pub const fn table(mut self, table: TableKind) -> Self {
        self.options.table = table;
        self
    }

    #[must_use]
    pub const fn mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// Directory that test mode writes `test_<rank>` files into.
    #[must_use]
    pub fn output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = dir.into();
        self
    }

    #[must_use]
    pub const fn contig_format(mut self, format: ContigFormat) -> Self {
        self.format = format;
        self
    }

    /// Assembles the file and returns the report without printing anything.
    ///
    /// # Errors
    ///
    /// See [`assemble`](crate::run::assemble).
    pub fn assemble<P>(&self, path: P) -> Result<AssemblyReport, KmerHashError>
    where
        P: AsRef<Path> + Debug,
    {
        self.assemble_with_progress(path, |_| {})
    }

    /// Assembles the file, invoking `callback` as ranks finish each phase.
    ///
    /// # Errors
    ///
    /// See [`assemble`](crate::run::assemble).
    pub fn assemble_with_progress<P, F>(
        &self,
        path: P,
        callback: F,
    ) -> Result<AssemblyReport, KmerHashError>
    where
        P: AsRef<Path> + Debug,
        F: Fn(Progress) + Send + Sync,
    {
        assemble_with_progress(path, &self.options, callback)
    }

    /// Assembles the file and prints the report to stdout; in test mode, writes
    /// each rank's contigs instead.
    ///
    /// # Errors
    ///
    /// Fails if assembly fails or output cannot be written.
    pub fn run<P>(&self, path: P) -> Result<AssemblyReport, KmerHashError>
    where
        P: AsRef<Path> + Debug,
    {
        self.run_to_writer(path, std::io::stdout().lock())
    }

    /// Like [`run()`](Self::run), printing to `writer`.
    ///
    /// # Errors
    ///
    /// Fails if assembly fails or output cannot be written.
    pub fn run_to_writer<P, W>(&self, path: P, writer: W) -> Result<AssemblyReport, KmerHashError>
    where
        P: AsRef<Path> + Debug,
        W: Write,
    {
        let report = self.assemble(path)?;
        print_report(writer, &report, self.mode)?;
        if self.mode == RunMode::Test {
            write_rank_files(&report, &self.output_dir, self.format)?;
        }
        Ok(report)
    }

    #[must_use]
    pub const fn get_ranks(&self) -> usize {
        self.options.ranks
    }

    #[must_use]
    pub const fn get_expect_k(&self) -> Option<KmerLength> {
        self.options.expect_k
    }

    #[must_use]
    pub const fn get_table(&self) -> TableKind {
        self.options.table
    }

    #[must_use]
    pub const fn get_mode(&self) -> RunMode {
        self.mode
    }
}

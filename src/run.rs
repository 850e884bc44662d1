//! Parallel assembly and reporting.
//!
//! A run reads a k-mer file, splits it across `n` ranks and drives them through
//! three phases, each a rayon parallel pass over the ranks:
//!
//! 1. every rank parses its block of lines;
//! 2. every rank inserts its k-mers into the shared table and collects its
//!    start nodes (k-mers with no backward extension);
//! 3. every rank walks a contig from each of its start nodes.
//!
//! A phase only begins once every rank has finished the previous one, so no
//! lookup ever races an insert.

use std::{
    fmt::Debug,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Instant,
};

use rayon::prelude::*;
use serde::Serialize;

use crate::{
    contig::{assemble_contig, Contig},
    dashmaps::DashTable,
    error::KmerHashError,
    hash_map::DistributedHashMap,
    kmer::{KmerLength, KmerPair},
    output::{write_contigs, ContigFormat},
    progress::{Progress, ProgressTracker},
    reader::KmerFile,
    table::{KmerTable, TableKind},
};

#[cfg(feature = "tracing")]
use tracing::{debug, info, info_span};

/// What a run prints and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Print insert and total timings
    #[default]
    Normal,
    /// Also print a progress line and one summary line per rank
    Verbose,
    /// Print nothing; write each rank's contigs to test_<rank>.dat
    Test,
}

impl RunMode {
    /// Reads the run-type word of a command line: `verbose` and `test` select
    /// those modes, any other word is a normal run.
    ///
    /// ```rust
    /// use kmer_hash::run::RunMode;
    ///
    /// assert_eq!(RunMode::from_word("verbose"), RunMode::Verbose);
    /// assert_eq!(RunMode::from_word("test"), RunMode::Test);
    /// assert_eq!(RunMode::from_word("fast"), RunMode::Normal);
    /// ```
    #[must_use]
    pub fn from_word(word: &str) -> Self {
        match word {
            "verbose" => Self::Verbose,
            "test" => Self::Test,
            _ => Self::Normal,
        }
    }
}

/// Settings for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyOptions {
    /// Number of ranks the input is split across.
    pub ranks: usize,
    /// Fail unless the file holds k-mers of exactly this length.
    pub expect_k: Option<KmerLength>,
    /// Table implementation shared by the ranks.
    pub table: TableKind,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            ranks: rayon::current_num_threads(),
            expect_k: None,
            table: TableKind::default(),
        }
    }
}

/// What one rank did during a run.
#[derive(Debug, Clone)]
pub struct RankReport {
    pub rank: usize,
    /// Contigs walked from this rank's start nodes, in start-node order.
    pub contigs: Vec<Contig>,
    pub start_nodes: usize,
    /// Seconds this rank spent walking contigs.
    pub read_secs: f64,
    /// Seconds this rank spent inserting.
    pub insert_secs: f64,
    /// Seconds from the start of the insert phase to the end of the run.
    pub total_secs: f64,
}

impl RankReport {
    /// Number of k-mers across this rank's contigs.
    #[must_use]
    pub fn kmers_in_contigs(&self) -> usize {
        self.contigs.iter().map(Contig::len).sum()
    }
}

/// Result of a run.
#[derive(Debug, Clone)]
pub struct AssemblyReport {
    pub k: usize,
    pub table: TableKind,
    pub table_capacity: usize,
    pub table_len: usize,
    /// One entry per rank, in rank order.
    pub ranks: Vec<RankReport>,
    /// Seconds from the start of the insert phase until every rank finished it.
    pub insert_secs: f64,
    /// Seconds from the start of the insert phase until every rank finished.
    pub total_secs: f64,
}

impl AssemblyReport {
    /// Every contig, rank by rank.
    pub fn all_contigs(&self) -> impl Iterator<Item = &Contig> {
        self.ranks.iter().flat_map(|rank| rank.contigs.iter())
    }

    #[must_use]
    pub fn contig_count(&self) -> usize {
        self.ranks.iter().map(|rank| rank.contigs.len()).sum()
    }

    /// Number of k-mers placed on contigs across all ranks.
    #[must_use]
    pub fn total_kmers(&self) -> usize {
        self.ranks.iter().map(RankReport::kmers_in_contigs).sum()
    }

    /// `(total_secs, insert_secs)`, the shape of the recorded benchmark series.
    #[must_use]
    pub const fn timing_point(&self) -> (f64, f64) {
        (self.total_secs, self.insert_secs)
    }
}

/// Assembles every contig in a k-mer file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, if its k differs
/// from `options.expect_k`, if the table fills up, or if a contig walk breaks.
///
/// # Example
///
/// ```rust,no_run
/// use kmer_hash::run::{assemble, AssemblyOptions};
///
/// let report = assemble("test.txt", &AssemblyOptions::default())?;
/// println!("{} contigs", report.contig_count());
/// # Ok::<(), kmer_hash::error::KmerHashError>(())
/// ```
pub fn assemble<P>(path: P, options: &AssemblyOptions) -> Result<AssemblyReport, KmerHashError>
where
    P: AsRef<Path> + Debug,
{
    assemble_with_progress(path, options, |_| {})
}

/// Like [`assemble`], invoking `callback` each time a rank finishes a phase.
///
/// # Errors
///
/// See [`assemble`].
pub fn assemble_with_progress<P, F>(
    path: P,
    options: &AssemblyOptions,
    callback: F,
) -> Result<AssemblyReport, KmerHashError>
where
    P: AsRef<Path> + Debug,
    F: Fn(Progress) + Send + Sync,
{
    if options.ranks == 0 {
        return Err(KmerHashError::NoRanks);
    }

    #[cfg(feature = "tracing")]
    info!(path = ?path, ranks = options.ranks, table = %options.table, "Starting assembly");

    let file = KmerFile::open(&path)?;
    if let Some(expected) = options.expect_k {
        if file.k() != expected.get() {
            return Err(KmerHashError::KmerLengthMismatch {
                path: path.as_ref().to_path_buf(),
                found: file.k(),
                expected: expected.get(),
            });
        }
    }

    let n_kmers = file.line_count();
    let table: Box<dyn KmerTable> = match options.table {
        TableKind::Segmented => Box::new(DistributedHashMap::new(n_kmers, options.ranks)),
        TableKind::Dashmap => Box::new(DashTable::new(n_kmers, options.ranks)),
    };

    let mut report = assemble_file(&file, table.as_ref(), options.ranks, &callback)?;
    report.table = options.table;
    Ok(report)
}

/// A rank's state between the insert and assembly phases.
struct InsertedRank {
    rank: usize,
    start_nodes: Vec<KmerPair>,
    insert_secs: f64,
}

/// Runs the three phases over an already opened file and an empty table.
///
/// # Errors
///
/// See [`assemble`].
pub fn assemble_file<T, F>(
    file: &KmerFile,
    table: &T,
    n_ranks: usize,
    callback: &F,
) -> Result<AssemblyReport, KmerHashError>
where
    T: KmerTable + ?Sized,
    F: Fn(Progress) + Send + Sync,
{
    if n_ranks == 0 {
        return Err(KmerHashError::NoRanks);
    }
    let tracker = ProgressTracker::new();

    let rank_kmers: Vec<Vec<KmerPair>> = {
        #[cfg(feature = "tracing")]
        let _span = info_span!("read_kmers", ranks = n_ranks).entered();

        (0..n_ranks)
            .into_par_iter()
            .map(|rank| file.rank_kmers(n_ranks, rank))
            .collect::<Result<_, _>>()?
    };

    let phase_start = Instant::now();

    let inserted: Vec<InsertedRank> = {
        #[cfg(feature = "tracing")]
        let _span = info_span!("insert_kmers", kmers = file.line_count()).entered();

        rank_kmers
            .into_par_iter()
            .enumerate()
            .map(|(rank, kmers)| {
                let start = Instant::now();
                let mut start_nodes = Vec::new();
                for pair in &kmers {
                    if !table.insert(pair) {
                        return Err(KmerHashError::HashMapFull {
                            capacity: table.capacity(),
                        });
                    }
                    if pair.is_start() {
                        start_nodes.push(*pair);
                    }
                }
                tracker.record_inserts(kmers.len() as u64);
                callback(tracker.snapshot());

                #[cfg(feature = "tracing")]
                debug!(rank, kmers = kmers.len(), start_nodes = start_nodes.len(), "Rank finished inserting");

                Ok(InsertedRank {
                    rank,
                    start_nodes,
                    insert_secs: start.elapsed().as_secs_f64(),
                })
            })
            .collect::<Result<_, _>>()?
    };

    let insert_secs = phase_start.elapsed().as_secs_f64();

    #[cfg(feature = "tracing")]
    info!(insert_secs, table_len = table.len(), "Finished inserting");

    let walked: Vec<(InsertedRank, Vec<Contig>, f64)> = {
        #[cfg(feature = "tracing")]
        let _span = info_span!("assemble_contigs").entered();

        let max_len = table.len();
        inserted
            .into_par_iter()
            .map(|rank| -> Result<_, KmerHashError> {
                let start = Instant::now();
                let contigs = rank
                    .start_nodes
                    .iter()
                    .map(|start_node| -> Result<Contig, KmerHashError> {
                        let contig = assemble_contig(table, *start_node, max_len)?;
                        tracker.record_contig();
                        Ok(contig)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                callback(tracker.snapshot());
                let read_secs = start.elapsed().as_secs_f64();
                Ok((rank, contigs, read_secs))
            })
            .collect::<Result<_, _>>()?
    };

    let total_secs = phase_start.elapsed().as_secs_f64();

    let ranks: Vec<RankReport> = walked
        .into_iter()
        .map(|(inserted, contigs, read_secs)| RankReport {
            rank: inserted.rank,
            start_nodes: inserted.start_nodes.len(),
            contigs,
            read_secs,
            insert_secs: inserted.insert_secs,
            total_secs,
        })
        .collect();

    let report = AssemblyReport {
        k: file.k(),
        table: TableKind::default(),
        table_capacity: table.capacity(),
        table_len: table.len(),
        ranks,
        insert_secs,
        total_secs,
    };

    #[cfg(feature = "tracing")]
    {
        let progress = tracker.snapshot();
        info!(
            contigs = report.contig_count(),
            kmers = report.total_kmers(),
            kmers_inserted = progress.kmers_inserted,
            contigs_assembled = progress.contigs_assembled,
            total_secs,
            "Assembly complete"
        );
    }

    Ok(report)
}

/// Prints the timing lines and, in verbose mode, the per-rank summaries.
///
/// Test mode prints nothing.
///
/// # Errors
///
/// Returns [`KmerHashError::WriteError`] if `out` fails.
pub fn print_report<W: Write>(
    mut out: W,
    report: &AssemblyReport,
    mode: RunMode,
) -> Result<(), KmerHashError> {
    if mode == RunMode::Test {
        return Ok(());
    }
    if mode == RunMode::Verbose {
        writeln!(out, "Finished reading kmers.")?;
    }
    writeln!(out, "Finished inserting in {:.6}", report.insert_secs)?;
    writeln!(out, "Assembled in {:.6} total", report.total_secs)?;

    if mode == RunMode::Verbose {
        for rank in &report.ranks {
            writeln!(
                out,
                "Rank {} reconstructed {} contigs with {} nodes from {} start nodes. ({:.6} read, {:.6} insert, {:.6} total)",
                rank.rank,
                rank.contigs.len(),
                rank.kmers_in_contigs(),
                rank.start_nodes,
                rank.read_secs,
                rank.insert_secs,
                rank.total_secs,
            )?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Path of the contig file written for `rank`.
#[must_use]
pub fn rank_file_path(dir: &Path, rank: usize, format: ContigFormat) -> PathBuf {
    dir.join(format!("test_{rank}.{}", format.extension()))
}

/// Writes each rank's contigs to its own file in `dir`, returning the paths.
///
/// # Errors
///
/// Returns [`KmerHashError::ContigWrite`] if a file cannot be created or written.
pub fn write_rank_files(
    report: &AssemblyReport,
    dir: &Path,
    format: ContigFormat,
) -> Result<Vec<PathBuf>, KmerHashError> {
    report
        .ranks
        .par_iter()
        .map(|rank| -> Result<PathBuf, KmerHashError> {
            let path = rank_file_path(dir, rank.rank, format);
            let write_err = |source| KmerHashError::ContigWrite {
                source,
                path: path.clone(),
            };
            let file = File::create(&path).map_err(write_err)?;
            write_contigs(BufWriter::new(file), rank.rank, &rank.contigs, format).map_err(
                |e| match e {
                    KmerHashError::WriteError { source } => write_err(source),
                    other => other,
                },
            )?;
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    // Two contigs: ACGTTA (k=4) and GGCCA.
    const KMERS: &[u8] = b"ACGT FT\nCGTT AA\nGTTA TF\nGGCC FA\nGCCA GF\n";

    fn report(n_ranks: usize) -> AssemblyReport {
        let file = KmerFile::from_bytes(Bytes::from_static(KMERS));
        let table = DistributedHashMap::new(file.line_count(), n_ranks);
        assemble_file(&file, &table, n_ranks, &|_| {}).unwrap()
    }

    fn sorted_sequences(report: &AssemblyReport) -> Vec<String> {
        let mut seqs: Vec<_> = report.all_contigs().map(Contig::sequence).collect();
        seqs.sort();
        seqs
    }

    #[test]
    fn same_contigs_for_any_rank_count() {
        for n_ranks in 1..=7 {
            let report = report(n_ranks);
            assert_eq!(report.ranks.len(), n_ranks);
            assert_eq!(sorted_sequences(&report), ["ACGTTA", "GGCCA"]);
            assert_eq!(report.total_kmers(), 5);
            assert_eq!(report.table_len, 5);
        }
    }

    #[test]
    fn start_nodes_belong_to_the_rank_that_read_them() {
        let report = report(2);
        // Rank 0 reads lines 1-2 (one start node), rank 1 reads lines 3-5.
        assert_eq!(report.ranks[0].start_nodes, 1);
        assert_eq!(report.ranks[1].start_nodes, 1);
        assert_eq!(report.ranks[0].contigs[0].sequence(), "ACGTTA");
        assert_eq!(report.ranks[1].contigs[0].sequence(), "GGCCA");
    }

    #[test]
    fn full_table_is_an_error() {
        let file = KmerFile::from_bytes(Bytes::from_static(KMERS));
        let table = DistributedHashMap::with_segments(2, 2);
        let err = assemble_file(&file, &table, 2, &|_| {}).unwrap_err();
        assert!(matches!(err, KmerHashError::HashMapFull { capacity: 4 }));
    }

    #[test]
    fn callback_sees_final_counts() {
        let file = KmerFile::from_bytes(Bytes::from_static(KMERS));
        let table = DistributedHashMap::new(file.line_count(), 3);
        let last = std::sync::Mutex::new(Progress::default());
        assemble_file(&file, &table, 3, &|progress: Progress| {
            let mut last = last.lock().unwrap();
            if progress.kmers_inserted >= last.kmers_inserted
                && progress.contigs_assembled >= last.contigs_assembled
            {
                *last = progress;
            }
        })
        .unwrap();
        let last = last.into_inner().unwrap();
        assert_eq!(last.kmers_inserted, 5);
        assert_eq!(last.contigs_assembled, 2);
    }

    #[test]
    fn verbose_report_layout() {
        let mut report = report(2);
        report.insert_secs = 0.5;
        report.total_secs = 1.25;
        for rank in &mut report.ranks {
            rank.read_secs = 0.25;
            rank.insert_secs = 0.5;
            rank.total_secs = 1.25;
        }
        let mut out = Vec::new();
        print_report(&mut out, &report, RunMode::Verbose).unwrap();
        insta::assert_snapshot!(String::from_utf8(out).unwrap(), @r"
        Finished reading kmers.
        Finished inserting in 0.500000
        Assembled in 1.250000 total
        Rank 0 reconstructed 1 contigs with 3 nodes from 1 start nodes. (0.250000 read, 0.500000 insert, 1.250000 total)
        Rank 1 reconstructed 1 contigs with 2 nodes from 1 start nodes. (0.250000 read, 0.500000 insert, 1.250000 total)
        ");
    }

    #[test]
    fn test_mode_prints_nothing() {
        let mut out = Vec::new();
        print_report(&mut out, &report(1), RunMode::Test).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn rank_files_hold_each_ranks_contigs() {
        let dir = tempfile::tempdir().unwrap();
        let report = report(2);
        let paths = write_rank_files(&report, dir.path(), ContigFormat::Lines).unwrap();
        assert_eq!(paths, [dir.path().join("test_0.dat"), dir.path().join("test_1.dat")]);
        assert_eq!(std::fs::read_to_string(&paths[0]).unwrap(), "ACGTTA\n");
        assert_eq!(std::fs::read_to_string(&paths[1]).unwrap(), "GGCCA\n");
    }

    #[test]
    fn zero_ranks_is_rejected() {
        let file = KmerFile::from_bytes(Bytes::from_static(KMERS));
        let table = DistributedHashMap::new(5, 1);
        assert!(matches!(
            assemble_file(&file, &table, 0, &|_| {}),
            Err(KmerHashError::NoRanks)
        ));
    }
}

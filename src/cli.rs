//! Command-line interface definition.

use clap::Parser;
use std::path::PathBuf;

use crate::{kmer::MAX_K, output::ContigFormat, run::RunMode, table::TableKind};

/// Parallel k-mer hash table and de Bruijn contig assembler.
#[derive(Parser, Debug)]
#[command(name = "kmer_hash")]
#[command(version, author, about, long_about = None)]
pub struct Args {
    /// Path to a k-mer file (one `<KMER> <BF>` entry per line)
    pub kmer_file: PathBuf,

    /// Run type: `verbose` adds per-rank lines, `test` writes test_<rank> files;
    /// any other word is a normal run
    #[arg(value_parser = parse_run_type, default_value = "normal")]
    pub run_type: RunMode,

    /// Number of ranks to split the input across [default: one per thread]
    #[arg(short = 'n', long, value_parser = parse_ranks)]
    pub ranks: Option<usize>,

    /// Fail unless the file holds k-mers of this length (1-32)
    #[arg(short = 'k', long, value_parser = parse_k)]
    pub expect_k: Option<usize>,

    /// Hash table implementation
    #[arg(long, value_enum, default_value = "segmented")]
    pub table: TableKind,

    /// Format of the per-rank contig files written in test mode
    #[arg(short, long, value_enum, default_value = "lines")]
    pub format: ContigFormat,

    /// Directory test mode writes its contig files into
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Suppress the informational header
    #[arg(short, long)]
    pub quiet: bool,
}

#[allow(clippy::unnecessary_wraps)]
fn parse_run_type(s: &str) -> Result<RunMode, String> {
    Ok(RunMode::from_word(s))
}

fn parse_ranks(s: &str) -> Result<usize, String> {
    let ranks: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if ranks == 0 {
        return Err("at least one rank is required".to_string());
    }
    Ok(ranks)
}

fn parse_k(s: &str) -> Result<usize, String> {
    let k: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if k == 0 {
        return Err("k-mer length must be at least 1".to_string());
    }
    if k > usize::from(MAX_K) {
        return Err(format!("k-mer length must be at most {MAX_K}"));
    }
    Ok(k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_defaults() {
        let args = Args::try_parse_from(["kmer_hash", "test.txt"]).unwrap();
        assert_eq!(args.kmer_file, PathBuf::from("test.txt"));
        assert_eq!(args.run_type, RunMode::Normal);
        assert_eq!(args.table, TableKind::Segmented);
        assert_eq!(args.format, ContigFormat::Lines);
        assert!(args.ranks.is_none());
        assert!(args.expect_k.is_none());
        assert!(!args.quiet);
    }

    #[test]
    fn run_type_and_options() {
        let args = Args::try_parse_from([
            "kmer_hash", "test.txt", "verbose", "-n", "4", "-k", "19", "--table", "dashmap",
        ])
        .unwrap();
        assert_eq!(args.run_type, RunMode::Verbose);
        assert_eq!(args.ranks, Some(4));
        assert_eq!(args.expect_k, Some(19));
        assert_eq!(args.table, TableKind::Dashmap);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Args::try_parse_from(["kmer_hash", "t.txt", "-n", "0"]).is_err());
        assert!(Args::try_parse_from(["kmer_hash", "t.txt", "-k", "33"]).is_err());
        assert!(Args::try_parse_from(["kmer_hash", "t.txt", "-k", "0"]).is_err());
        assert!(Args::try_parse_from(["kmer_hash", "t.txt", "-k", "abc"]).is_err());
    }

    #[test]
    fn unknown_run_type_is_a_normal_run() {
        for word in ["loud", "normal", "Verbose"] {
            let args = Args::try_parse_from(["kmer_hash", "t.txt", word]).unwrap();
            assert_eq!(args.run_type, RunMode::Normal, "{word}");
        }
        let args = Args::try_parse_from(["kmer_hash", "t.txt", "test"]).unwrap();
        assert_eq!(args.run_type, RunMode::Test);
    }

    #[test]
    fn parse_k_bounds() {
        assert_eq!(parse_k("1"), Ok(1));
        assert_eq!(parse_k("32"), Ok(32));
        assert!(parse_k("33").unwrap_err().contains("at most 32"));
    }
}

//! Prints the recorded benchmark series and cluster launch commands.

use std::{
    io::{self, Write},
    process,
};

use clap::{Parser, ValueEnum};
use colored::Colorize;
use kmer_hash::{
    bench::{self, BenchSeries},
    error::KmerHashError,
    launch,
};

/// Recorded kmer_hash timings, as (total, insert) seconds per run.
#[derive(Parser, Debug)]
#[command(name = "bench_series")]
#[command(version, author, about, long_about = None)]
struct Args {
    /// Only print this series (e.g. test_dataset_1)
    series: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "tsv")]
    format: SeriesFormat,

    /// Print the Slurm commands the series were recorded with instead
    #[arg(long)]
    commands: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SeriesFormat {
    /// series<TAB>run<TAB>total<TAB>insert
    Tsv,
    /// JSON array of {name, points}
    Json,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args, io::stdout().lock()) {
        eprintln!(
            "{}\n {}",
            "Application error:".blue().bold(),
            e.to_string().blue()
        );
        process::exit(1);
    }
}

fn run<W: Write>(args: &Args, mut out: W) -> Result<(), KmerHashError> {
    if args.commands {
        for launch in launch::recorded() {
            writeln!(out, "{launch}")?;
        }
        return Ok(());
    }

    let selected: Vec<BenchSeries> = match &args.series {
        Some(name) => match bench::by_name(name) {
            Some(series) => vec![*series],
            None => {
                let known: Vec<_> = bench::all().iter().map(|s| s.name).collect();
                return Err(KmerHashError::UnknownSeries {
                    name: name.clone(),
                    known: known.join(", "),
                });
            }
        },
        None => bench::all().to_vec(),
    };

    match args.format {
        SeriesFormat::Tsv => {
            for series in &selected {
                for (run, (total, insert)) in series.points().iter().enumerate() {
                    writeln!(out, "{}\t{run}\t{total:.6}\t{insert:.6}", series.name)?;
                }
            }
        }
        SeriesFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &selected)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

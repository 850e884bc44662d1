use std::process;

use clap::Parser;
use colored::Colorize;
use kmer_hash::{builder::Assembler, cli::Args, error::KmerHashError, run::RunMode};

fn main() {
    let args = Args::parse();

    #[cfg(feature = "tracing")]
    init_tracing();

    if let Err(e) = run(&args) {
        eprintln!(
            "{}\n {}",
            "Application error:".blue().bold(),
            e.to_string().blue()
        );
        process::exit(1);
    }
}

/// Logs to stderr, filtered by `RUST_LOG` (warnings only by default).
#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn run(args: &Args) -> Result<(), KmerHashError> {
    let mut assembler = Assembler::new()
        .mode(args.run_type)
        .table(args.table)
        .contig_format(args.format)
        .output_dir(&args.output_dir);
    if let Some(ranks) = args.ranks {
        assembler = assembler.ranks(ranks)?;
    }
    if let Some(k) = args.expect_k {
        assembler = assembler.expect_k(k)?;
    }

    if !args.quiet && args.run_type != RunMode::Test {
        eprintln!(
            "{}: {}",
            "data".bold(),
            args.kmer_file.display().to_string().underline().bold().blue()
        );
        eprintln!(
            "{}: {}",
            "ranks".bold(),
            assembler.get_ranks().to_string().blue().bold()
        );
        eprintln!(
            "{}: {}",
            "table".bold(),
            assembler.get_table().to_string().blue().bold()
        );
        eprintln!();
    }

    assembler.run(&args.kmer_file)?;
    Ok(())
}

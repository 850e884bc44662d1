//! Contig serialization.

use std::io::Write;

use clap::ValueEnum;

use crate::{
    contig::{Contig, ContigRecord},
    error::KmerHashError,
};

/// Output format for assembled contigs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ContigFormat {
    /// One contig sequence per line
    #[default]
    Lines,
    /// FASTA records (>rank{r}_contig{i} kmers={n})
    Fasta,
    /// JSON array of {rank, kmers, sequence}
    Json,
}

impl ContigFormat {
    /// File extension used for per-rank contig files.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Lines => "dat",
            Self::Fasta => "fa",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for ContigFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lines => write!(f, "lines"),
            Self::Fasta => write!(f, "fasta"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Writes the contigs `rank` assembled to `writer`.
///
/// # Errors
///
/// Returns [`KmerHashError::WriteError`] or [`KmerHashError::JsonError`] when
/// the writer fails.
pub fn write_contigs<W: Write>(
    mut writer: W,
    rank: usize,
    contigs: &[Contig],
    format: ContigFormat,
) -> Result<(), KmerHashError> {
    match format {
        ContigFormat::Lines => {
            for contig in contigs {
                writeln!(writer, "{}", contig.sequence())?;
            }
            writer.flush()?;
        }
        ContigFormat::Fasta => {
            let mut fasta = bio::io::fasta::Writer::new(writer);
            for (i, contig) in contigs.iter().enumerate() {
                fasta.write(
                    &format!("rank{rank}_contig{i}"),
                    Some(&format!("kmers={}", contig.len())),
                    contig.sequence().as_bytes(),
                )?;
            }
            fasta.flush()?;
        }
        ContigFormat::Json => {
            let records: Vec<ContigRecord> = contigs
                .iter()
                .map(|contig| ContigRecord {
                    rank,
                    kmers: contig.len(),
                    sequence: contig.sequence(),
                })
                .collect();
            serde_json::to_writer_pretty(&mut writer, &records)?;
            writeln!(writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}

//! K-mer file access.
//!
//! A k-mer file holds one k-mer per line followed by its two-letter extension
//! code, e.g. `GATTACAGATTACAGATTA FC`. Every line carries a k-mer of the same
//! length. Ranks split the file into contiguous blocks of lines; the last rank
//! also takes whatever is left over.

use std::{fmt::Debug, io::Read, ops::Range, path::Path};

use bytes::Bytes;

use crate::{error::KmerHashError, kmer::KmerPair};

#[cfg(feature = "tracing")]
use tracing::debug;

/// A k-mer file loaded into memory, split into lines.
#[derive(Debug, Clone)]
pub struct KmerFile {
    /// Non-empty lines with their 1-based line numbers.
    lines: Vec<(usize, Bytes)>,
    k: usize,
}

impl KmerFile {
    /// Reads the whole file and determines k from its first line.
    ///
    /// # Errors
    ///
    /// Returns [`KmerHashError::KmerRead`] if the file cannot be read and
    /// [`KmerHashError::EmptyInput`] if it contains no k-mers.
    pub fn open<P>(path: P) -> Result<Self, KmerHashError>
    where
        P: AsRef<Path> + Debug,
    {
        let path = path.as_ref();
        let data = read_bytes(path)?;
        let file = Self::from_bytes(data);

        if file.lines.is_empty() {
            return Err(KmerHashError::EmptyInput {
                path: path.to_path_buf(),
            });
        }

        #[cfg(feature = "tracing")]
        debug!(path = ?path, lines = file.lines.len(), k = file.k, "Loaded k-mer file");

        Ok(file)
    }

    /// Splits in-memory file contents into lines without copying them.
    #[must_use]
    pub fn from_bytes(data: Bytes) -> Self {
        let mut lines = Vec::new();
        let mut start = 0;

        for (line_no, raw) in data.split(|&b| b == b'\n').enumerate() {
            let end = start + raw.len();
            if raw.iter().any(|b| !b.is_ascii_whitespace()) {
                lines.push((line_no + 1, data.slice(start..end)));
            }
            start = end + 1;
        }

        let k = lines
            .first()
            .and_then(|(_, line)| {
                line.split(u8::is_ascii_whitespace)
                    .find(|field| !field.is_empty())
            })
            .map_or(0, <[u8]>::len);

        Self { lines, k }
    }

    /// Length of the k-mers on the first line.
    #[must_use]
    pub const fn k(&self) -> usize {
        self.k
    }

    /// Number of k-mer lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Parses the block of lines that belongs to `rank` out of `n_ranks`.
    ///
    /// # Errors
    ///
    /// Returns [`KmerHashError::KmerParse`] for malformed lines and
    /// [`KmerHashError::InconsistentKmerLength`] for k-mers whose length differs
    /// from the first line's.
    pub fn rank_kmers(&self, n_ranks: usize, rank: usize) -> Result<Vec<KmerPair>, KmerHashError> {
        let range = rank_range(self.lines.len(), n_ranks, rank);
        self.parse(&self.lines[range])
    }

    /// Parses every line in the file.
    pub fn all_kmers(&self) -> Result<Vec<KmerPair>, KmerHashError> {
        self.parse(&self.lines)
    }

    fn parse(&self, lines: &[(usize, Bytes)]) -> Result<Vec<KmerPair>, KmerHashError> {
        lines
            .iter()
            .map(|(line_no, line)| {
                let pair = KmerPair::parse_line(line, *line_no)?;
                let found = pair.kmer.len().get();
                if found == self.k {
                    Ok(pair)
                } else {
                    Err(KmerHashError::InconsistentKmerLength {
                        line: *line_no,
                        found,
                        expected: self.k,
                    })
                }
            })
            .collect()
    }
}

/// The half-open block of line indices handled by `rank`.
///
/// Every rank gets `n_lines / n_ranks` lines; the last one also takes the
/// remainder. `n_ranks` of zero is treated as one.
///
/// ```rust
/// use kmer_hash::reader::rank_range;
///
/// assert_eq!(rank_range(10, 3, 0), 0..3);
/// assert_eq!(rank_range(10, 3, 1), 3..6);
/// assert_eq!(rank_range(10, 3, 2), 6..10);
/// ```
#[must_use]
pub fn rank_range(n_lines: usize, n_ranks: usize, rank: usize) -> Range<usize> {
    let n_ranks = n_ranks.max(1);
    let split = n_lines / n_ranks;
    let start = (split * rank).min(n_lines);
    let end = if rank + 1 >= n_ranks {
        n_lines
    } else {
        start + split
    };
    start..end
}

/// Returns the length of the k-mers in a k-mer file.
///
/// # Errors
///
/// Fails if the file cannot be read or holds no k-mers.
pub fn kmer_size<P>(path: P) -> Result<usize, KmerHashError>
where
    P: AsRef<Path> + Debug,
{
    KmerFile::open(path).map(|file| file.k())
}

/// Counts the k-mer lines in a file.
///
/// # Errors
///
/// Fails if the file cannot be read or holds no k-mers.
pub fn line_count<P>(path: P) -> Result<usize, KmerHashError>
where
    P: AsRef<Path> + Debug,
{
    KmerFile::open(path).map(|file| file.line_count())
}

/// Reads the k-mers belonging to `rank` out of `n_ranks`.
///
/// # Errors
///
/// Fails if the file cannot be read or a line in the rank's block is malformed.
pub fn read_kmers<P>(path: P, n_ranks: usize, rank: usize) -> Result<Vec<KmerPair>, KmerHashError>
where
    P: AsRef<Path> + Debug,
{
    KmerFile::open(path)?.rank_kmers(n_ranks, rank)
}

/// Reads every k-mer in a file.
///
/// # Errors
///
/// Fails if the file cannot be read or any line is malformed.
pub fn read_all<P>(path: P) -> Result<Vec<KmerPair>, KmerHashError>
where
    P: AsRef<Path> + Debug,
{
    KmerFile::open(path)?.all_kmers()
}

/// Check if a path has a gzip extension (.gz).
#[cfg(feature = "gzip")]
fn is_gzip_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

fn read_bytes(path: &Path) -> Result<Bytes, KmerHashError> {
    let read_err = |source| KmerHashError::KmerRead {
        source,
        path: path.to_path_buf(),
    };

    let mut file = std::fs::File::open(path).map_err(read_err)?;
    let mut buf = Vec::new();

    #[cfg(feature = "gzip")]
    {
        if is_gzip_path(path) {
            flate2::read::GzDecoder::new(file)
                .read_to_end(&mut buf)
                .map_err(read_err)?;
            return Ok(Bytes::from(buf));
        }
    }

    file.read_to_end(&mut buf).map_err(read_err)?;
    Ok(Bytes::from(buf))
}

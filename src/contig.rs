//! Contig assembly by walking forward extensions through a [`KmerTable`].

use serde::Serialize;

use crate::{error::KmerHashError, kmer::KmerPair, table::KmerTable};

/// An ordered run of k-mers, each overlapping the next by `k - 1` bases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contig(Vec<KmerPair>);

impl Contig {
    #[must_use]
    pub fn kmers(&self) -> &[KmerPair] {
        &self.0
    }

    /// Number of k-mers on the contig.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The assembled sequence: the first k-mer, then every forward extension.
    ///
    /// ```rust
    /// use kmer_hash::contig::Contig;
    /// use kmer_hash::kmer::KmerPair;
    ///
    /// let contig: Contig = ["ACG FT", "CGT AA", "GTA CF"]
    ///     .iter()
    ///     .map(|line| KmerPair::parse_line(line.as_bytes(), 1))
    ///     .collect::<Result<Vec<_>, _>>()?
    ///     .into();
    /// assert_eq!(contig.sequence(), "ACGTA");
    /// # Ok::<(), kmer_hash::error::KmerHashError>(())
    /// ```
    #[must_use]
    pub fn sequence(&self) -> String {
        let Some(first) = self.0.first() else {
            return String::new();
        };

        let mut seq = first.kmer.to_string();
        seq.extend(
            self.0
                .iter()
                .filter_map(|pair| pair.forward_ext().base())
                .map(|base| char::from(base.as_byte())),
        );
        seq
    }
}

impl From<Vec<KmerPair>> for Contig {
    fn from(kmers: Vec<KmerPair>) -> Self {
        Self(kmers)
    }
}

/// A contig as written to JSON.
#[derive(Debug, Serialize)]
pub struct ContigRecord {
    pub rank: usize,
    pub kmers: usize,
    pub sequence: String,
}

/// Walks forward from `start` until a k-mer with no forward extension.
///
/// `max_len` bounds the walk: a table of `n` k-mers cannot produce a longer
/// contig, so a walk past it means the extensions form a cycle.
///
/// # Errors
///
/// Returns [`KmerHashError::KmerNotFound`] when a successor is missing from the
/// table and [`KmerHashError::ContigCycle`] when the walk exceeds `max_len`.
pub fn assemble_contig<T>(table: &T, start: KmerPair, max_len: usize) -> Result<Contig, KmerHashError>
where
    T: KmerTable + ?Sized,
{
    let mut contig = vec![start];
    let mut current = start;

    while let Some(next) = current.next_kmer() {
        if contig.len() >= max_len {
            return Err(KmerHashError::ContigCycle {
                start: start.kmer.to_string(),
                limit: max_len,
            });
        }
        current = table.find(&next).ok_or_else(|| KmerHashError::KmerNotFound {
            kmer: next.to_string(),
        })?;
        contig.push(current);
    }

    Ok(Contig(contig))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_map::DistributedHashMap;

    fn load(lines: &[&str]) -> (DistributedHashMap, Vec<KmerPair>) {
        let pairs: Vec<_> = lines
            .iter()
            .enumerate()
            .map(|(i, line)| KmerPair::parse_line(line.as_bytes(), i + 1).unwrap())
            .collect();
        let table = DistributedHashMap::new(pairs.len(), 2);
        for pair in &pairs {
            assert!(table.insert(pair));
        }
        (table, pairs)
    }

    #[test]
    fn walks_to_the_end() {
        let (table, pairs) = load(&["GAT FT", "ATT GA", "TTA TC", "TAC TF"]);
        let contig = assemble_contig(&table, pairs[0], table.capacity()).unwrap();
        assert_eq!(contig.len(), 4);
        insta::assert_snapshot!(contig.sequence(), @"GATTAC");
    }

    #[test]
    fn single_kmer_contig() {
        let (table, pairs) = load(&["GATTACA FF"]);
        let contig = assemble_contig(&table, pairs[0], table.capacity()).unwrap();
        assert_eq!(contig.sequence(), "GATTACA");
    }

    #[test]
    fn missing_successor_is_reported() {
        let (table, pairs) = load(&["GAT FT", "TTA TF"]);
        let err = assemble_contig(&table, pairs[0], table.capacity()).unwrap_err();
        assert!(matches!(err, KmerHashError::KmerNotFound { ref kmer } if kmer == "ATT"));
    }

    #[test]
    fn cycles_are_cut_off() {
        // AC -> CA -> AC -> ...
        let (table, pairs) = load(&["AC FA", "CA AC"]);
        let err = assemble_contig(&table, pairs[0], table.capacity()).unwrap_err();
        assert!(matches!(err, KmerHashError::ContigCycle { .. }));
    }

    #[test]
    fn empty_contig_has_empty_sequence() {
        assert_eq!(Contig::from(Vec::new()).sequence(), "");
    }
}

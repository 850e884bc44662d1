//! Packed k-mers and their extension codes.
//!
//! A k-mer of length `1 <= k <= 32` packs into the low `2k` bits of a `u64`,
//! two bits per base (`A=0`, `C=1`, `G=2`, `T=3`), first base in the highest
//! occupied bits. Each k-mer in a k-mer file carries a two-letter extension
//! code: the base preceding it and the base following it in the genome, with
//! `F` standing in when there is none.

use std::{fmt, hash::Hasher, str::FromStr};

use rustc_hash::FxHasher;
use serde::Serialize;

use crate::error::{InvalidBaseError, KmerHashError, KmerLengthError};

/// Shortest supported k-mer.
pub const MIN_K: u8 = 1;

/// Longest k-mer that fits in a `u64`.
pub const MAX_K: u8 = 32;

/// A validated k-mer length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct KmerLength(u8);

impl KmerLength {
    /// Validates `k` against the supported range.
    ///
    /// # Example
    ///
    /// ```rust
    /// use kmer_hash::kmer::KmerLength;
    ///
    /// assert_eq!(KmerLength::new(19)?.get(), 19);
    /// assert!(KmerLength::new(0).is_err());
    /// assert!(KmerLength::new(33).is_err());
    /// # Ok::<(), kmer_hash::error::KmerLengthError>(())
    /// ```
    pub fn new(k: usize) -> Result<Self, KmerLengthError> {
        match u8::try_from(k) {
            Ok(k) if (MIN_K..=MAX_K).contains(&k) => Ok(Self(k)),
            _ => Err(KmerLengthError {
                k,
                min: MIN_K,
                max: MAX_K,
            }),
        }
    }

    /// Returns the length as a `usize`.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0 as usize
    }

    /// Mask covering the `2k` bits a k-mer of this length occupies.
    const fn mask(self) -> u64 {
        if self.0 == MAX_K {
            u64::MAX
        } else {
            (1 << (2 * self.0)) - 1
        }
    }
}

impl fmt::Display for KmerLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single nucleotide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base {
    A,
    C,
    G,
    T,
}

impl Base {
    /// Parses an uppercase ASCII base, reporting `position` on failure.
    pub const fn from_byte(byte: u8, position: usize) -> Result<Self, InvalidBaseError> {
        match byte {
            b'A' => Ok(Self::A),
            b'C' => Ok(Self::C),
            b'G' => Ok(Self::G),
            b'T' => Ok(Self::T),
            base => Err(InvalidBaseError { base, position }),
        }
    }

    /// The two low bits of `bits`, as a base.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        match bits & 0b11 {
            0 => Self::A,
            1 => Self::C,
            2 => Self::G,
            _ => Self::T,
        }
    }

    #[must_use]
    pub const fn bits(self) -> u64 {
        match self {
            Self::A => 0,
            Self::C => 1,
            Self::G => 2,
            Self::T => 3,
        }
    }

    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::A => b'A',
            Self::C => b'C',
            Self::G => b'G',
            Self::T => b'T',
        }
    }
}

/// One side of a k-mer's extension code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    /// The neighbouring base in the source sequence.
    Base(Base),
    /// No neighbour: the k-mer starts or ends a contig.
    Fail,
}

impl Extension {
    /// Parses `A`, `C`, `G`, `T` or `F`.
    pub const fn from_byte(byte: u8, position: usize) -> Result<Self, InvalidBaseError> {
        match byte {
            b'F' => Ok(Self::Fail),
            _ => match Base::from_byte(byte, position) {
                Ok(base) => Ok(Self::Base(base)),
                Err(e) => Err(e),
            },
        }
    }

    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Base(base) => base.as_byte(),
            Self::Fail => b'F',
        }
    }

    #[must_use]
    pub const fn base(self) -> Option<Base> {
        match self {
            Self::Base(base) => Some(base),
            Self::Fail => None,
        }
    }

    #[must_use]
    pub const fn is_fail(self) -> bool {
        matches!(self, Self::Fail)
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(self.as_byte()))
    }
}

/// A k-mer packed two bits per base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedKmer {
    bits: u64,
    len: KmerLength,
}

impl PackedKmer {
    /// Packs an ASCII k-mer.
    ///
    /// # Errors
    ///
    /// Returns [`KmerHashError::InvalidKmerLength`] if `bytes` is empty or longer
    /// than 32, and [`KmerHashError::InvalidBase`] for anything but `ACGT`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use kmer_hash::kmer::PackedKmer;
    ///
    /// let kmer = PackedKmer::from_bytes(b"ACGT")?;
    /// assert_eq!(kmer.packed_bits(), 0b00_01_10_11);
    /// assert_eq!(kmer.to_string(), "ACGT");
    /// # Ok::<(), kmer_hash::error::KmerHashError>(())
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KmerHashError> {
        let len = KmerLength::new(bytes.len())?;
        let mut bits = 0;
        for (position, &byte) in bytes.iter().enumerate() {
            bits = (bits << 2) | Base::from_byte(byte, position)?.bits();
        }
        Ok(Self { bits, len })
    }

    /// Rebuilds a k-mer from packed bits; bits above `2k` are discarded.
    #[must_use]
    pub const fn from_bits(bits: u64, len: KmerLength) -> Self {
        Self {
            bits: bits & len.mask(),
            len,
        }
    }

    #[must_use]
    pub const fn packed_bits(&self) -> u64 {
        self.bits
    }

    #[must_use]
    pub const fn len(&self) -> KmerLength {
        self.len
    }

    /// Deterministic 64-bit hash used to place the k-mer in a table.
    #[must_use]
    pub fn hash64(&self) -> u64 {
        let mut hasher = FxHasher::default();
        hasher.write_u64(self.bits);
        hasher.finish()
    }

    /// The k-mer that follows this one when `base` is appended on the right.
    ///
    /// ```rust
    /// use kmer_hash::kmer::{Base, PackedKmer};
    ///
    /// let kmer = PackedKmer::from_bytes(b"GATT")?;
    /// assert_eq!(kmer.successor(Base::A).to_string(), "ATTA");
    /// # Ok::<(), kmer_hash::error::KmerHashError>(())
    /// ```
    #[must_use]
    pub const fn successor(&self, base: Base) -> Self {
        Self::from_bits((self.bits << 2) | base.bits(), self.len)
    }

    /// The base at `index`, counting from the left, or `None` past the end.
    #[must_use]
    pub const fn base_at(&self, index: usize) -> Option<Base> {
        if index >= self.len.get() {
            return None;
        }
        Some(self.base_unchecked(index))
    }

    const fn base_unchecked(&self, index: usize) -> Base {
        let shift = 2 * (self.len.get() - 1 - index);
        Base::from_bits(self.bits >> shift)
    }

    fn bases(&self) -> impl Iterator<Item = Base> + '_ {
        (0..self.len.get()).map(|i| self.base_unchecked(i))
    }

    /// Unpacks to ASCII bases.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bases().map(Base::as_byte).collect()
    }
}

impl fmt::Display for PackedKmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for base in self.bases() {
            write!(f, "{}", char::from(base.as_byte()))?;
        }
        Ok(())
    }
}

impl FromStr for PackedKmer {
    type Err = KmerHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

/// A k-mer with its backward and forward extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KmerPair {
    pub kmer: PackedKmer,
    pub backward: Extension,
    pub forward: Extension,
}

impl KmerPair {
    #[must_use]
    pub const fn new(kmer: PackedKmer, backward: Extension, forward: Extension) -> Self {
        Self {
            kmer,
            backward,
            forward,
        }
    }

    /// Parses one line of a k-mer file: `<KMER> <BF>`.
    ///
    /// `line_no` is 1-based and only used in error messages.
    ///
    /// # Example
    ///
    /// ```rust
    /// use kmer_hash::kmer::{Extension, KmerPair};
    ///
    /// let pair = KmerPair::parse_line(b"GATTACA\tFC", 1)?;
    /// assert!(pair.is_start());
    /// assert_eq!(pair.next_kmer().map(|k| k.to_string()), Some("ATTACAC".to_string()));
    /// # Ok::<(), kmer_hash::error::KmerHashError>(())
    /// ```
    pub fn parse_line(line: &[u8], line_no: usize) -> Result<Self, KmerHashError> {
        let mut fields = line
            .split(u8::is_ascii_whitespace)
            .filter(|field| !field.is_empty());

        let (Some(kmer), Some(ext), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(KmerHashError::KmerParse {
                line: line_no,
                details: format!(
                    "expected '<kmer> <extensions>', got '{}'",
                    String::from_utf8_lossy(line).trim_end()
                ),
            });
        };

        let kmer = PackedKmer::from_bytes(kmer).map_err(|e| KmerHashError::KmerParse {
            line: line_no,
            details: e.to_string(),
        })?;

        let [backward, forward] = ext else {
            return Err(KmerHashError::KmerParse {
                line: line_no,
                details: format!(
                    "extension code must be two characters, got '{}'",
                    String::from_utf8_lossy(ext)
                ),
            });
        };

        let parse_ext = |byte: u8, position: usize| {
            Extension::from_byte(byte, position).map_err(|e| KmerHashError::KmerParse {
                line: line_no,
                details: format!("extension code: {e}"),
            })
        };

        Ok(Self {
            kmer,
            backward: parse_ext(*backward, 0)?,
            forward: parse_ext(*forward, 1)?,
        })
    }

    #[must_use]
    pub const fn backward_ext(&self) -> Extension {
        self.backward
    }

    #[must_use]
    pub const fn forward_ext(&self) -> Extension {
        self.forward
    }

    /// The k-mer to look up next on a contig walk, or `None` at a contig end.
    #[must_use]
    pub const fn next_kmer(&self) -> Option<PackedKmer> {
        match self.forward {
            Extension::Base(base) => Some(self.kmer.successor(base)),
            Extension::Fail => None,
        }
    }

    /// True when nothing precedes this k-mer, so a contig starts here.
    #[must_use]
    pub const fn is_start(&self) -> bool {
        self.backward.is_fail()
    }

    /// True when nothing follows this k-mer, so a contig ends here.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.forward.is_fail()
    }
}

impl fmt::Display for KmerPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}{}", self.kmer, self.backward, self.forward)
    }
}

//! Recorded benchmark series.
//!
//! Timings from earlier `kmer_hash` runs, kept as static data. Each point is
//! `(total_secs, insert_secs)` for one run, the same shape
//! [`AssemblyReport::timing_point`](crate::run::AssemblyReport::timing_point)
//! returns. A series' name records the dataset and, as a suffix, the node count
//! the runs used. Some series were never filled in and are empty.

use serde::Serialize;

/// A named, ordered sequence of timing points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BenchSeries {
    pub name: &'static str,
    pub points: &'static [(f64, f64)],
}

impl BenchSeries {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub const fn points(&self) -> &'static [(f64, f64)] {
        self.points
    }
}

pub const TEST_DATASET_1: BenchSeries = BenchSeries {
    name: "test_dataset_1",
    points: &[
        (16.768_505, 8.581_043),
        (13.030_488, 4.229_887),
        (13.893_945, 2.106_382),
        (37.553_939, 1.177_379),
        (13.424_993, 0.610_240),
        (13.000_536, 0.320_153),
        (15.935_454, 0.259_916),
    ],
};

pub const TEST_DATASET_2: BenchSeries = BenchSeries {
    name: "test_dataset_2",
    points: &[
        (13.000_536, 0.320_153),
        (22.851_817, 1.614_905),
        (22.267_222, 1.504),
        (31.382_042, 1.559_455),
    ],
};

pub const TEST_DATASET_4: BenchSeries = BenchSeries {
    name: "test_dataset_4",
    points: &[],
};

pub const TEST_DATASET_8: BenchSeries = BenchSeries {
    name: "test_dataset_8",
    points: &[],
};

pub const HUMAN_1: BenchSeries = BenchSeries {
    name: "human_1",
    points: &[(340.755_999, 180.518_667), (266.658_896, 93.697_722)],
};

static ALL: [BenchSeries; 5] = [
    TEST_DATASET_1,
    TEST_DATASET_2,
    TEST_DATASET_4,
    TEST_DATASET_8,
    HUMAN_1,
];

/// Every recorded series, in declaration order.
#[must_use]
pub fn all() -> &'static [BenchSeries] {
    &ALL
}

/// Looks a series up by name.
///
/// ```rust
/// use kmer_hash::bench;
///
/// let human = bench::by_name("human_1").unwrap();
/// assert_eq!(human.len(), 2);
/// assert!(bench::by_name("human_2").is_none());
/// ```
#[must_use]
pub fn by_name(name: &str) -> Option<&'static BenchSeries> {
    ALL.iter().find(|series| series.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_test_dataset() {
        assert_eq!(TEST_DATASET_1.len(), 7);
        assert_eq!(TEST_DATASET_1.points()[0], (16.768505, 8.581043));
    }

    #[test]
    fn second_test_dataset() {
        assert_eq!(TEST_DATASET_2.len(), 4);
        assert_eq!(TEST_DATASET_2.points().last(), Some(&(31.382042, 1.559455)));
    }

    #[test]
    fn unfilled_series_are_empty() {
        assert!(TEST_DATASET_4.is_empty());
        assert!(TEST_DATASET_8.is_empty());
        assert_eq!(TEST_DATASET_4.len(), 0);
    }

    #[test]
    fn human_series() {
        assert_eq!(HUMAN_1.len(), 2);
        assert_eq!(HUMAN_1.points()[0], (340.755999, 180.518667));
    }

    #[test]
    fn all_keeps_declaration_order() {
        let names: Vec<_> = all().iter().map(|series| series.name).collect();
        assert_eq!(
            names,
            ["test_dataset_1", "test_dataset_2", "test_dataset_4", "test_dataset_8", "human_1"]
        );
        assert_eq!(by_name("test_dataset_2"), Some(&TEST_DATASET_2));
    }

    #[test]
    fn total_never_below_insert() {
        for series in all() {
            for &(total, insert) in series.points() {
                assert!(total >= insert, "{}: {total} < {insert}", series.name);
            }
        }
    }
}

//! Row partitioning of the interior across workers

use std::ops::Range;

/// Contiguous half-open block of interior rows `[start, end)` assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowRange {
    /// First row (inclusive)
    pub start: usize,
    /// One past the last row
    pub end: usize,
}

impl RowRange {
    /// Number of rows in the block.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the block holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// As a standard range.
    #[must_use]
    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Split interior rows `1..n-1` of an `n×n` grid into `workers` contiguous blocks.
///
/// Block `j` starts at `j·(n / workers) + 1`; the last block runs to `n - 1` and absorbs
/// the remainder. Bounds are clamped to `[1, n - 1]`, so when there are more workers
/// than rows the surplus blocks are empty rather than overlapping.
///
/// A `workers` of zero is treated as one.
#[must_use]
pub fn partition_rows(n: usize, workers: usize) -> Vec<RowRange> {
    let workers = workers.max(1);
    let lo = 1;
    let hi = n.saturating_sub(1).max(lo);
    let chunk = n / workers;

    let clamp = |row: usize| row.clamp(lo, hi);
    (0..workers)
        .map(|j| {
            let start = clamp(j * chunk + 1);
            let end = if j + 1 == workers {
                hi
            } else {
                clamp((j + 1) * chunk + 1)
            };
            RowRange {
                start,
                end: end.max(start),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_exact_cover(n: usize, workers: usize) {
        let ranges = partition_rows(n, workers);
        assert_eq!(ranges.len(), workers.max(1));
        let mut expected = 1;
        for range in &ranges {
            assert_eq!(range.start, expected, "n={n} workers={workers} {ranges:?}");
            assert!(range.end >= range.start);
            expected = range.end;
        }
        assert_eq!(expected, n - 1, "n={n} workers={workers} {ranges:?}");
    }

    #[test]
    fn test_even_split() {
        let ranges = partition_rows(10, 3);
        assert_eq!(
            ranges,
            vec![
                RowRange { start: 1, end: 4 },
                RowRange { start: 4, end: 7 },
                RowRange { start: 7, end: 9 },
            ]
        );
    }

    #[test]
    fn test_last_block_absorbs_remainder() {
        // 40 / 7 = 5 rows per block, last block takes rows 31..39
        let ranges = partition_rows(40, 7);
        assert_eq!(ranges[0], RowRange { start: 1, end: 6 });
        assert_eq!(ranges[6], RowRange { start: 31, end: 39 });
        assert_eq!(ranges[6].len(), 8);
    }

    #[test]
    fn test_more_workers_than_rows() {
        // 4 / 7 = 0: every block but the last is empty
        let ranges = partition_rows(4, 7);
        assert!(ranges[..6].iter().all(RowRange::is_empty));
        assert_eq!(ranges[6], RowRange { start: 1, end: 3 });
        assert_exact_cover(4, 7);
        assert_exact_cover(3, 3);
        assert_exact_cover(5, 5);
    }

    #[test]
    fn test_single_worker_takes_everything() {
        assert_eq!(partition_rows(12, 1), vec![RowRange { start: 1, end: 11 }]);
        assert_eq!(partition_rows(12, 0), vec![RowRange { start: 1, end: 11 }]);
    }

    #[test]
    fn test_exact_cover_property() {
        for n in 3..64 {
            for workers in 1..=n + 2 {
                assert_exact_cover(n, workers);
            }
        }
    }
}

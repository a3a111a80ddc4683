//! Diagonal sweep over every relative offset of two record sequences.
//!
//! For each diagonal `d` in `-small_len..large_len` and each start `j` in
//! the small sequence that lands inside the large one, the unit scorer is
//! run on `small[j..]` against `large[j + d..]`. Results that clear the
//! significance cutoffs are emitted as [`MatchRecord`]s, and the start
//! index then jumps past the consumed records so one physical alignment is
//! reported once.
//!
//! Emission order is diagonal-major, start-minor, both ascending. The
//! parallel variant evaluates diagonals on the rayon pool and concatenates
//! them back in that order.

use rayon::prelude::*;

use super::record::RecordSeq;
use super::unit_scorer::{ScoringConfig, score};
use crate::defaults::{MIN_SIGNIFICANT_LEN, MIN_SIGNIFICANT_SCORE};

/// One reported region of similarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRecord {
    pub small_start: usize,
    pub large_start: usize,
    pub score: i64,
    pub matched_len: usize,
}

/// Minimum score and length a region needs before it is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Significance {
    pub min_score: i64,
    pub min_len: usize,
}

impl Default for Significance {
    fn default() -> Self {
        Significance {
            min_score: MIN_SIGNIFICANT_SCORE,
            min_len: MIN_SIGNIFICANT_LEN,
        }
    }
}

impl Significance {
    #[inline(always)]
    pub fn admits(&self, score: i64, matched_len: usize) -> bool {
        score >= self.min_score && matched_len >= self.min_len
    }
}

/// Lazy diagonal-major iterator over significant matches.
///
/// `small` must not be longer than `large`; the sweep does not swap roles.
pub struct Correlator<'a> {
    small: RecordSeq<'a>,
    large: RecordSeq<'a>,
    stall_threshold: u32,
    config: ScoringConfig,
    significance: Significance,
    // Current diagonal, as large_start - small_start
    diag: i64,
    // Next small start to score on `diag`
    start: usize,
}

impl<'a> Correlator<'a> {
    pub fn new(
        small: RecordSeq<'a>,
        large: RecordSeq<'a>,
        stall_threshold: u32,
        config: &ScoringConfig,
        significance: Significance,
    ) -> Self {
        let first = -(small.len() as i64);
        Correlator {
            small,
            large,
            stall_threshold,
            config: *config,
            significance,
            diag: first,
            start: first_start(first),
        }
    }

    fn enter_next_diagonal(&mut self) {
        self.diag += 1;
        self.start = first_start(self.diag);
    }
}

impl Iterator for Correlator<'_> {
    type Item = MatchRecord;

    fn next(&mut self) -> Option<MatchRecord> {
        let small_len = self.small.len();
        let large_len = self.large.len() as i64;

        while self.diag < large_len {
            let end = start_limit(self.diag, small_len, self.large.len());
            while self.start < end {
                let j = self.start;
                let large_start = (j as i64 + self.diag) as usize;
                let res = score(
                    self.small.tail(j),
                    self.large.tail(large_start),
                    self.stall_threshold,
                    &self.config,
                );
                self.start += 1;

                if !self.significance.admits(res.score, res.matched_len) {
                    continue;
                }

                // Skip the records this match already covers
                self.start += res.matched_len.saturating_sub(1);
                return Some(MatchRecord {
                    small_start: j,
                    large_start,
                    score: res.score,
                    matched_len: res.matched_len,
                });
            }
            self.enter_next_diagonal();
        }
        None
    }
}

#[inline]
fn first_start(diag: i64) -> usize {
    if diag < 0 { (-diag) as usize } else { 0 }
}

/// One past the last small start on `diag` whose large start is in range.
/// Starts beyond this pair with an empty large tail and never score.
#[inline]
fn start_limit(diag: i64, small_len: usize, large_len: usize) -> usize {
    let room = large_len as i64 - diag;
    if room <= 0 {
        0
    } else {
        small_len.min(room as usize)
    }
}

/// Serial sweep with the default significance cutoffs.
pub fn correlate<'a>(
    small: RecordSeq<'a>,
    large: RecordSeq<'a>,
    stall_threshold: u32,
    config: &ScoringConfig,
) -> Correlator<'a> {
    Correlator::new(small, large, stall_threshold, config, Significance::default())
}

/// Matches along a single diagonal, in ascending start order.
pub fn diagonal_matches(
    small: RecordSeq<'_>,
    large: RecordSeq<'_>,
    diag: i64,
    stall_threshold: u32,
    config: &ScoringConfig,
    significance: Significance,
) -> Vec<MatchRecord> {
    let mut out = Vec::new();
    let end = start_limit(diag, small.len(), large.len());
    let mut j = first_start(diag);
    while j < end {
        let large_start = (j as i64 + diag) as usize;
        let res = score(small.tail(j), large.tail(large_start), stall_threshold, config);
        if significance.admits(res.score, res.matched_len) {
            out.push(MatchRecord {
                small_start: j,
                large_start,
                score: res.score,
                matched_len: res.matched_len,
            });
            j += res.matched_len.saturating_sub(1);
        }
        j += 1;
    }
    out
}

/// Evaluate all diagonals on the current rayon pool. The returned vector is
/// in the same order the serial [`Correlator`] would yield.
pub fn correlate_parallel(
    small: RecordSeq<'_>,
    large: RecordSeq<'_>,
    stall_threshold: u32,
    config: &ScoringConfig,
    significance: Significance,
) -> Vec<MatchRecord> {
    let first = -(small.len() as i64);
    let last = large.len() as i64;

    let per_diagonal: Vec<Vec<MatchRecord>> = (first..last)
        .into_par_iter()
        .map(|diag| diagonal_matches(small, large, diag, stall_threshold, config, significance))
        .collect();

    per_diagonal.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::record::{Record, records_to_bytes};

    fn r(v: u32) -> Record {
        Record::from_be_u32(v)
    }

    // Every background record has a first byte no planted record shares.
    fn background(n: usize, tag: u8) -> Vec<Record> {
        (0..n)
            .map(|i| Record::new([tag, (i as u8).wrapping_add(1), 0x5a, 0xa5]))
            .collect()
    }

    fn planted(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| Record::new([0x10 + i as u8, 0x20, 0x30, 0x40]))
            .collect()
    }

    #[test]
    fn test_planted_match_reported_once_at_its_diagonal() {
        let cfg = ScoringConfig::default();
        let motif = planted(5);

        let mut small = background(10, 0xdd);
        small[3..8].copy_from_slice(&motif);
        small[8] = Record::TERMINATOR;
        let mut large = background(14, 0xee);
        large[5..10].copy_from_slice(&motif);

        let a = records_to_bytes(&small);
        let b = records_to_bytes(&large);
        let found: Vec<MatchRecord> =
            correlate(RecordSeq::new(&a), RecordSeq::new(&b), 10, &cfg).collect();

        assert_eq!(
            found,
            vec![MatchRecord {
                small_start: 3,
                large_start: 5,
                score: 30,
                matched_len: 5,
            }]
        );
    }

    #[test]
    fn test_concrete_scenario_below_cutoff() {
        let small = [r(0x11223344), r(0x55667788), Record::TERMINATOR];
        let large = [r(0xaaaaaaaa), r(0x11223344), r(0x55667788), r(0x99999999)];
        let a = records_to_bytes(&small);
        let b = records_to_bytes(&large);
        let (sa, sb) = (RecordSeq::new(&a), RecordSeq::new(&b));

        let cfg = ScoringConfig::default();
        assert_eq!(correlate(sa, sb, 10, &cfg).count(), 0);
        let res = score(sa, sb.tail(1), 10, &cfg);
        assert_eq!((res.score, res.matched_len), (12, 2));

        // Raising the exact weight clears the score cutoff but the region
        // is still shorter than the minimum length.
        let cfg = ScoringConfig { exact: 7, ..cfg };
        let res = score(sa, sb.tail(1), 10, &cfg);
        assert_eq!((res.score, res.matched_len), (14, 2));
        assert_eq!(correlate(sa, sb, 10, &cfg).count(), 0);

        let relaxed = Significance {
            min_score: 13,
            min_len: 1,
        };
        let found: Vec<MatchRecord> = Correlator::new(sa, sb, 10, &cfg, relaxed).collect();
        assert_eq!(
            found,
            vec![MatchRecord {
                small_start: 0,
                large_start: 1,
                score: 14,
                matched_len: 2,
            }]
        );
    }

    #[test]
    fn test_identical_sequences_single_match_on_main_diagonal() {
        let cfg = ScoringConfig::default();
        let seq = planted(12);
        let bytes = records_to_bytes(&seq);
        let s = RecordSeq::new(&bytes);
        let found: Vec<MatchRecord> = correlate(s, s, 10, &cfg).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].small_start, 0);
        assert_eq!(found[0].large_start, 0);
        assert_eq!(found[0].matched_len, 12);
        assert_eq!(found[0].score, 12 * i64::from(cfg.exact));
    }

    #[test]
    fn test_emission_order_is_diagonal_major() {
        let cfg = ScoringConfig::default();
        let motif_a = planted(4);
        let motif_b: Vec<Record> = (0..4)
            .map(|i| Record::new([0x60 + i as u8, 1, 2, 3]))
            .collect();

        // motif_a on diagonal +10, motif_b on diagonal -7
        let mut small = background(12, 0xdd);
        small[0..4].copy_from_slice(&motif_a);
        small[4] = Record::TERMINATOR;
        small[8..12].copy_from_slice(&motif_b);
        let mut large = background(16, 0xee);
        large[1..5].copy_from_slice(&motif_b);
        large[10..14].copy_from_slice(&motif_a);

        let a = records_to_bytes(&small);
        let b = records_to_bytes(&large);
        let found: Vec<(usize, usize)> = correlate(RecordSeq::new(&a), RecordSeq::new(&b), 10, &cfg)
            .map(|m| (m.small_start, m.large_start))
            .collect();
        assert_eq!(found, vec![(8, 1), (0, 10)]);
    }

    #[test]
    fn test_empty_small_yields_nothing() {
        let cfg = ScoringConfig::default();
        let b = records_to_bytes(&planted(8));
        let found: Vec<MatchRecord> =
            correlate(RecordSeq::empty(), RecordSeq::new(&b), 10, &cfg).collect();
        assert!(found.is_empty());
    }

    #[test]
    fn test_parallel_matches_serial() {
        let cfg = ScoringConfig::default();
        let motif = planted(6);
        let mut small = background(20, 0xdd);
        small[2..8].copy_from_slice(&motif);
        small[12..18].copy_from_slice(&motif);
        let mut large = background(40, 0xee);
        large[0..6].copy_from_slice(&motif);
        large[20..26].copy_from_slice(&motif);

        let a = records_to_bytes(&small);
        let b = records_to_bytes(&large);
        let (sa, sb) = (RecordSeq::new(&a), RecordSeq::new(&b));

        let serial: Vec<MatchRecord> = correlate(sa, sb, 10, &cfg).collect();
        let parallel = correlate_parallel(sa, sb, 10, &cfg, Significance::default());
        assert_eq!(serial.len(), 4);
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_zero_cutoffs_admit_empty_regions() {
        let cfg = ScoringConfig::default();
        let seq = [Record::TERMINATOR, r(0x11223344)];
        let bytes = records_to_bytes(&seq);
        let s = RecordSeq::new(&bytes);
        let open = Significance {
            min_score: 0,
            min_len: 0,
        };

        let m = |small_start, large_start, score, matched_len| MatchRecord {
            small_start,
            large_start,
            score,
            matched_len,
        };
        let serial: Vec<MatchRecord> = Correlator::new(s, s, 10, &cfg, open).collect();
        assert_eq!(
            serial,
            vec![m(1, 0, 0, 0), m(0, 0, 0, 0), m(1, 1, 6, 1), m(0, 1, 0, 0)]
        );
        assert_eq!(serial, correlate_parallel(s, s, 10, &cfg, open));
    }
}

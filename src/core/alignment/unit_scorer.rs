//! Greedy local-maximum scoring along a single diagonal.
//!
//! Starting from the first record of each sequence, the scorer walks both
//! sequences in lockstep, adding a weight per record pair according to how
//! much of the record agrees. It tracks the best cumulative score and gives
//! up once that best has not been improved for `stall_threshold` records,
//! or as soon as the running total goes negative.
//!
//! Running off the end of the shorter sequence is reported through the
//! `boundary` flag: in that case the final cumulative score is returned
//! instead of the tracked best, since the real maximum may lie beyond the
//! data that was checked.

use super::record::{RecordMatch, RecordSeq};
use crate::defaults::{EXACT_WEIGHT, HALF_WEIGHT, MISMATCH_WEIGHT, PREFIX_WEIGHT};

/// Per-run scoring weights. Read-only for the duration of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringConfig {
    pub exact: i32,    // Full four-byte match
    pub half: i32,     // Leading two bytes match
    pub prefix: i32,   // Leading byte matches
    pub mismatch: i32, // Anything else (normally negative)
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            exact: EXACT_WEIGHT,
            half: HALF_WEIGHT,
            prefix: PREFIX_WEIGHT,
            mismatch: MISMATCH_WEIGHT,
        }
    }
}

impl ScoringConfig {
    #[inline(always)]
    pub fn weight(&self, m: RecordMatch) -> i64 {
        i64::from(match m {
            RecordMatch::Exact => self.exact,
            RecordMatch::Half => self.half,
            RecordMatch::Prefix => self.prefix,
            RecordMatch::Mismatch => self.mismatch,
        })
    }
}

/// Outcome of one scoring walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Best cumulative score (final cumulative score when `boundary`)
    pub score: i64,
    /// Records consumed up to and including the best score
    pub matched_len: usize,
    /// Walk ran to the end of the shorter sequence
    pub boundary: bool,
}

/// Score `small` against `large`, both starting at their first record.
///
/// Pure: no state survives between calls.
pub fn score(
    small: RecordSeq<'_>,
    large: RecordSeq<'_>,
    stall_threshold: u32,
    config: &ScoringConfig,
) -> ScoreResult {
    let limit = small.len().min(large.len());
    let stall_threshold = stall_threshold as usize;

    let mut cur_score: i64 = 0;
    let mut best_score: i64 = 0;
    let mut stall: usize = 0;

    let mut i = 0usize;
    while i < limit {
        // Both reads are in bounds: i < limit <= len of each
        let (a, b) = match (small.get(i), large.get(i)) {
            (Some(a), Some(b)) => (a, b),
            _ => break,
        };

        if a.is_terminator() || b.is_terminator() {
            break;
        }

        // Weights are 32-bit, so this only saturates on inputs far beyond
        // any loadable size
        cur_score = cur_score.saturating_add(config.weight(a.compare(&b)));

        if cur_score > best_score {
            best_score = cur_score;
            stall = 0;
        } else {
            if stall >= stall_threshold || cur_score < 0 {
                break;
            }
            stall += 1;
        }

        i += 1;
    }

    if i == limit {
        ScoreResult {
            score: cur_score,
            matched_len: i,
            boundary: true,
        }
    } else {
        ScoreResult {
            score: best_score,
            matched_len: i - stall,
            boundary: false,
        }
    }
}

//! Optional second-pass filtering of correlator output.
//!
//! Applies a minimum score/length gate and a Karlin-Altschul noise gate,
//! then either passes survivors on (optionally translated to absolute file
//! positions and held for descending-score ordering) or folds them into a
//! coverage map of the small input. With every option off the stream passes
//! through unchanged.

use super::correlate::MatchRecord;
use crate::defaults::{KA_CONFIDENCE, KA_K, KA_LAMBDA};

/// Karlin-Altschul statistics used to estimate the score a random match of
/// a given length reaches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KarlinAltschul {
    pub lambda: f64,
    pub k: f64,
    /// Score offset for the chosen confidence level
    pub x: f64,
}

impl Default for KarlinAltschul {
    fn default() -> Self {
        KarlinAltschul::new(KA_LAMBDA, KA_K, KA_CONFIDENCE)
    }
}

impl KarlinAltschul {
    pub fn new(lambda: f64, k: f64, confidence: f64) -> Self {
        let x = -(1.0 / confidence).ln().ln() / lambda;
        KarlinAltschul { lambda, k, x }
    }

    /// Expected noise score for a run of `len` records.
    pub fn noise_score(&self, len: usize) -> f64 {
        ((len as f64).ln() + self.k.ln()) / self.lambda + self.x
    }

    /// Gain of `score` in dB relative to a run of `len` half matches.
    pub fn gain_db(score: f64, half_weight: i64, len: usize) -> f64 {
        20.0 * (score / (half_weight as f64 * len as f64)).log10()
    }

    /// Whether a match rises above the noise floor.
    ///
    /// Matches whose reference product `half_weight * len` is not positive
    /// cannot be measured and are rejected.
    pub fn passes(&self, m: &MatchRecord, half_weight: i64) -> bool {
        if m.matched_len == 0 || half_weight <= 0 || m.score <= 0 {
            return false;
        }
        let noise = self.noise_score(m.matched_len);
        if noise <= 0.0 {
            return true;
        }
        let gain = Self::gain_db(m.score as f64, half_weight, m.matched_len);
        let noise_gain = Self::gain_db(noise, half_weight, m.matched_len);
        gain >= noise_gain
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostFilterOpt {
    pub min_score: i64,
    pub min_len: usize,
    pub noise_gate: Option<KarlinAltschul>,
    /// Record offsets added to reported starts (small, large)
    pub absolute_offsets: Option<(usize, usize)>,
    pub sort: bool,
    /// Report covered runs of the small input instead of individual matches
    pub coverage: bool,
}

impl Default for PostFilterOpt {
    fn default() -> Self {
        PostFilterOpt {
            min_score: 1,
            min_len: 1,
            noise_gate: None,
            absolute_offsets: None,
            sort: false,
            coverage: false,
        }
    }
}

impl PostFilterOpt {
    /// True when the filter leaves the stream untouched.
    pub fn is_passthrough(&self) -> bool {
        self.min_score <= 1
            && self.min_len <= 1
            && self.noise_gate.is_none()
            && self.absolute_offsets.is_none()
            && !self.sort
            && !self.coverage
    }
}

pub struct PostFilter {
    opt: PostFilterOpt,
    half_weight: i64,
    // Pending records when sorting
    held: Vec<MatchRecord>,
    // Small-input records touched by a kept match, in region coordinates
    covered: Vec<bool>,
    pub dropped: usize,
}

impl PostFilter {
    pub fn new(opt: PostFilterOpt, half_weight: i64) -> Self {
        PostFilter {
            opt,
            half_weight,
            held: Vec::new(),
            covered: Vec::new(),
            dropped: 0,
        }
    }

    fn keep(&self, m: &MatchRecord) -> bool {
        if m.score < self.opt.min_score || m.matched_len < self.opt.min_len {
            return false;
        }
        match &self.opt.noise_gate {
            Some(ka) => ka.passes(m, self.half_weight),
            None => true,
        }
    }

    fn translate(&self, mut m: MatchRecord) -> MatchRecord {
        if let Some((small_off, large_off)) = self.opt.absolute_offsets {
            m.small_start += small_off;
            m.large_start += large_off;
        }
        m
    }

    fn cover(&mut self, m: &MatchRecord) {
        let end = m.small_start + m.matched_len;
        if self.covered.len() < end {
            self.covered.resize(end, false);
        }
        self.covered[m.small_start..end].fill(true);
    }

    /// Maximal covered runs as `(start, 0, -1, run_len)` records. Starts are
    /// shifted by the small absolute offset when one is set.
    fn coverage_runs(&self) -> Vec<MatchRecord> {
        let base = self.opt.absolute_offsets.map_or(0, |(small_off, _)| small_off);
        let mut runs = Vec::new();
        let mut run_start: Option<usize> = None;
        for (i, &hit) in self.covered.iter().enumerate() {
            match (hit, run_start) {
                (true, None) => run_start = Some(i),
                (false, Some(start)) => {
                    runs.push(coverage_run(base + start, i - start));
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            runs.push(coverage_run(base + start, self.covered.len() - start));
        }
        runs
    }

    /// Feed one record. Returns it immediately unless it was dropped, or
    /// sorting or coverage holds it back until [`PostFilter::finish`].
    pub fn push(&mut self, m: MatchRecord) -> Option<MatchRecord> {
        if !self.keep(&m) {
            self.dropped += 1;
            return None;
        }
        if self.opt.coverage {
            self.cover(&m);
            return None;
        }
        let m = self.translate(m);
        if self.opt.sort {
            self.held.push(m);
            None
        } else {
            Some(m)
        }
    }

    /// Drain held records: the coverage runs in coverage mode, otherwise
    /// held matches highest score first with ties in arrival order.
    pub fn finish(&mut self) -> Vec<MatchRecord> {
        if self.opt.coverage {
            let runs = self.coverage_runs();
            self.covered.clear();
            return runs;
        }
        let mut held = std::mem::take(&mut self.held);
        held.sort_by(|a, b| b.score.cmp(&a.score));
        held
    }

    /// Run a whole buffered stream through the filter.
    pub fn apply<I>(&mut self, matches: I) -> Vec<MatchRecord>
    where
        I: IntoIterator<Item = MatchRecord>,
    {
        let mut out: Vec<MatchRecord> = matches.into_iter().filter_map(|m| self.push(m)).collect();
        out.extend(self.finish());
        out
    }
}

fn coverage_run(start: usize, len: usize) -> MatchRecord {
    MatchRecord {
        small_start: start,
        large_start: 0,
        score: -1,
        matched_len: len,
    }
}

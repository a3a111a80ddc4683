// src/defaults.rs

// Record layout
pub const RECORD_WIDTH: usize = 4;
pub const HALF_WIDTH: usize = 2;
pub const PREFIX_WIDTH: usize = 1;

// Algorithmic Constants
pub const STALL_THRESHOLD: u32 = 10;

// Scoring Constants
pub const EXACT_WEIGHT: i32 = 6;
pub const HALF_WEIGHT: i32 = 5;
pub const PREFIX_WEIGHT: i32 = 4;
pub const MISMATCH_WEIGHT: i32 = -4;

// Significance cutoffs applied by the correlator
pub const MIN_SIGNIFICANT_SCORE: i64 = 13;
pub const MIN_SIGNIFICANT_LEN: usize = 4;

// Karlin-Altschul parameters for the default weights
pub const KA_LAMBDA: f64 = 0.25;
pub const KA_K: f64 = 0.249865;
pub const KA_CONFIDENCE: f64 = 0.99;

// Other Constants
pub const VERBOSITY: u8 = 3;
pub const THREADS: usize = 1;

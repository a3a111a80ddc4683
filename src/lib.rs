pub mod compare; // Run orchestration: validate, load, sweep, write
pub mod compare_opt; // Run options and command-line surface
pub mod core;
pub mod defaults;
pub mod error;

pub use crate::compare::{CompareSummary, ResolvedRegion, main_compare, resolve_region};
pub use crate::compare_opt::{Cli, CompareOpt, FileOperand};
pub use crate::core::alignment::correlate::{
    Correlator, MatchRecord, Significance, correlate, correlate_parallel,
};
pub use crate::core::alignment::record::{Record, RecordSeq};
pub use crate::core::alignment::unit_scorer::{ScoreResult, ScoringConfig, score};
pub use crate::error::CompareError;

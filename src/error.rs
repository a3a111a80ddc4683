//! Error types for the comparison driver
//!
//! The scoring core never fails; everything here comes from argument
//! handling, file validation, loading, and writing results. Each category
//! maps to its own process exit status.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub const EXIT_USAGE: i32 = 255;
pub const EXIT_STAT: i32 = 254;
pub const EXIT_EXCEEDS_FILE: i32 = 253;
pub const EXIT_OVERFLOW: i32 = 252;
pub const EXIT_OUTPUT: i32 = 1;

#[derive(Debug, Error)]
pub enum CompareError {
    /// Bad argument syntax or an unusable combination of arguments
    #[error("{0}")]
    Usage(String),

    #[error("Unable to stat {}: {source}", .path.display())]
    Stat { path: PathBuf, source: io::Error },

    #[error(
        "Offset + len exceeds size of {}: offset {offset}, len {len}, file holds {available} records",
        .path.display()
    )]
    ExceedsFile {
        path: PathBuf,
        offset: u64,
        len: u64,
        available: u64,
    },

    #[error("Offset + len overflows for {}", .path.display())]
    Overflow { path: PathBuf },

    #[error("Unable to load {}: {source}", .path.display())]
    Load { path: PathBuf, source: io::Error },

    #[error("Error writing results: {0}")]
    Output(#[from] io::Error),
}

impl CompareError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CompareError::Usage(_) | CompareError::Load { .. } => EXIT_USAGE,
            CompareError::Stat { .. } => EXIT_STAT,
            CompareError::ExceedsFile { .. } => EXIT_EXCEEDS_FILE,
            CompareError::Overflow { .. } => EXIT_OVERFLOW,
            CompareError::Output(_) => EXIT_OUTPUT,
        }
    }
}

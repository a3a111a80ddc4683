use clap::Parser;
use std::path::PathBuf;

use crate::core::alignment::correlate::Significance;
use crate::core::alignment::post_filter::{KarlinAltschul, PostFilterOpt};
use crate::core::alignment::unit_scorer::ScoringConfig;
use crate::core::utils::{parse_c_long, parse_c_ulong};
use crate::defaults;
use crate::error::CompareError;

// src/compare_opt.rs
//
// Run options for a single comparison, plus the command-line surface that
// produces them.

/// Validated options for one comparison run
#[derive(Debug, Clone)]
pub struct CompareOpt {
    // Scoring
    pub scoring: ScoringConfig,     // Per-record weights
    pub stall_threshold: u32,       // Non-improving records tolerated after a local max
    pub significance: Significance, // Minimum score/length to report

    // Inputs, in role order: small first, large second
    pub files: [FileOperand; 2],

    // Processing
    pub threads: usize, // 1 = streaming serial sweep

    // Second-pass filtering (off by default)
    pub post_filter: PostFilterOpt,
    pub absolute_offsets: bool,
}

/// One input as given on the command line. Missing values are filled in
/// from the file size during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOperand {
    pub path: PathBuf,
    pub offset: Option<u64>, // In records
    pub len: Option<u64>,    // In records
}

impl FileOperand {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileOperand {
            path: path.into(),
            offset: None,
            len: None,
        }
    }
}

impl Default for CompareOpt {
    fn default() -> Self {
        CompareOpt {
            scoring: ScoringConfig::default(),
            stall_threshold: defaults::STALL_THRESHOLD,
            significance: Significance::default(),
            files: [FileOperand::new(""), FileOperand::new("")],
            threads: defaults::THREADS,
            post_filter: PostFilterOpt::default(),
            absolute_offsets: false,
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "bincompare")]
#[command(
    about = "BLAST-style scoring of four-byte packed binary data",
    long_about = "Scores every diagonal of two record files. A full four-byte match \
scores x1, a match of the first two bytes x2, a match of the first byte x3, and \
anything else x4.\n\nfileA must not be longer than fileB. Offsets and lengths are \
in four-byte records; the length defaults to the rest of the file."
)]
#[command(version)]
#[command(override_usage = "bincompare [options] fileA [offset [len]] fileB [offset [len]]")]
pub struct Cli {
    /// Input files, each optionally followed by an offset and a length in records
    #[arg(value_name = "FILE [OFFSET [LEN]]", num_args = 2..=6, required = true)]
    pub operands: Vec<String>,

    // ===== Scoring Options =====
    /// Give up after INT non-improving records past a local maximum
    #[arg(short = 't', long = "threshold", value_name = "INT", default_value_t = defaults::STALL_THRESHOLD, value_parser = parse_threshold)]
    pub threshold: u32,

    /// Score for a full four-byte match (also accepted as -x1=INT)
    #[arg(long = "x1", value_name = "INT", default_value_t = defaults::EXACT_WEIGHT, value_parser = parse_weight, allow_hyphen_values = true)]
    pub x1: i32,

    /// Score for a leading two-byte match (also accepted as -x2=INT)
    #[arg(long = "x2", value_name = "INT", default_value_t = defaults::HALF_WEIGHT, value_parser = parse_weight, allow_hyphen_values = true)]
    pub x2: i32,

    /// Score for a leading one-byte match (also accepted as -x3=INT)
    #[arg(long = "x3", value_name = "INT", default_value_t = defaults::PREFIX_WEIGHT, value_parser = parse_weight, allow_hyphen_values = true)]
    pub x3: i32,

    /// Score for anything else (also accepted as -x4=INT)
    #[arg(long = "x4", value_name = "INT", default_value_t = defaults::MISMATCH_WEIGHT, value_parser = parse_weight, allow_hyphen_values = true)]
    pub x4: i32,

    // ===== Filtering Options =====
    /// Drop matches that do not rise above the Karlin-Altschul noise floor
    #[arg(long)]
    pub noise_filter: bool,

    /// Drop matches scoring below INT
    #[arg(long, value_name = "INT", default_value_t = 1)]
    pub min_score: i64,

    /// Drop matches shorter than INT records
    #[arg(long, value_name = "INT", default_value_t = 1)]
    pub min_len: usize,

    /// Report starts relative to the beginning of each file instead of the compared region
    #[arg(long)]
    pub absolute_offsets: bool,

    /// Emit matches by descending score (buffers all results)
    #[arg(long)]
    pub sort: bool,

    /// Reduce results to the runs of fileA covered by any kept match,
    /// printed as START,0,-1,LEN (takes precedence over --sort)
    #[arg(long)]
    pub coverage: bool,

    // ===== Processing Options =====
    /// Number of threads; more than one evaluates diagonals in parallel
    #[arg(short = 'j', long, value_name = "INT")]
    pub threads: Option<usize>,

    /// Verbose level: 1=error, 2=warning, 3=message, 4=debug, 5+=trace
    #[arg(short = 'v', long, value_name = "INT", default_value_t = defaults::VERBOSITY)]
    pub verbosity: u8,
}

fn parse_weight(s: &str) -> Result<i32, String> {
    let v = parse_c_long(s)?;
    i32::try_from(v).map_err(|_| format!("Weight out of range: {}", s))
}

fn parse_threshold(s: &str) -> Result<u32, String> {
    let v = parse_c_ulong(s)?;
    u32::try_from(v).map_err(|_| format!("Threshold out of range: {}", s))
}

/// Rewrite the single-dash multi-letter weight flags (`-x1=6`) into the
/// long form clap understands (`--x1=6`). Everything else passes through.
pub fn normalize_legacy_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .map(|arg| {
            let is_weight = ["-x1", "-x2", "-x3", "-x4"].iter().any(|flag| {
                arg == *flag || arg.strip_prefix(flag).is_some_and(|rest| rest.starts_with('='))
            });
            if is_weight { format!("-{}", arg) } else { arg }
        })
        .collect()
}

/// Split positional operands into the two inputs.
///
/// Each input is a file name followed by an optional offset and an
/// optional length. A token counts as a number only if it parses as one;
/// otherwise it starts the next input.
pub fn parse_file_operands(tokens: &[String]) -> Result<[FileOperand; 2], CompareError> {
    let mut iter = tokens.iter().peekable();
    let mut files: Vec<FileOperand> = Vec::with_capacity(2);

    for which in ["fileA", "fileB"] {
        let name = iter
            .next()
            .ok_or_else(|| CompareError::Usage(format!("missing {}", which)))?;
        let mut operand = FileOperand::new(name);

        if let Some(v) = iter.peek().and_then(|t| parse_c_ulong(t).ok()) {
            operand.offset = Some(v);
            iter.next();
            if let Some(v) = iter.peek().and_then(|t| parse_c_ulong(t).ok()) {
                operand.len = Some(v);
                iter.next();
            }
        }
        files.push(operand);
    }

    if let Some(extra) = iter.next() {
        return Err(CompareError::Usage(format!("unexpected argument: {}", extra)));
    }

    let second = files.pop();
    let first = files.pop();
    match (first, second) {
        (Some(a), Some(b)) => Ok([a, b]),
        _ => Err(CompareError::Usage("two input files are required".to_string())),
    }
}

impl CompareOpt {
    /// Build run options from parsed command-line arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, CompareError> {
        let files = parse_file_operands(&cli.operands)?;

        let threads = match cli.threads {
            Some(0) => {
                return Err(CompareError::Usage("thread count must be at least 1".to_string()));
            }
            Some(n) => n,
            None => defaults::THREADS,
        };

        let post_filter = PostFilterOpt {
            min_score: cli.min_score,
            min_len: cli.min_len,
            noise_gate: cli.noise_filter.then(KarlinAltschul::default),
            // Filled in once the real offsets are known
            absolute_offsets: None,
            sort: cli.sort,
            coverage: cli.coverage,
        };

        Ok(CompareOpt {
            scoring: ScoringConfig {
                exact: cli.x1,
                half: cli.x2,
                prefix: cli.x3,
                mismatch: cli.x4,
            },
            stall_threshold: cli.threshold,
            significance: Significance::default(),
            files,
            threads,
            post_filter,
            absolute_offsets: cli.absolute_offsets,
        })
    }
}

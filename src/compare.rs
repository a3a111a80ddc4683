use anyhow::Result;
// src/compare.rs
//
// Main entry point for a comparison run
// Validates both regions, loads them, sweeps every diagonal, and writes the
// result stream.

use crate::compare_opt::{CompareOpt, FileOperand};
use crate::core::alignment::correlate::{Correlator, MatchRecord, correlate_parallel};
use crate::core::alignment::post_filter::PostFilter;
use crate::core::io::match_output::{MatchWriter, write_region_header};
use crate::core::io::record_loader::RecordBuffer;
use crate::core::utils::{cputime, realtime};
use crate::defaults::RECORD_WIDTH;
use crate::error::CompareError;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// A file region with offset and length fixed against the file's size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRegion {
    pub path: PathBuf,
    pub offset: u64, // In records
    pub len: u64,    // In records
}

/// Totals reported back to the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareSummary {
    pub matches_written: usize,
    pub matches_dropped: usize,
}

/// Check an operand against its file's size and fill in defaults.
///
/// The file holds `size / 4` whole records. A missing offset is 0 and a
/// missing length runs to the end of the file.
pub fn resolve_region(operand: &FileOperand) -> Result<ResolvedRegion, CompareError> {
    let meta = fs::metadata(&operand.path).map_err(|source| CompareError::Stat {
        path: operand.path.clone(),
        source,
    })?;
    let available = meta.len() / RECORD_WIDTH as u64;
    let offset = operand.offset.unwrap_or(0);

    let exceeds = |len: u64| CompareError::ExceedsFile {
        path: operand.path.clone(),
        offset,
        len,
        available,
    };

    let len = match operand.len {
        Some(len) => len,
        None => available.checked_sub(offset).ok_or_else(|| exceeds(0))?,
    };

    let end = offset.checked_add(len).ok_or_else(|| CompareError::Overflow {
        path: operand.path.clone(),
    })?;
    if end > available {
        return Err(exceeds(len));
    }

    Ok(ResolvedRegion {
        path: operand.path.clone(),
        offset,
        len,
    })
}

fn emit<W: Write + ?Sized>(
    filter: &mut PostFilter,
    out: &mut MatchWriter<'_, W>,
    m: MatchRecord,
) -> Result<(), CompareError> {
    if let Some(kept) = filter.push(m) {
        out.write(&kept)?;
    }
    Ok(())
}

/// Run one comparison and write the result stream to `writer`.
pub fn main_compare(opt: &CompareOpt, writer: &mut dyn Write) -> Result<CompareSummary> {
    let mut regions = Vec::with_capacity(2);
    for operand in &opt.files {
        let region = resolve_region(operand)?;
        write_region_header(
            writer,
            &region.path.to_string_lossy(),
            region.offset,
            region.len,
        )
        .map_err(CompareError::Output)?;
        regions.push(region);
    }
    let (small_region, large_region) = (&regions[0], &regions[1]);

    if small_region.len > large_region.len {
        return Err(CompareError::Usage(format!(
            "fileA length ({}) must not exceed fileB length ({})",
            small_region.len, large_region.len
        ))
        .into());
    }

    let small = RecordBuffer::load(&small_region.path, small_region.offset, small_region.len)?;
    let large = RecordBuffer::load(&large_region.path, large_region.offset, large_region.len)?;

    log::info!(
        "Scoring: x1={} x2={} x3={} x4={}, threshold {}",
        opt.scoring.exact,
        opt.scoring.half,
        opt.scoring.prefix,
        opt.scoring.mismatch,
        opt.stall_threshold
    );
    log::debug!(
        "Sweeping {} diagonals over {} x {} records",
        small.len() + large.len(),
        small.len(),
        large.len()
    );

    let mut post_opt = opt.post_filter.clone();
    if opt.absolute_offsets {
        post_opt.absolute_offsets = Some((small_region.offset as usize, large_region.offset as usize));
    }
    if !post_opt.is_passthrough() {
        log::info!("Post-filter: {:?}", post_opt);
    }
    let mut filter = PostFilter::new(post_opt, i64::from(opt.scoring.half));

    let tic = realtime();
    let ctic = cputime();

    let mut out = MatchWriter::new(writer);

    if opt.threads > 1 {
        let matches = correlate_parallel(
            small.records(),
            large.records(),
            opt.stall_threshold,
            &opt.scoring,
            opt.significance,
        );
        out.write_all(&filter.apply(matches)).map_err(CompareError::Output)?;
    } else {
        let sweep = Correlator::new(
            small.records(),
            large.records(),
            opt.stall_threshold,
            &opt.scoring,
            opt.significance,
        );
        for m in sweep {
            emit(&mut filter, &mut out, m)?;
        }
        out.write_all(&filter.finish()).map_err(CompareError::Output)?;
    }
    out.flush().map_err(CompareError::Output)?;

    let toc = realtime();
    let ctoc = cputime();
    log::info!(
        "Comparison took {:.3} seconds ({:.3} CPU seconds).",
        toc - tic,
        ctoc - ctic
    );

    let summary = CompareSummary {
        matches_written: out.written,
        matches_dropped: filter.dropped,
    };
    log::info!(
        "{} matches written, {} dropped by post-filter",
        summary.matches_written,
        summary.matches_dropped
    );
    Ok(summary)
}

//! File loading and result formatting.

pub mod match_output;
pub mod record_loader;

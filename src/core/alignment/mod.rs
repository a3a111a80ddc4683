//! Record comparison kernels.
//!
//! `unit_scorer` walks one diagonal and `correlate` sweeps all diagonals
//! of two record sequences. Both are pure and agnostic to where the
//! records came from.

pub mod correlate;
pub mod post_filter;
pub mod record;
pub mod unit_scorer;

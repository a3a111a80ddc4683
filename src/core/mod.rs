//! Core reusable components for record comparison.
//!
//! The alignment kernels do no I/O; loading and formatting live in `io`.

pub mod alignment;
pub mod io;
pub mod utils;

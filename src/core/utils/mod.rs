//! Timing and argument helpers shared by the driver.

pub mod utils;

pub use utils::{cputime, parse_c_long, parse_c_ulong, realtime};

//! Reporting utilities: formatted terminal output for comparisons and sweeps.

pub mod format;

pub use format::*;

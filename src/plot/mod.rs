//! Terminal plots: the fitted polynomial over the data, and solve timings.

pub mod ascii;
pub mod bars;

pub use ascii::*;
pub use bars::*;

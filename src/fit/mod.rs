//! Fitting orchestration.
//!
//! Responsibilities:
//!
//! - run both least squares methods on a train/validation split (timed, scored)
//! - sweep polynomial orders in parallel to compare validation error

pub mod compare;
pub mod sweep;

pub use compare::*;
pub use sweep::*;

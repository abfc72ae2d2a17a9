//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input configuration enums (`Method`, `SourceKind`)
//! - observed data (`Series`, `Split`)
//! - fit outputs (`Comparison`, `MethodOutcome`, `SweepRow`, `CurveFile`)

pub mod types;

pub use types::*;

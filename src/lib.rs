//! `poly-lsq` library crate.
//!
//! Fits polynomials by least squares with two independent methods (Cholesky
//! on the normal equations, Householder QR) and compares their coefficients,
//! held-out error and speed.
//!
//! The binary (`plsq`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the numerical kernel (`math`) is usable on its own

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod tui;

//! Entropy input sanity checks.
//!
//! This module provides bit statistics and advisory thresholds for
//! captured matrices and seeds. These are sanity checks, not proofs of
//! entropy, and they never change generated output.

mod statistics;
mod threshold;

pub use statistics::BitStatistics;
pub use threshold::{QualityThresholds, SeedHealth};

//! Advisory thresholds for degenerate entropy input.
//!
//! Checks never alter or block output; they describe input that is
//! likely to produce poor seeds so callers can warn about it.

use super::statistics::BitStatistics;
use crate::capture::BitMatrix;
use crate::generator::Seed;
use serde::{Deserialize, Serialize};

/// Quality thresholds for captured matrices and seeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityThresholds {
    /// Maximum acceptable bit bias (absolute value).
    pub max_bit_bias: f64,
    /// Maximum acceptable run of identical bits, as a fraction of the
    /// sample size.
    pub max_run_fraction: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            max_bit_bias: 0.4,
            max_run_fraction: 0.5,
        }
    }
}

impl QualityThresholds {
    /// Tighter limits, useful when the scene is known to be busy.
    pub fn strict() -> Self {
        Self {
            max_bit_bias: 0.2,
            max_run_fraction: 0.1,
        }
    }

    /// Checks a captured matrix.
    pub fn check_matrix(&self, matrix: &BitMatrix) -> Vec<SeedHealth> {
        let stats = BitStatistics::of_matrix(matrix);
        let mut advisories = Vec::new();

        if stats.is_constant() {
            advisories.push(SeedHealth::ConstantMatrix {
                value: matrix.get(0).unwrap_or(0),
            });
            return advisories;
        }
        if stats.bit_bias.abs() > self.max_bit_bias {
            advisories.push(SeedHealth::BitBias {
                observed: stats.bit_bias,
                threshold: self.max_bit_bias,
            });
        }
        let run_fraction = stats.longest_run as f64 / stats.sample_size as f64;
        if run_fraction > self.max_run_fraction {
            advisories.push(SeedHealth::LongRun {
                length: stats.longest_run,
                sample_size: stats.sample_size,
            });
        }
        advisories
    }

    /// Checks a generator seed.
    pub fn check_seed(&self, seed: &Seed) -> Vec<SeedHealth> {
        if seed.is_zero() {
            vec![SeedHealth::ZeroSeed]
        } else {
            Vec::new()
        }
    }
}

/// A non-fatal observation about entropy input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeedHealth {
    #[error("captured image is uniformly {value}; the scene carries no detail")]
    ConstantMatrix { value: u8 },

    #[error("bit bias {observed:.4} exceeds threshold {threshold:.4}")]
    BitBias { observed: f64, threshold: f64 },

    #[error("run of {length} identical bits in {sample_size}")]
    LongRun { length: usize, sample_size: usize },

    #[error("seed is zero; the generator will only ever emit zero bits")]
    ZeroSeed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varied_matrix_passes() {
        let matrix = BitMatrix::from_bits((0..256).map(|i| (i * 7 + i / 5) % 3 == 0));
        assert!(QualityThresholds::default().check_matrix(&matrix).is_empty());
    }

    #[test]
    fn test_constant_matrix_flagged() {
        let matrix = BitMatrix::new(vec![0; 100], 10, 10).unwrap();
        assert_eq!(
            QualityThresholds::default().check_matrix(&matrix),
            vec![SeedHealth::ConstantMatrix { value: 0 }]
        );
    }

    #[test]
    fn test_biased_matrix_flagged() {
        let mut bits = vec![true; 95];
        bits.extend([false; 5]);
        let matrix = BitMatrix::from_bits(bits);
        let advisories = QualityThresholds::default().check_matrix(&matrix);

        assert!(matches!(advisories[0], SeedHealth::BitBias { .. }));
        assert!(matches!(advisories[1], SeedHealth::LongRun { length: 95, .. }));
    }

    #[test]
    fn test_zero_seed_flagged() {
        let thresholds = QualityThresholds::default();
        assert_eq!(thresholds.check_seed(&Seed::new(0)), vec![SeedHealth::ZeroSeed]);
        assert!(thresholds.check_seed(&Seed::new(1)).is_empty());
    }
}

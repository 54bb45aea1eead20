//! Bit-level statistics for captured matrices and seed samples.
//!
//! These are sanity checks to flag obviously degenerate input (a covered
//! lens, a blank scene), not measurements of entropy.

use crate::capture::BitMatrix;
use crate::sampling::SampledBits;

/// Summary statistics of a bit sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct BitStatistics {
    /// Fraction of ones minus 0.5, in [-0.5, 0.5].
    pub bit_bias: f64,
    /// Length of the longest run of identical bits.
    pub longest_run: usize,
    /// Number of positions where a bit differs from its predecessor.
    pub transitions: usize,
    /// Number of bits analyzed.
    pub sample_size: usize,
}

impl BitStatistics {
    /// Analyzes a sequence of bits.
    pub fn analyze(bits: impl IntoIterator<Item = bool>) -> Self {
        let mut ones = 0usize;
        let mut sample_size = 0usize;
        let mut transitions = 0usize;
        let mut longest_run = 0usize;
        let mut run = 0usize;
        let mut previous: Option<bool> = None;

        for bit in bits {
            sample_size += 1;
            ones += usize::from(bit);
            if previous == Some(bit) {
                run += 1;
            } else {
                if previous.is_some() {
                    transitions += 1;
                }
                run = 1;
            }
            longest_run = longest_run.max(run);
            previous = Some(bit);
        }

        let bit_bias = if sample_size == 0 {
            0.0
        } else {
            ones as f64 / sample_size as f64 - 0.5
        };

        Self {
            bit_bias,
            longest_run,
            transitions,
            sample_size,
        }
    }

    /// Statistics of a matrix in row-major order.
    pub fn of_matrix(matrix: &BitMatrix) -> Self {
        Self::analyze(matrix.as_slice().iter().map(|&b| b == 1))
    }

    /// Statistics of a sample, most-significant bit first.
    pub fn of_sample(sample: &SampledBits) -> Self {
        Self::analyze((0..sample.width()).rev().map(|i| sample.bit(i)))
    }

    /// True when every bit has the same value.
    pub fn is_constant(&self) -> bool {
        self.sample_size > 0 && self.transitions == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternating_bits() {
        let stats = BitStatistics::analyze((0..100).map(|i| i % 2 == 0));
        assert!(stats.bit_bias.abs() < 0.001);
        assert_eq!(stats.longest_run, 1);
        assert_eq!(stats.transitions, 99);
        assert!(!stats.is_constant());
    }

    #[test]
    fn test_constant_matrix() {
        let matrix = BitMatrix::new(vec![1; 64], 8, 8).unwrap();
        let stats = BitStatistics::of_matrix(&matrix);
        assert!((stats.bit_bias - 0.5).abs() < 0.001);
        assert_eq!(stats.longest_run, 64);
        assert!(stats.is_constant());
    }

    #[test]
    fn test_sample_runs() {
        let sample = SampledBits::from_msb_bits([true, true, true, false, false, true]);
        let stats = BitStatistics::of_sample(&sample);
        assert_eq!(stats.sample_size, 6);
        assert_eq!(stats.longest_run, 3);
        assert_eq!(stats.transitions, 2);
    }

    #[test]
    fn test_empty_input() {
        let stats = BitStatistics::analyze(std::iter::empty::<bool>());
        assert_eq!(stats.sample_size, 0);
        assert!(!stats.is_constant());
    }
}

//! Hénon-map bit sampling from a binarized image.
//!
//! The Hénon map is used purely as a deterministic, dispersive index
//! generator: its orbit is folded back into the matrix with a modulo and
//! each visited pixel contributes one bit.

use super::{SampledBits, SamplerError};
use crate::capture::BitMatrix;

/// Hénon map coefficient `a` (classical value).
pub const HENON_A: f64 = 1.4;

/// Hénon map coefficient `b` (classical value).
pub const HENON_B: f64 = 0.3;

/// Largest sample the image sampler will produce.
pub const MAX_IMAGE_BITS: usize = 512;

/// Draws seed bits from a [`BitMatrix`] along a Hénon orbit.
///
/// Stateless: the result is a pure function of the matrix and the
/// requested length.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageSeedSampler;

impl ImageSeedSampler {
    pub fn new() -> Self {
        Self
    }

    /// Samples `nbits` bits (1..=512) from `matrix`.
    ///
    /// Starting from `(x, y) = (nbits - 1, nbits + 1)`, each step applies
    /// `(x, y) <- ((1 - a*x^2 + y) mod N, b*x)` and reads the pixel at
    /// `trunc(|x|) mod N`. The first step yields the most-significant bit.
    pub fn sample(&self, matrix: &BitMatrix, nbits: usize) -> Result<SampledBits, SamplerError> {
        if !(1..=MAX_IMAGE_BITS).contains(&nbits) {
            return Err(SamplerError::InvalidBitLength(nbits));
        }
        if matrix.is_empty() {
            return Err(SamplerError::EmptyMatrix);
        }

        let len = matrix.len();
        let modulus = len as f64;
        let mut x = (nbits - 1) as f64;
        let mut y = (nbits + 1) as f64;
        let mut bits = Vec::with_capacity(nbits);

        for step in 0..nbits {
            let next_x = (1.0 - HENON_A * (x * x) + y).rem_euclid(modulus);
            y = HENON_B * x;
            x = next_x;

            if !x.is_finite() {
                return Err(SamplerError::DegenerateOrbit(step));
            }
            // rem_euclid can round up to exactly N for tiny negative inputs.
            let index = (x.abs().trunc() as usize) % len;
            bits.push(matrix.as_slice()[index] == 1);
        }

        let sample = SampledBits::from_msb_bits(bits);
        tracing::debug!(
            nbits,
            matrix_len = len,
            bit_bias = sample.bit_bias(),
            "Sampled image seed"
        );
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;

    fn checkerboard(width: u32, height: u32) -> BitMatrix {
        let bits = (0..width * height)
            .map(|i| ((i % width) + (i / width)) % 2 == 0)
            .collect::<Vec<_>>();
        BitMatrix::new(bits.into_iter().map(u8::from).collect(), width, height).unwrap()
    }

    /// Walks the orbit by hand for a small case.
    fn reference_indices(nbits: usize, len: usize) -> Vec<usize> {
        let (mut x, mut y) = ((nbits - 1) as f64, (nbits + 1) as f64);
        (0..nbits)
            .map(|_| {
                let nx = (1.0 - 1.4 * (x * x) + y).rem_euclid(len as f64);
                y = 0.3 * x;
                x = nx;
                (x.abs() as usize) % len
            })
            .collect()
    }

    #[test]
    fn test_bit_length_bounds() {
        let matrix = checkerboard(8, 8);
        let sampler = ImageSeedSampler::new();

        assert!(matches!(
            sampler.sample(&matrix, 0),
            Err(SamplerError::InvalidBitLength(0))
        ));
        assert!(matches!(
            sampler.sample(&matrix, 513),
            Err(SamplerError::InvalidBitLength(513))
        ));
        assert!(sampler.sample(&matrix, 1).is_ok());
        assert_eq!(sampler.sample(&matrix, 512).unwrap().width(), 512);
    }

    #[test]
    fn test_empty_matrix_rejected() {
        let empty = BitMatrix::from_bits(std::iter::empty::<bool>());
        assert!(matches!(
            ImageSeedSampler::new().sample(&empty, 16),
            Err(SamplerError::EmptyMatrix)
        ));
    }

    #[test]
    fn test_first_step_by_hand() {
        // nbits = 1: x = 0, y = 2 -> x' = (1 - 0 + 2) mod N = 3.
        let matrix = BitMatrix::from_bits([false, false, false, true, false]);
        let bits = ImageSeedSampler::new().sample(&matrix, 1).unwrap();
        assert_eq!(bits.value(), &BigUint::from(1u32));

        let matrix = BitMatrix::from_bits([true, true, true, false, true]);
        let bits = ImageSeedSampler::new().sample(&matrix, 1).unwrap();
        assert_eq!(bits.value(), &BigUint::from(0u32));
    }

    #[test]
    fn test_matches_orbit_walk() {
        let matrix = checkerboard(13, 7);
        let nbits = 40;
        let expected = SampledBits::from_msb_bits(
            reference_indices(nbits, matrix.len())
                .into_iter()
                .map(|i| matrix.as_slice()[i] == 1),
        );

        let bits = ImageSeedSampler::new().sample(&matrix, nbits).unwrap();
        assert_eq!(bits, expected);
    }

    /// Bits of a 768-pixel pattern along the orbit, computed independently
    /// with `a * (x * x)` rounding.
    const PATTERN_256: &str = "\
        0000000110001000100000111000000100000101010000000000010000010000\
        1100100101000000100000100100011000000110011011010010001011010001\
        1010100100101000000000000010010010010010110000000000100100101000\
        1100110110000010000011110010010010000000101101110010000000001001";

    #[test]
    fn test_matches_known_pattern_bits() {
        let matrix = BitMatrix::from_bits((0..768usize).map(|i| (i * i + 3 * i) % 7 < 3));
        let bits = ImageSeedSampler::new().sample(&matrix, 256).unwrap();
        assert_eq!(bits.to_binary_string(), PATTERN_256);
    }

    #[test]
    fn test_uniform_matrices() {
        let ones = BitMatrix::new(vec![1; 20], 5, 4).unwrap();
        let zeros = BitMatrix::new(vec![0; 20], 5, 4).unwrap();
        let sampler = ImageSeedSampler::new();

        assert_eq!(sampler.sample(&ones, 12).unwrap().popcount(), 12);
        assert_eq!(sampler.sample(&zeros, 12).unwrap().popcount(), 0);
    }

    #[test]
    fn test_single_pixel_matrix() {
        let matrix = BitMatrix::from_bits([true]);
        let bits = ImageSeedSampler::new().sample(&matrix, 64).unwrap();
        assert_eq!(bits.popcount(), 64);
    }
}

//! Fixed-width sampler output.

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Bits produced by a seed sampler.
///
/// Holds an unsigned integer together with the width it was sampled at,
/// so leading zero bits are not lost when formatting or reducing it.
#[derive(Clone, PartialEq, Eq)]
pub struct SampledBits {
    value: BigUint,
    width: usize,
}

impl SampledBits {
    /// Builds a value from bits given most-significant first.
    pub fn from_msb_bits(bits: impl IntoIterator<Item = bool>) -> Self {
        let mut value = BigUint::zero();
        let mut width = 0;
        for bit in bits {
            value <<= 1usize;
            if bit {
                value += 1u32;
            }
            width += 1;
        }
        Self { value, width }
    }

    /// Builds a value from big-endian bytes; the width is 8 bits per byte.
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        Self {
            value: BigUint::from_bytes_be(bytes),
            width: bytes.len() * 8,
        }
    }

    /// Forces the most-significant bit of the declared width to 1.
    pub(crate) fn set_top_bit(&mut self) {
        if self.width > 0 {
            self.value |= BigUint::one() << (self.width - 1);
        }
    }

    /// Returns the sampled integer.
    #[inline]
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Consumes the sample, returning the integer.
    pub fn into_value(self) -> BigUint {
        self.value
    }

    /// Returns the sampled width in bits.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns bit `index`, counted from the least-significant end.
    pub fn bit(&self, index: usize) -> bool {
        ((&self.value >> index) & BigUint::one()).is_one()
    }

    /// Returns the least-significant 128 bits.
    pub fn low_u128(&self) -> u128 {
        let bytes = self.value.to_bytes_le();
        let mut buf = [0u8; 16];
        let n = bytes.len().min(16);
        buf[..n].copy_from_slice(&bytes[..n]);
        u128::from_le_bytes(buf)
    }

    /// Counts the number of set bits.
    pub fn popcount(&self) -> usize {
        self.value
            .to_bytes_le()
            .iter()
            .map(|b| b.count_ones() as usize)
            .sum()
    }

    /// Calculates bit bias as deviation from 0.5.
    ///
    /// Returns a value in [-0.5, 0.5] where 0.0 is unbiased.
    pub fn bit_bias(&self) -> f64 {
        if self.width == 0 {
            return 0.0;
        }
        (self.popcount() as f64 / self.width as f64) - 0.5
    }

    /// Formats the value as binary digits, zero-padded to the width.
    pub fn to_binary_string(&self) -> String {
        format!("{:0width$b}", self.value, width = self.width)
    }
}

impl std::fmt::Debug for SampledBits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampledBits")
            .field("width", &self.width)
            .field("bit_bias", &format!("{:.4}", self.bit_bias()))
            .finish_non_exhaustive()
    }
}

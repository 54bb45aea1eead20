//! Fixed-width generator seed.

use crate::sampling::SampledBits;

/// Initial content of a [`BitStreamGenerator`](super::BitStreamGenerator)
/// register. Always exactly 128 bits wide.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Seed(u128);

impl Seed {
    /// Register width in bits.
    pub const BITS: u32 = u128::BITS;

    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Reduces a sample to the register width.
    ///
    /// Wider samples keep their least-significant 128 bits; narrower
    /// samples are zero-extended.
    pub fn from_sample(sample: &SampledBits) -> Self {
        if sample.width() > Self::BITS as usize {
            tracing::debug!(
                width = sample.width(),
                "Sample wider than register, keeping low 128 bits"
            );
        }
        Self(sample.low_u128())
    }

    #[inline]
    pub fn value(&self) -> u128 {
        self.0
    }

    /// True for the all-zero seed, which never leaves the zero state.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<u128> for Seed {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<&SampledBits> for Seed {
    fn from(sample: &SampledBits) -> Self {
        Self::from_sample(sample)
    }
}

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Seed")
            .field("is_zero", &self.is_zero())
            .finish_non_exhaustive()
    }
}

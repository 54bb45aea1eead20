//! 128-bit feedback shift register stream generator.
//!
//! # Recurrence
//!
//! For every emitted bit the register `s` is advanced once:
//!
//! ```text
//! feedback = s[0] ^ s[1] ^ s[2] ^ s[7]
//! s        = (s >> 1) | (feedback << 127)
//! output   = s[0]
//! ```
//!
//! Output bits are accumulated most-significant first, so successive
//! calls concatenate: `next_bits(3)` followed by `next_bits(5)` yields the
//! same eight bits as a single `next_bits(8)` from the same state.
//!
//! # Zero state
//!
//! The all-zero register is absorbing: its feedback is always zero and
//! every later output bit is zero. Seeding with zero is allowed and
//! behaves that way; [`BitStreamGenerator::is_degenerate`] reports it.

use super::Seed;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand_core::RngCore;
use thiserror::Error;

/// Largest request accepted by [`BitStreamGenerator::next_bits`].
pub const MAX_BITS_PER_CALL: usize = 1024;

/// Largest request accepted by [`BitStreamGenerator::next_word`].
pub const MAX_WORD_BITS: u32 = u128::BITS;

/// Errors produced by the stream generator.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("nbits: invalid bit length {requested} (expected 1 <= nbits <= {max})")]
    InvalidBitCount { requested: usize, max: usize },
}

/// Stateful pseudorandom bit stream over a 128-bit register.
///
/// Calls are correlated through the shared register: each one continues
/// where the previous left off. Independent streams need independent
/// instances.
pub struct BitStreamGenerator {
    state: u128,
    /// Total bits emitted since construction.
    emitted: u64,
}

impl BitStreamGenerator {
    /// Creates a generator whose register starts at `seed`.
    pub fn new(seed: Seed) -> Self {
        if seed.is_zero() {
            tracing::warn!("Generator seeded with zero; output will be constantly zero");
        } else {
            tracing::debug!("Generator seeded");
        }
        Self {
            state: seed.value(),
            emitted: 0,
        }
    }

    /// Emits `n` bits (1..=1024) as an unsigned integer, first bit most
    /// significant.
    ///
    /// With `enforce`, bit `n - 1` of the result is forced to 1 so the
    /// value has exactly `n` significant bits. The register is left
    /// untouched when `n` is rejected.
    pub fn next_bits(&mut self, n: usize, enforce: bool) -> Result<BigUint, GeneratorError> {
        if !(1..=MAX_BITS_PER_CALL).contains(&n) {
            return Err(GeneratorError::InvalidBitCount {
                requested: n,
                max: MAX_BITS_PER_CALL,
            });
        }

        let mut out = BigUint::zero();
        let mut remaining = n;
        while remaining > 0 {
            let chunk = remaining.min(MAX_WORD_BITS as usize);
            out <<= chunk;
            out |= BigUint::from(self.draw(chunk as u32));
            remaining -= chunk;
        }

        if enforce {
            out |= BigUint::one() << (n - 1);
        }
        Ok(out)
    }

    /// Emits `n` bits (1..=128) as a `u128`.
    ///
    /// Produces exactly the bits `next_bits(n, false)` would.
    pub fn next_word(&mut self, n: u32) -> Result<u128, GeneratorError> {
        if !(1..=MAX_WORD_BITS).contains(&n) {
            return Err(GeneratorError::InvalidBitCount {
                requested: n as usize,
                max: MAX_WORD_BITS as usize,
            });
        }
        Ok(self.draw(n))
    }

    /// Current register contents.
    #[inline]
    pub fn state(&self) -> u128 {
        self.state
    }

    /// Total bits emitted since construction.
    #[inline]
    pub fn bits_emitted(&self) -> u64 {
        self.emitted
    }

    /// True once the register has reached the absorbing zero state.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.state == 0
    }

    /// Unchecked draw of `n <= 128` bits.
    fn draw(&mut self, n: u32) -> u128 {
        let mut word = 0u128;
        for _ in 0..n {
            word = (word << 1) | u128::from(self.step());
        }
        word
    }

    /// Advances the register once and returns the new low bit.
    #[inline]
    fn step(&mut self) -> bool {
        let s = self.state;
        let feedback = (s ^ (s >> 1) ^ (s >> 2) ^ (s >> 7)) & 1;
        self.state = (s >> 1) | (feedback << 127);
        self.emitted += 1;
        self.state & 1 == 1
    }
}

impl std::fmt::Debug for BitStreamGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitStreamGenerator")
            .field("bits_emitted", &self.emitted)
            .field("degenerate", &self.is_degenerate())
            .finish_non_exhaustive()
    }
}

impl RngCore for BitStreamGenerator {
    fn next_u32(&mut self) -> u32 {
        self.draw(32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.draw(64) as u64
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for byte in dest.iter_mut() {
            *byte = self.draw(8) as u8;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Direct iteration of the recurrence, one bit per entry.
    fn reference_bits(seed: u128, n: usize) -> Vec<bool> {
        let mut s = seed;
        (0..n)
            .map(|_| {
                let fb = ((s & 1) ^ ((s >> 1) & 1) ^ ((s >> 2) & 1) ^ ((s >> 7) & 1)) & 1;
                s = (s >> 1) | (fb << 127);
                s & 1 == 1
            })
            .collect()
    }

    fn to_biguint(bits: &[bool]) -> BigUint {
        bits.iter().fold(BigUint::zero(), |acc, &b| {
            (acc << 1usize) + BigUint::from(u8::from(b))
        })
    }

    #[test]
    fn test_bit_count_bounds() {
        let mut generator = BitStreamGenerator::new(Seed::new(0xFEED));
        let before = generator.state();

        assert!(matches!(
            generator.next_bits(0, false),
            Err(GeneratorError::InvalidBitCount { requested: 0, .. })
        ));
        assert!(matches!(
            generator.next_bits(1025, true),
            Err(GeneratorError::InvalidBitCount { requested: 1025, .. })
        ));
        assert!(generator.next_word(0).is_err());
        assert!(generator.next_word(129).is_err());
        assert_eq!(generator.state(), before);
        assert_eq!(generator.bits_emitted(), 0);

        assert!(generator.next_bits(1024, false).is_ok());
        assert_eq!(generator.bits_emitted(), 1024);
    }

    #[test]
    fn test_single_enforced_bit_is_one() {
        for seed in [0u128, 1, 2, u128::MAX, 0x1234_5678] {
            let mut generator = BitStreamGenerator::new(Seed::new(seed));
            assert_eq!(generator.next_bits(1, true).unwrap(), BigUint::one());
        }
    }

    #[test]
    fn test_zero_seed_is_absorbing() {
        let mut generator = BitStreamGenerator::new(Seed::new(0));
        assert!(generator.is_degenerate());
        for _ in 0..10 {
            assert!(generator.next_bits(4, false).unwrap().is_zero());
        }
        assert!(generator.is_degenerate());
    }

    #[test]
    fn test_hand_computed_steps() {
        // s = 0b10: fb = 1 -> s = 1 | 1<<127, out 1
        //           fb = 1 -> s = 1<<126 | 1<<127, out 0
        //           fb = 0 -> s = 1<<125 | 1<<126, out 0
        let mut generator = BitStreamGenerator::new(Seed::new(0b10));
        assert_eq!(generator.next_bits(3, false).unwrap(), BigUint::from(0b100u32));
        assert_eq!(generator.state(), (1 << 125) | (1 << 126));

        // A lone bit at 0 walks up to the top and needs 121 steps to
        // reach a tap again, so the first outputs are all zero.
        let mut generator = BitStreamGenerator::new(Seed::new(1));
        assert_eq!(generator.next_word(8).unwrap(), 0);
        assert_eq!(generator.state(), 1 << 120);
    }

    #[test]
    fn test_enforce_sets_top_bit() {
        let mut generator = BitStreamGenerator::new(Seed::new(1));
        let value = generator.next_bits(16, true).unwrap();
        assert_eq!(value, BigUint::from(1u32 << 15));
    }

    #[test]
    fn test_matches_reference_across_chunks() {
        let seed = 0x0F1E_2D3C_4B5A_6978_8796_A5B4_C3D2_E1F0u128;
        let mut generator = BitStreamGenerator::new(Seed::new(seed));

        let value = generator.next_bits(300, false).unwrap();
        assert_eq!(value, to_biguint(&reference_bits(seed, 300)));
        assert_eq!(generator.bits_emitted(), 300);
    }

    #[test]
    fn test_word_matches_bits() {
        let seed = Seed::new(0xC0FF_EE00_1234);
        let mut words = BitStreamGenerator::new(seed);
        let mut bits = BitStreamGenerator::new(seed);

        for n in [1u32, 7, 64, 128, 33] {
            let word = words.next_word(n).unwrap();
            assert_eq!(BigUint::from(word), bits.next_bits(n as usize, false).unwrap());
        }
        assert_eq!(words.state(), bits.state());
    }

    #[test]
    fn test_rng_core_draws_from_same_stream() {
        let seed = Seed::new(0xABCD_EF01_2345_6789);
        let mut rng = BitStreamGenerator::new(seed);
        let mut reference = BitStreamGenerator::new(seed);

        assert_eq!(u128::from(rng.next_u32()), reference.next_word(32).unwrap());
        assert_eq!(u128::from(rng.next_u64()), reference.next_word(64).unwrap());

        let mut buf = [0u8; 5];
        rng.fill_bytes(&mut buf);
        for byte in buf {
            assert_eq!(u128::from(byte), reference.next_word(8).unwrap());
        }
    }

    proptest! {
        #[test]
        fn split_calls_concatenate(seed: u128, first in 1usize..200, second in 1usize..200) {
            let mut split = BitStreamGenerator::new(Seed::new(seed));
            let mut whole = BitStreamGenerator::new(Seed::new(seed));

            let a = split.next_bits(first, false).unwrap();
            let b = split.next_bits(second, false).unwrap();
            let c = whole.next_bits(first + second, false).unwrap();

            prop_assert_eq!((a << second) | b, c);
            prop_assert_eq!(split.state(), whole.state());
        }

        #[test]
        fn enforced_value_has_exact_width(seed: u128, n in 1usize..=1024) {
            let mut generator = BitStreamGenerator::new(Seed::new(seed));
            let value = generator.next_bits(n, true).unwrap();
            prop_assert_eq!(value.bits(), n as u64);
        }
    }
}

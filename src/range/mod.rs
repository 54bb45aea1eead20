//! Mapping randomness into closed integer intervals.
//!
//! Two independent strategies produce an integer `r` with `a <= r <= b`:
//!
//! - [`StreamRangeMapper`] draws `floor(log2(b - a)) + 1` bits per value
//!   from a [`BitStreamGenerator`](crate::generator::BitStreamGenerator)
//!   and reduces them modulo the interval size;
//! - [`HashRangeMapper`] digests a freshly captured image. It is
//!   deprecated: every call triggers a capture and the reduction is
//!   biased for interval sizes that are not powers of two.

mod hash;
mod stream;

pub use hash::{Deprecated, DeprecationNotice, HashAlgorithm, HashRangeMapper};
pub use stream::StreamRangeMapper;

use crate::capture::CaptureError;
use crate::generator::GeneratorError;
use thiserror::Error;

/// Errors produced by the range strategies.
#[derive(Debug, Error)]
pub enum RangeError {
    #[error("a, b: invalid range arguments {a}, {b} (expected a <= b; a, b >= 0)")]
    InvalidRange { a: i64, b: i64 },
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// A validated closed interval `[a, b]` with `0 <= a <= b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRequest {
    a: i64,
    b: i64,
}

impl RangeRequest {
    pub fn new(a: i64, b: i64) -> Result<Self, RangeError> {
        if a > b || a < 0 || b < 0 {
            return Err(RangeError::InvalidRange { a, b });
        }
        Ok(Self { a, b })
    }

    #[inline]
    pub fn low(&self) -> i64 {
        self.a
    }

    #[inline]
    pub fn high(&self) -> i64 {
        self.b
    }

    /// `b - a`.
    #[inline]
    pub fn width(&self) -> u64 {
        (self.b - self.a) as u64
    }

    /// Number of integers in the interval, `b - a + 1`.
    #[inline]
    pub fn span(&self) -> u64 {
        self.width() + 1
    }

    /// Bits drawn per value: `floor(log2(b - a)) + 1`, or 1 for a
    /// single-value interval.
    pub fn draw_bits(&self) -> u32 {
        match self.width() {
            0 => 1,
            width => width.ilog2() + 1,
        }
    }

    #[inline]
    pub fn contains(&self, value: i64) -> bool {
        (self.a..=self.b).contains(&value)
    }

    /// Maps a residue in `[0, span)` onto the interval.
    #[inline]
    fn offset(&self, residue: u64) -> i64 {
        self.a + residue as i64
    }
}

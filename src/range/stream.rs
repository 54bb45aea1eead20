//! Generator-backed range mapping.

use super::{RangeError, RangeRequest};
use crate::generator::BitStreamGenerator;

/// Draws bounded integers from a shared bit stream.
///
/// Each value consumes `request.draw_bits()` bits from the generator, so
/// values in a batch are correlated through its register rather than
/// being independent draws.
#[derive(Debug, Clone, Copy)]
pub struct StreamRangeMapper {
    request: RangeRequest,
    nbits: u32,
}

impl StreamRangeMapper {
    pub fn new(request: RangeRequest) -> Self {
        Self {
            request,
            nbits: request.draw_bits(),
        }
    }

    /// Validates `[a, b]` and builds a mapper for it.
    pub fn for_bounds(a: i64, b: i64) -> Result<Self, RangeError> {
        Ok(Self::new(RangeRequest::new(a, b)?))
    }

    pub fn request(&self) -> RangeRequest {
        self.request
    }

    /// Bits consumed per value.
    pub fn nbits(&self) -> u32 {
        self.nbits
    }

    /// Draws one value: `a + bits mod (b - a + 1)`. Same as a batch of one.
    pub fn range_one(&self, generator: &mut BitStreamGenerator) -> Result<i64, RangeError> {
        let bits = generator.next_word(self.nbits)?;
        let residue = (bits % u128::from(self.request.span())) as u64;
        Ok(self.request.offset(residue))
    }

    /// Draws `n` values in sequence. An empty batch leaves the generator
    /// untouched.
    pub fn draw_many(
        &self,
        generator: &mut BitStreamGenerator,
        n: usize,
    ) -> Result<Vec<i64>, RangeError> {
        let values = (0..n)
            .map(|_| self.range_one(generator))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            a = self.request.low(),
            b = self.request.high(),
            n,
            nbits = self.nbits,
            "Drew ranged integers"
        );
        Ok(values)
    }
}

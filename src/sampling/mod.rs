//! Seed sampling from physical entropy sources.
//!
//! Two samplers turn raw observations into seed bits:
//!
//! - [`ImageSeedSampler`] walks a Hénon orbit over a binarized image;
//! - [`CursorSeedSampler`] extracts coordinate parities from cursor motion.
//!
//! Both return [`SampledBits`], which [`Seed`](crate::generator::Seed)
//! reduces to the generator's 128-bit register width.

mod bits;
mod clock;
mod cursor;
mod image;

pub use bits::SampledBits;
pub use clock::{CancellationToken, Clock, ManualClock, SystemClock};
pub use cursor::{
    CursorSample, CursorSeedSampler, NoProgress, PositionError, PositionSource, Progress,
    ScriptedPositions, MAX_CURSOR_BYTES, MIN_CURSOR_BYTES,
};
pub use image::{ImageSeedSampler, HENON_A, HENON_B, MAX_IMAGE_BITS};

use std::time::Duration;
use thiserror::Error;

/// Errors produced by the seed samplers.
#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("nbits: invalid bit length {0} (expected 1 <= nbits <= 512)")]
    InvalidBitLength(usize),
    #[error("nbytes: invalid byte length {0} (expected 16 <= nbytes <= 32)")]
    InvalidByteLength(usize),
    #[error("bit matrix is empty")]
    EmptyMatrix,
    #[error("chaotic map orbit diverged at step {0}")]
    DegenerateOrbit(usize),
    #[error("no cursor motion observed within {0:?}")]
    TimedOut(Duration),
    #[error("sampling cancelled")]
    Cancelled,
    #[error(transparent)]
    Position(PositionError),
}

impl From<PositionError> for SamplerError {
    fn from(err: PositionError) -> Self {
        match err {
            PositionError::Interrupted => SamplerError::Cancelled,
            other => SamplerError::Position(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_maps_to_cancel() {
        assert!(matches!(
            SamplerError::from(PositionError::Interrupted),
            SamplerError::Cancelled
        ));
        assert!(matches!(
            SamplerError::from(PositionError::Unavailable("gone".into())),
            SamplerError::Position(_)
        ));
    }
}

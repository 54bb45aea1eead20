//! Cursor-motion seed sampling.
//!
//! Each seed bit is the parity of a cursor sample's coordinates. After a
//! sample is taken the sampler waits until the cursor has moved, so a
//! resting hand cannot repeat the same bit.
//!
//! This is a blocking operation. With no timeout it waits indefinitely
//! for motion; callers that need bounded latency set a timeout or hold a
//! [`CancellationToken`].

use super::{CancellationToken, Clock, SampledBits, SamplerError, SystemClock};
use crate::capture::CursorConfig;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Smallest cursor seed, in bytes.
pub const MIN_CURSOR_BYTES: usize = 16;

/// Largest cursor seed, in bytes.
pub const MAX_CURSOR_BYTES: usize = 32;

/// A cursor position in screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CursorSample {
    pub x: i32,
    pub y: i32,
}

impl CursorSample {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// XOR of the lowest bits of both coordinates.
    #[inline]
    pub fn parity(&self) -> bool {
        (self.x ^ self.y) & 1 == 1
    }
}

/// Errors reported by a cursor position source.
#[derive(Debug, Error)]
pub enum PositionError {
    #[error("cursor position unavailable: {0}")]
    Unavailable(String),
    #[error("interrupted by user")]
    Interrupted,
    #[error("cursor input failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Synchronous cursor position provider.
pub trait PositionSource {
    /// Returns the current cursor position.
    fn position(&mut self) -> Result<CursorSample, PositionError>;
}

/// Replays a fixed list of positions.
///
/// Once the script runs out the last position repeats forever, which
/// models a hand that has stopped moving.
#[derive(Debug, Clone)]
pub struct ScriptedPositions {
    script: VecDeque<CursorSample>,
    last: Option<CursorSample>,
    reads: usize,
}

impl ScriptedPositions {
    pub fn new(positions: impl IntoIterator<Item = CursorSample>) -> Self {
        Self {
            script: positions.into_iter().collect(),
            last: None,
            reads: 0,
        }
    }

    /// Number of positions handed out so far.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl PositionSource for ScriptedPositions {
    fn position(&mut self) -> Result<CursorSample, PositionError> {
        if let Some(next) = self.script.pop_front() {
            self.last = Some(next);
        }
        self.reads += 1;
        self.last
            .ok_or_else(|| PositionError::Unavailable("empty position script".into()))
    }
}

/// Observer notified after every collected bit.
pub trait Progress {
    fn update(&mut self, collected: usize, total: usize);
}

impl<F: FnMut(usize, usize)> Progress for F {
    fn update(&mut self, collected: usize, total: usize) {
        self(collected, total)
    }
}

/// Progress observer that ignores updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn update(&mut self, _collected: usize, _total: usize) {}
}

/// Collects a seed from cursor motion.
pub struct CursorSeedSampler<C: Clock = SystemClock> {
    clock: C,
    sample_delay: Duration,
    poll_interval: Duration,
    timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl CursorSeedSampler<SystemClock> {
    /// Creates a sampler on the system clock with default timings.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Creates a sampler on the system clock using `config` timings.
    pub fn from_config(config: &CursorConfig) -> Self {
        Self::new().configure(config)
    }
}

impl Default for CursorSeedSampler<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> CursorSeedSampler<C> {
    /// Creates a sampler on `clock` with default timings: 100 ms after
    /// each sample, 200 ms between motion polls, no timeout.
    pub fn with_clock(clock: C) -> Self {
        let defaults = CursorConfig::default();
        Self {
            clock,
            sample_delay: defaults.sample_delay(),
            poll_interval: defaults.poll_interval(),
            timeout: defaults.timeout(),
            cancel: CancellationToken::new(),
        }
    }

    /// Applies the timings from `config`.
    pub fn configure(mut self, config: &CursorConfig) -> Self {
        self.sample_delay = config.sample_delay();
        self.poll_interval = config.poll_interval();
        self.timeout = config.timeout();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Returns a handle that cancels in-progress sampling.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Collects `nbytes` bytes (16..=32) of cursor parity bits.
    ///
    /// Bits are packed MSB-first into bytes and bytes MSB-first into the
    /// result, whose top bit is then forced to 1. Position source errors
    /// are returned immediately.
    pub fn sample<P>(
        &self,
        source: &mut P,
        nbytes: usize,
        progress: &mut dyn Progress,
    ) -> Result<SampledBits, SamplerError>
    where
        P: PositionSource + ?Sized,
    {
        if !(MIN_CURSOR_BYTES..=MAX_CURSOR_BYTES).contains(&nbytes) {
            return Err(SamplerError::InvalidByteLength(nbytes));
        }

        let deadline = self.timeout.map(|t| self.clock.now() + t);
        let total = nbytes * 8;
        let mut bytes = Vec::with_capacity(nbytes);

        tracing::debug!(nbytes, timeout = ?self.timeout, "Collecting cursor seed");

        for byte_index in 0..nbytes {
            let mut byte = 0u8;
            for bit_index in 0..8 {
                self.ensure_live(deadline)?;
                let sample = source.position()?;
                byte = (byte << 1) | u8::from(sample.parity());

                self.clock.sleep(self.sample_delay);
                self.wait_for_motion(source, sample, deadline)?;

                let collected = byte_index * 8 + bit_index + 1;
                tracing::trace!(collected, total, "Cursor bit collected");
                progress.update(collected, total);
            }
            bytes.push(byte);
        }

        let mut bits = SampledBits::from_be_bytes(&bytes);
        bits.set_top_bit();
        tracing::debug!(nbytes, bit_bias = bits.bit_bias(), "Cursor seed collected");
        Ok(bits)
    }

    /// Polls until the cursor leaves `from`.
    fn wait_for_motion<P>(
        &self,
        source: &mut P,
        from: CursorSample,
        deadline: Option<Instant>,
    ) -> Result<(), SamplerError>
    where
        P: PositionSource + ?Sized,
    {
        loop {
            self.ensure_live(deadline)?;
            if source.position()? != from {
                return Ok(());
            }
            self.clock.sleep(self.poll_interval);
        }
    }

    fn ensure_live(&self, deadline: Option<Instant>) -> Result<(), SamplerError> {
        if self.cancel.is_cancelled() {
            return Err(SamplerError::Cancelled);
        }
        match (deadline, self.timeout) {
            (Some(deadline), Some(timeout)) if self.clock.now() >= deadline => {
                Err(SamplerError::TimedOut(timeout))
            }
            _ => Ok(()),
        }
    }
}

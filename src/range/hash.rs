//! Digest-based range mapping (deprecated).
//!
//! Hashes the pixel bytes of a freshly captured [`BitMatrix`] into a
//! 512-bit digest and reduces it modulo the interval size. Kept for
//! compatibility only: each call re-triggers a capture, and the modulo
//! reduction is biased unless the interval size is a power of two. New
//! code should use [`StreamRangeMapper`](super::StreamRangeMapper).

use super::{RangeError, RangeRequest};
use crate::capture::{BitMatrix, ImageSource};
use blake3::Hasher as Blake3Hasher;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

/// Digest length in bytes (512 bits).
pub const DIGEST_BYTES: usize = 64;

/// Supported 512-bit digests for the hash-based range strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-512, the reference digest.
    #[default]
    Sha512,
    /// BLAKE3 in extendable-output mode, read to 64 bytes.
    Blake3,
}

impl HashAlgorithm {
    /// Computes the 512-bit digest of `data`.
    pub fn digest(&self, data: &[u8]) -> [u8; DIGEST_BYTES] {
        let mut out = [0u8; DIGEST_BYTES];
        match self {
            HashAlgorithm::Sha512 => {
                out.copy_from_slice(&Sha512::digest(data));
            }
            HashAlgorithm::Blake3 => {
                let mut hasher = Blake3Hasher::new();
                hasher.update(data);
                hasher.finalize_xof().fill(&mut out);
            }
        }
        out
    }
}

/// Advisory attached to results of deprecated operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeprecationNotice {
    /// Name of the deprecated operation.
    pub feature: &'static str,
    /// Why it is deprecated and what to use instead.
    pub reason: &'static str,
}

impl std::fmt::Display for DeprecationNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is deprecated: {}", self.feature, self.reason)
    }
}

/// Notice carried by every hash-based range result.
pub const HASH_RANGE_NOTICE: DeprecationNotice = DeprecationNotice {
    feature: "hash-based range mapping",
    reason: "it captures a new image on every call and is biased for interval sizes \
             that are not powers of two; use StreamRangeMapper",
};

/// A result produced by a deprecated operation.
///
/// The value is valid; the notice tells the caller the operation that
/// produced it is scheduled for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Deprecated<T> {
    value: T,
    notice: DeprecationNotice,
}

impl<T> Deprecated<T> {
    pub fn new(value: T, notice: DeprecationNotice) -> Self {
        Self { value, notice }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn notice(&self) -> &DeprecationNotice {
        &self.notice
    }

    /// Discards the notice.
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Maps image digests into an interval.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashRangeMapper {
    algorithm: HashAlgorithm,
}

impl HashRangeMapper {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Maps an already captured matrix: `a + h mod (b - a + 1)` where `h`
    /// is the digest of the matrix pixel bytes read as a big-endian
    /// integer.
    pub fn map_matrix(&self, matrix: &BitMatrix, request: RangeRequest) -> i64 {
        let digest = self.algorithm.digest(&matrix.to_pixel_bytes());
        let span = u128::from(request.span());

        // Horner reduction; span <= 2^63 keeps every step inside u128.
        let residue = digest
            .iter()
            .fold(0u128, |acc, &byte| ((acc << 8) | u128::from(byte)) % span);

        request.offset(residue as u64)
    }

    /// Captures a fresh image from `source` and maps its digest into
    /// `[a, b]`.
    ///
    /// Bounds are validated before the capture. Capture failures are
    /// returned as-is.
    #[deprecated(
        since = "0.3.0",
        note = "captures on every call and is modulo-biased; use StreamRangeMapper"
    )]
    pub fn ranged_int<S>(
        &self,
        source: &mut S,
        a: i64,
        b: i64,
    ) -> Result<Deprecated<i64>, RangeError>
    where
        S: ImageSource + ?Sized,
    {
        let request = RangeRequest::new(a, b)?;
        tracing::warn!("{}", HASH_RANGE_NOTICE);

        let matrix = source.capture_matrix()?;
        let value = self.map_matrix(&matrix, request);
        Ok(Deprecated::new(value, HASH_RANGE_NOTICE))
    }
}

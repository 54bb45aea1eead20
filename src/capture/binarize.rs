//! Otsu thresholding of grayscale frames into bit matrices.

use super::{BitMatrix, Frame};

/// Number of gray levels in an 8-bit frame.
const LEVELS: usize = 256;

/// Computes the Otsu threshold of an 8-bit image.
///
/// Picks the level `t` maximizing the between-class variance of the
/// split `{p <= t}` / `{p > t}`. Ties resolve to the lowest level.
/// A constant or empty image yields 0.
pub fn otsu_threshold(pixels: &[u8]) -> u8 {
    let mut histogram = [0u64; LEVELS];
    for &p in pixels {
        histogram[p as usize] += 1;
    }

    let total = pixels.len() as f64;
    let weighted_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut background_weight = 0.0;
    let mut background_sum = 0.0;
    let mut best_level = 0u8;
    let mut best_variance = 0.0;

    for (level, &count) in histogram.iter().enumerate() {
        background_weight += count as f64;
        background_sum += level as f64 * count as f64;
        if background_weight == 0.0 {
            continue;
        }
        let foreground_weight = total - background_weight;
        if foreground_weight == 0.0 {
            break;
        }

        let background_mean = background_sum / background_weight;
        let foreground_mean = (weighted_total - background_sum) / foreground_weight;
        let variance = background_weight
            * foreground_weight
            * (background_mean - foreground_mean).powi(2);

        if variance > best_variance {
            best_variance = variance;
            best_level = level as u8;
        }
    }

    best_level
}

/// Binarizes a frame with its Otsu threshold: pixels strictly above the
/// threshold become 1.
///
/// Returns `None` for frames whose buffer does not match their size.
pub fn binarize(frame: &Frame) -> Option<BitMatrix> {
    if !frame.is_valid() {
        return None;
    }
    let threshold = otsu_threshold(frame.pixels());
    let bits = frame
        .pixels()
        .iter()
        .map(|&p| u8::from(p > threshold))
        .collect();

    tracing::trace!(threshold, sequence = frame.sequence(), "Binarized frame");
    BitMatrix::new(bits, frame.width(), frame.height())
}

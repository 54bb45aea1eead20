//! Binarized image stored as a flat sequence of bits.

/// A thresholded image flattened row-major into 0/1 values.
///
/// This is the output of the capture pipeline and the input to
/// [`ImageSeedSampler`](crate::sampling::ImageSeedSampler) and the
/// hash-based range strategy. The ordering is significant: index
/// `row * width + col` holds the pixel at `(row, col)`.
#[derive(Clone, PartialEq, Eq)]
pub struct BitMatrix {
    /// One entry per pixel, each 0 or 1.
    bits: Vec<u8>,
    width: u32,
    height: u32,
}

impl BitMatrix {
    /// Creates a matrix from per-pixel bits.
    ///
    /// Any non-zero input value is stored as 1. Returns `None` if the
    /// buffer length does not match `width * height`.
    pub fn new(bits: Vec<u8>, width: u32, height: u32) -> Option<Self> {
        if bits.len() != (width as usize) * (height as usize) {
            return None;
        }
        let bits = bits.into_iter().map(|b| u8::from(b != 0)).collect();
        Some(Self {
            bits,
            width,
            height,
        })
    }

    /// Creates a single-row matrix from a bit sequence.
    pub fn from_bits(bits: impl IntoIterator<Item = bool>) -> Self {
        let bits: Vec<u8> = bits.into_iter().map(u8::from).collect();
        let width = bits.len() as u32;
        Self {
            bits,
            width,
            height: 1,
        }
    }

    /// Returns the bit at `index`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.bits.get(index).copied()
    }

    /// Returns the flattened bits.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.bits
    }

    /// Number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of set pixels.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b == 1).count()
    }

    /// Returns the thresholded image as it would be stored by an
    /// 8-bit binary threshold: 255 for set pixels, 0 otherwise.
    ///
    /// The hash-based range strategy digests these bytes.
    pub fn to_pixel_bytes(&self) -> Vec<u8> {
        self.bits.iter().map(|&b| b * 255).collect()
    }
}

impl std::fmt::Debug for BitMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitMatrix")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("ones", &self.count_ones())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_rejected() {
        assert!(BitMatrix::new(vec![0u8; 10], 4, 4).is_none());
    }

    #[test]
    fn test_values_normalized_to_bits() {
        let matrix = BitMatrix::new(vec![0, 255, 7, 0], 2, 2).unwrap();
        assert_eq!(matrix.as_slice(), &[0, 1, 1, 0]);
        assert_eq!(matrix.count_ones(), 2);
    }

    #[test]
    fn test_pixel_bytes_restore_threshold_levels() {
        let matrix = BitMatrix::from_bits([true, false, true]);
        assert_eq!(matrix.to_pixel_bytes(), vec![255, 0, 255]);
        assert_eq!(matrix.width(), 3);
        assert_eq!(matrix.height(), 1);
    }
}

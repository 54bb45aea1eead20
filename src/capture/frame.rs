//! Grayscale frame type and area downsampling.

/// A single captured grayscale frame.
///
/// One byte of luma per pixel, row-major.
#[derive(Clone)]
pub struct Frame {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    /// Monotonic sequence number assigned by the camera.
    sequence: u64,
}

impl Frame {
    /// Creates a new frame with the given parameters.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            pixels,
            width,
            height,
            sequence,
        }
    }

    /// Returns a reference to the raw pixel data.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Validates that the pixel buffer size matches dimensions.
    pub fn is_valid(&self) -> bool {
        self.pixels.len() == self.pixel_count()
    }

    /// Returns the destination size for a linear `scale`, truncating
    /// toward zero. Either side may come out as zero for tiny frames.
    pub fn scaled_dimensions(&self, scale: f64) -> (u32, u32) {
        (
            (self.width as f64 * scale) as u32,
            (self.height as f64 * scale) as u32,
        )
    }

    /// Shrinks the frame by averaging every source pixel that falls in
    /// each destination cell.
    ///
    /// Returns `None` when the scaled size is zero in either dimension
    /// or the frame buffer is inconsistent with its dimensions.
    pub fn downsample(&self, scale: f64) -> Option<Frame> {
        let (dst_w, dst_h) = self.scaled_dimensions(scale);
        if dst_w == 0 || dst_h == 0 || !self.is_valid() {
            return None;
        }

        let (src_w, src_h) = (self.width as usize, self.height as usize);
        let (dst_w, dst_h) = (dst_w as usize, dst_h as usize);
        let mut out = Vec::with_capacity(dst_w * dst_h);

        for dy in 0..dst_h {
            let y0 = dy * src_h / dst_h;
            let y1 = ((dy + 1) * src_h / dst_h).max(y0 + 1);
            for dx in 0..dst_w {
                let x0 = dx * src_w / dst_w;
                let x1 = ((dx + 1) * src_w / dst_w).max(x0 + 1);

                let mut sum = 0u64;
                for row in y0..y1 {
                    let line = &self.pixels[row * src_w..(row + 1) * src_w];
                    sum += line[x0..x1].iter().map(|&p| p as u64).sum::<u64>();
                }
                let area = ((y1 - y0) * (x1 - x0)) as u64;
                out.push(((sum + area / 2) / area) as u8);
            }
        }

        Some(Frame::new(out, dst_w as u32, dst_h as u32, self.sequence))
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sequence", &self.sequence)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}

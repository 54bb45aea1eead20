//! Frame-to-BitMatrix capture pipeline.

use super::{binarize, BitMatrix, Camera, CameraError, CaptureConfig};
use thiserror::Error;

/// Errors produced while turning a camera frame into a bit matrix.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error("frame {width}x{height} is too small to downscale by {scale}")]
    FrameTooSmall { width: u32, height: u32, scale: f64 },
    #[error("frame buffer does not match its dimensions")]
    MalformedFrame,
}

/// A source of freshly captured bit matrices.
///
/// Every call performs a new capture; nothing is cached.
pub trait ImageSource {
    fn capture_matrix(&mut self) -> Result<BitMatrix, CaptureError>;
}

/// Camera → downsample → Otsu threshold.
///
/// The camera is opened on construction and closed on drop.
pub struct CapturePipeline<C: Camera> {
    camera: C,
    scale: f64,
}

impl<C: Camera> CapturePipeline<C> {
    /// Opens `camera` with `config` and prepares the pipeline.
    pub fn open(mut camera: C, config: &CaptureConfig) -> Result<Self, CaptureError> {
        camera.open(config)?;
        Ok(Self {
            camera,
            scale: config.scale,
        })
    }

    /// Returns the underlying camera.
    pub fn camera(&self) -> &C {
        &self.camera
    }
}

impl<C: Camera> ImageSource for CapturePipeline<C> {
    fn capture_matrix(&mut self) -> Result<BitMatrix, CaptureError> {
        let frame = self.camera.capture()?;
        let small = frame
            .downsample(self.scale)
            .ok_or(CaptureError::FrameTooSmall {
                width: frame.width(),
                height: frame.height(),
                scale: self.scale,
            })?;
        let matrix = binarize(&small).ok_or(CaptureError::MalformedFrame)?;

        tracing::debug!(
            sequence = frame.sequence(),
            width = matrix.width(),
            height = matrix.height(),
            ones = matrix.count_ones(),
            "Captured bit matrix"
        );
        Ok(matrix)
    }
}

impl<C: Camera> Drop for CapturePipeline<C> {
    fn drop(&mut self) {
        if self.camera.is_open() {
            self.camera.close();
        }
    }
}

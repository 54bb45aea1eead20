//! Camera abstraction for frame capture.
//!
//! This module provides a trait-based abstraction over camera hardware,
//! allowing for both real camera input and mock implementations for testing.

use super::{CaptureConfig, Frame};
use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};
use thiserror::Error;

/// Errors that can occur during camera operations.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera device not found: {0}")]
    DeviceNotFound(String),
    #[error("failed to open camera: {0}")]
    OpenFailed(String),
    #[error("failed to configure camera: {0}")]
    ConfigFailed(String),
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    #[error("camera not initialized")]
    NotInitialized,
}

/// Trait for camera implementations.
///
/// Frames are 8-bit grayscale. Implementations block until a frame is
/// available or the device reports a failure; they never retry.
pub trait Camera {
    /// Opens and initializes the camera with the given configuration.
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError>;

    /// Captures a single frame.
    fn capture(&mut self) -> Result<Frame, CameraError>;

    /// Checks if the camera is currently open.
    fn is_open(&self) -> bool;

    /// Closes the camera and releases resources.
    fn close(&mut self);
}

/// Mock camera producing deterministic pseudo-noise frames.
///
/// Frame `k` after opening is fully determined by the mock's seed and
/// `k`, so captures are reproducible across runs.
#[derive(Debug, Default)]
pub struct MockCamera {
    config: Option<CaptureConfig>,
    seed: u64,
    sequence: u64,
}

impl MockCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock whose frames are keyed by `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

impl Camera for MockCamera {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        config
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;
        self.config = Some(config.clone());
        self.sequence = 0;
        tracing::info!(seed = self.seed, "MockCamera opened with config: {:?}", config);
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame, CameraError> {
        let config = self.config.as_ref().ok_or(CameraError::NotInitialized)?;

        let mut pixels = vec![0u8; (config.width * config.height) as usize];
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed ^ self.sequence.rotate_left(32));
        rng.fill_bytes(&mut pixels);

        self.sequence += 1;
        Ok(Frame::new(pixels, config.width, config.height, self.sequence))
    }

    fn is_open(&self) -> bool {
        self.config.is_some()
    }

    fn close(&mut self) {
        self.config = None;
        tracing::info!("MockCamera closed");
    }
}

#[cfg(feature = "camera")]
pub use device::NokhwaCamera;

#[cfg(feature = "camera")]
mod device {
    use super::{Camera, CameraError};
    use crate::capture::{CaptureConfig, Frame};
    use nokhwa::pixel_format::{LumaFormat, RgbFormat};
    use nokhwa::utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    };

    /// Stream format closest to the configured resolution and frame rate.
    fn requested_format(config: &CaptureConfig) -> CameraFormat {
        CameraFormat::new(
            Resolution::new(config.width, config.height),
            FrameFormat::MJPEG,
            config.fps,
        )
    }

    /// A physical camera accessed through `nokhwa`.
    #[derive(Default)]
    pub struct NokhwaCamera {
        inner: Option<nokhwa::Camera>,
        sequence: u64,
    }

    impl NokhwaCamera {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl Camera for NokhwaCamera {
        fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
            config
                .validate()
                .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;

            let index = CameraIndex::Index(config.device_id);
            let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
                requested_format(config),
            ));
            let mut camera = nokhwa::Camera::new(index, format)
                .map_err(|e| CameraError::DeviceNotFound(e.to_string()))?;
            camera
                .open_stream()
                .map_err(|e| CameraError::OpenFailed(e.to_string()))?;

            let actual = camera.camera_format();
            tracing::info!(
                device_id = config.device_id,
                width = actual.width(),
                height = actual.height(),
                fps = actual.frame_rate(),
                "Camera stream opened"
            );
            self.inner = Some(camera);
            self.sequence = 0;
            Ok(())
        }

        fn capture(&mut self) -> Result<Frame, CameraError> {
            let camera = self.inner.as_mut().ok_or(CameraError::NotInitialized)?;
            let buffer = camera
                .frame()
                .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;
            let image = buffer
                .decode_image::<LumaFormat>()
                .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;

            let (width, height) = (image.width(), image.height());
            self.sequence += 1;
            Ok(Frame::new(image.into_raw(), width, height, self.sequence))
        }

        fn is_open(&self) -> bool {
            self.inner.is_some()
        }

        fn close(&mut self) {
            if let Some(mut camera) = self.inner.take() {
                if let Err(e) = camera.stop_stream() {
                    tracing::warn!("Failed to stop camera stream: {}", e);
                }
                tracing::info!("Camera stream closed");
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_requested_format_follows_config() {
            let config = CaptureConfig {
                width: 1280,
                height: 720,
                fps: 15,
                ..CaptureConfig::default()
            };
            let format = requested_format(&config);
            assert_eq!(format.resolution(), Resolution::new(1280, 720));
            assert_eq!(format.frame_rate(), 15);
        }
    }
}

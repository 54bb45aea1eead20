//! Capture, sampling and generator configuration.
//!
//! Defaults reproduce the reference behavior: a 5 % linear downscale
//! before thresholding, 16-byte cursor seeds sampled every 100 ms with
//! 200 ms motion polling, and 256-bit image samples.

use crate::range::HashAlgorithm;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for camera capture and binarization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Camera device index.
    pub device_id: u32,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Linear downscale factor applied before thresholding, in (0, 1].
    pub scale: f64,
    /// Target frames per second.
    pub fps: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            width: 640,
            height: 480,
            scale: 0.05,
            fps: 30,
        }
    }
}

impl CaptureConfig {
    /// Creates a new configuration with the specified dimensions.
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if !(self.scale > 0.0 && self.scale <= 1.0) {
            return Err(ConfigError::InvalidScale(self.scale));
        }
        if self.fps == 0 || self.fps > 120 {
            return Err(ConfigError::InvalidFrameRate);
        }
        Ok(())
    }
}

/// Cursor sampling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Seed length in bytes (16..=32).
    pub nbytes: usize,
    /// Pause after each accepted sample, in milliseconds.
    pub sample_delay_ms: u64,
    /// Interval between polls while waiting for motion, in milliseconds.
    pub poll_interval_ms: u64,
    /// Give up after this many milliseconds. Absent means wait forever.
    pub timeout_ms: Option<u64>,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            nbytes: 16,
            sample_delay_ms: 100,
            poll_interval_ms: 200,
            timeout_ms: None,
        }
    }
}

impl CursorConfig {
    pub fn sample_delay(&self) -> Duration {
        Duration::from_millis(self.sample_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(16..=32).contains(&self.nbytes) {
            return Err(ConfigError::InvalidCursorBytes(self.nbytes));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidPollInterval);
        }
        Ok(())
    }
}

/// Generator seeding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Bits drawn from the image by the Hénon sampler (1..=512).
    pub image_seed_bits: usize,
    /// Digest used by the hash-based range strategy.
    pub digest: HashAlgorithm,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            image_seed_bits: 256,
            digest: HashAlgorithm::default(),
        }
    }
}

impl GeneratorConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=512).contains(&self.image_seed_bits) {
            return Err(ConfigError::InvalidSeedBits(self.image_seed_bits));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid frame dimensions")]
    InvalidDimensions,
    #[error("invalid downscale factor {0} (must be in (0, 1])")]
    InvalidScale(f64),
    #[error("invalid frame rate (must be 1-120 fps)")]
    InvalidFrameRate,
    #[error("invalid cursor seed length {0} bytes (must be 16-32)")]
    InvalidCursorBytes(usize),
    #[error("poll interval must be non-zero")]
    InvalidPollInterval,
    #[error("invalid image seed length {0} bits (must be 1-512)")]
    InvalidSeedBits(usize),
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub cursor: CursorConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capture.validate()?;
        self.cursor.validate()?;
        self.generator.validate()
    }
}

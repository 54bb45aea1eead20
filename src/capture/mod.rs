//! Camera input, frame handling and binarization.
//!
//! This module turns camera frames into [`BitMatrix`] values: each frame
//! is downscaled by area averaging and thresholded with Otsu's method.
//! The camera is treated as a source of raw optical data; the samplers
//! decide how bits are read out of the matrix.

mod binarize;
mod bitmatrix;
mod camera;
mod config;
mod frame;
mod pipeline;

pub use binarize::{binarize, otsu_threshold};
pub use bitmatrix::BitMatrix;
#[cfg(feature = "camera")]
pub use camera::NokhwaCamera;
pub use camera::{Camera, CameraError, MockCamera};
pub use config::{CaptureConfig, ConfigError, CursorConfig, FileConfig, GeneratorConfig};
pub use frame::Frame;
pub use pipeline::{CaptureError, CapturePipeline, ImageSource};

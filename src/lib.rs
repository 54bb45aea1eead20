//! Physically seeded pseudorandom integers.
//!
//! Seeds come from a camera image or from cursor motion, are reduced to a
//! 128-bit register and expanded by a feedback shift register into bit
//! strings and bounded integers.
//!
//! # Architecture
//!
//! ```text
//! capture → BitMatrix → sampling ─┐
//!                                 ├→ Seed → generator → range
//! PositionSource → sampling ──────┘
//!           analysis (advisory checks)
//! ```
//!
//! # Caveats
//!
//! - **Not cryptographic**: the generator is a linear shift register and
//!   its output is predictable from 128 consecutive bits
//! - **Zero is absorbing**: a zero seed yields an all-zero stream
//! - **Correlated calls**: every call advances the same register
//!
//! # Example
//!
//! ```no_run
//! use imrand::{
//!     capture::{CaptureConfig, CapturePipeline, ImageSource, MockCamera},
//!     generator::{BitStreamGenerator, Seed},
//!     range::StreamRangeMapper,
//!     sampling::ImageSeedSampler,
//! };
//!
//! let mut pipeline = CapturePipeline::open(MockCamera::new(), &CaptureConfig::default()).unwrap();
//! let matrix = pipeline.capture_matrix().unwrap();
//!
//! let sample = ImageSeedSampler::new().sample(&matrix, 256).unwrap();
//! let mut generator = BitStreamGenerator::new(Seed::from_sample(&sample));
//!
//! let token = generator.next_bits(64, true).unwrap();
//! let dice = StreamRangeMapper::for_bounds(1, 6)
//!     .unwrap()
//!     .draw_many(&mut generator, 10)
//!     .unwrap();
//! println!("{token} {dice:?}");
//! ```

#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod capture;
pub mod generator;
pub mod range;
pub mod sampling;
pub mod terminal;

// Re-export commonly used types at crate root
pub use analysis::{QualityThresholds, SeedHealth};
pub use capture::{BitMatrix, Camera, CaptureConfig, CapturePipeline, FileConfig, MockCamera};
pub use generator::{BitStreamGenerator, Seed};
pub use range::{HashRangeMapper, RangeRequest, StreamRangeMapper};
pub use sampling::{CursorSeedSampler, ImageSeedSampler, SampledBits};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

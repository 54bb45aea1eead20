//! Seed-to-stream expansion.
//!
//! A [`Seed`] initializes a [`BitStreamGenerator`], which expands it into
//! an arbitrarily long deterministic bit stream. The generator is the only
//! stateful component of the crate: every call advances its register.

mod lfsr;
mod seed;

pub use lfsr::{BitStreamGenerator, GeneratorError, MAX_BITS_PER_CALL, MAX_WORD_BITS};
pub use seed::Seed;

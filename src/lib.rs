// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)] // Duplicate match arms

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`
#![cfg_attr(test, allow(clippy::unwrap_used))]

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![warn(clippy::missing_const_for_fn)] // Suggests making eligible functions `const`
#![deny(missing_docs)] // Documentation is a must for release

//! # PCM Buffers
//!
//! A shared representation for blocks of interleaved PCM audio samples, and the
//! conversions between the three representations audio components work in:
//! 64-bit float, 32-bit float and integer.
//!
//! Decoders, encoders, effects, analyzers and device adapters can pass these
//! buffers to each other without each one re-implementing format bookkeeping
//! or sample scaling.
//!
//! ## Overview
//!
//! - [`Format`] - channel count, sample rate, bit depth and byte order
//! - [`FloatBuffer`], [`Float32Buffer`], [`IntBuffer`] - a format plus interleaved samples
//! - [`PcmBuffer`] - the capability every variant implements: report format and
//!   frame count, convert to any variant, clone
//! - [`AnyBuffer`] - the closed sum of the three variants
//!
//! Components that care about throughput take a concrete buffer type. Module
//! boundaries that must accept anything take `&dyn PcmBuffer` or [`AnyBuffer`]
//! and convert on arrival.
//!
//! ## Features
//!
//! - `parallel-processing`: per-sample conversion of large buffers on `rayon`
//! - `serialization`: `serde` support for [`Format`], [`ByteOrder`] and [`SampleKind`]
//!
//! ## Error Handling
//!
//! Fallible operations return [`PcmResult`]:
//!
//! ```rust
//! use pcm_buffers::{ByteOrder, Format, PcmError};
//!
//! match Format::new(0, 44100, 16, ByteOrder::LittleEndian) {
//!     Ok(_) => unreachable!(),
//!     Err(PcmError::InvalidFormat { field, .. }) => assert_eq!(field, "channel_count"),
//!     Err(other) => eprintln!("Other error: {other}"),
//! }
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use pcm_buffers::{Format, IntBuffer, PcmBuffer};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // A decoder hands over 16-bit stereo.
//! let decoded = IntBuffer::new(Format::STEREO_44100, vec![16384, -16384, 32767, -32768])?;
//! assert_eq!(decoded.num_frames()?, 2);
//!
//! // An effect works in f32, in place.
//! let mut work = decoded.as_float32_buffer()?;
//! work.data_mut().iter_mut().for_each(|s| *s *= 0.5);
//!
//! // An encoder wants 16-bit again.
//! let encoded = work.as_int_buffer_with_depth(16)?;
//! assert_eq!(encoded.data()[0], 8192);
//! assert_eq!(decoded.data()[0], 16384);
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! MIT License

mod bytes;
pub mod conversions;
mod error;
mod format;
mod repr;
/// Core traits for PCM samples and buffers.
pub mod traits;

#[cfg(test)]
mod tests;

pub use crate::error::{PcmError, PcmResult};
pub use crate::format::{ByteOrder, Format, MAX_BIT_DEPTH};
pub use crate::repr::{AnyBuffer, Float32Buffer, FloatBuffer, IntBuffer, SampleBuffer};
pub use crate::traits::{PcmBuffer, PcmSample, SampleKind};

/// Left channel index.
pub const LEFT: usize = 0;
/// Right channel index.
pub const RIGHT: usize = 1;

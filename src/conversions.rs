//! # PCM Sample Conversions
//!
//! This module holds the scaling rules that move samples between the three
//! representations, and the [`PcmBuffer`] implementation built on top of them.
//!
//! ## Scaling rules
//! - **Integer → float**: a sample at bit depth `b` is divided by `2^(b-1)`, so
//!   `-2^(b-1)` maps to exactly `-1.0` and `2^(b-1) - 1` lands just below `1.0`.
//! - **Float → integer**: the value is multiplied by `2^(b-1) - 1`, rounded half
//!   away from zero and clamped to `[-2^(b-1), 2^(b-1) - 1]`. Out-of-range input
//!   is clamped, never rejected. `NaN` becomes `0`.
//! - **Float ↔ float**: a direct cast. Narrowing to `f32` loses precision silently;
//!   widening to `f64` is exact.
//! - **Integer → integer** at a different bit depth goes through the float domain
//!   (`int@b1 → f64 → int@b2`) so one pair of scaling functions covers every depth.
//!
//! ```rust
//! use pcm_buffers::{Format, IntBuffer, PcmBuffer};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ints = IntBuffer::new(Format::MONO_44100, vec![-32768, 0, 16384])?;
//! let floats = ints.as_float32_buffer()?;
//! assert_eq!(floats.data()[0], -1.0);
//! assert_eq!(floats.data()[2], 0.5);
//! assert_eq!(floats.bit_depth(), 32);
//!
//! let back = floats.as_int_buffer_with_depth(16)?;
//! assert_eq!(back.data(), &[-32767, 0, 16384]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Parallelism
//! With the `parallel-processing` feature, per-sample mapping of large slices
//! runs on `rayon`. Results are identical to the sequential path.

use std::any::Any;

use tracing::{Level, debug, trace};

use crate::repr::{AnyBuffer, Float32Buffer, FloatBuffer, IntBuffer, SampleBuffer};
use crate::traits::SampleKind;
use crate::{Format, PcmBuffer, PcmError, PcmResult, PcmSample};

/// Largest bit depth an [`IntBuffer`] can carry.
pub const MAX_INT_BIT_DEPTH: u32 = 32;

/// Slices shorter than this are always mapped on the calling thread.
#[cfg(feature = "parallel-processing")]
pub const PARALLEL_MIN_SAMPLES: usize = 16_384;

#[inline(always)]
const fn int_depth(bit_depth: u32) -> u32 {
    if bit_depth == 0 {
        1
    } else if bit_depth > MAX_INT_BIT_DEPTH {
        MAX_INT_BIT_DEPTH
    } else {
        bit_depth
    }
}

/// Largest signed value at `bit_depth`, `2^(b-1) - 1`.
///
/// Bit depths outside `1..=32` are clamped into that range.
#[inline]
pub const fn int_max_signed_value(bit_depth: u32) -> i64 {
    (1i64 << (int_depth(bit_depth) - 1)) - 1
}

/// Smallest signed value at `bit_depth`, `-2^(b-1)`.
///
/// Bit depths outside `1..=32` are clamped into that range.
#[inline]
pub const fn int_min_signed_value(bit_depth: u32) -> i64 {
    -(1i64 << (int_depth(bit_depth) - 1))
}

/// Scales an integer sample at `bit_depth` into the normalized float range.
///
/// ```rust
/// use pcm_buffers::conversions::int_to_float;
///
/// assert_eq!(int_to_float(-32768, 16), -1.0);
/// assert_eq!(int_to_float(16384, 16), 0.5);
/// assert!(int_to_float(32767, 16) < 1.0);
/// ```
#[inline]
pub fn int_to_float(value: i32, bit_depth: u32) -> f64 {
    f64::from(value) / -(int_min_signed_value(bit_depth) as f64)
}

/// Scales a normalized float into an integer sample at `bit_depth`, clamping.
///
/// ```rust
/// use pcm_buffers::conversions::float_to_int;
///
/// assert_eq!(float_to_int(0.5, 16), 16384);
/// assert_eq!(float_to_int(1.5, 16), 32767);
/// assert_eq!(float_to_int(-1.5, 16), -32768);
/// assert_eq!(float_to_int(f64::NAN, 16), 0);
/// ```
#[inline]
pub fn float_to_int(value: f64, bit_depth: u32) -> i32 {
    let max = int_max_signed_value(bit_depth) as f64;
    let min = int_min_signed_value(bit_depth) as f64;
    let scaled = (value * max).round();
    if scaled.is_nan() {
        return 0;
    }
    scaled.clamp(min, max) as i32
}

/// Narrowing cast; precision loss is expected and silent.
#[inline(always)]
pub const fn f64_to_f32(value: f64) -> f32 {
    value as f32
}

/// Widening cast; always exact.
#[inline(always)]
pub const fn f32_to_f64(value: f32) -> f64 {
    value as f64
}

/// Converts an interleaved slice between representations.
///
/// `source_bit_depth` describes `src` and `target_bit_depth` the result; both are
/// ignored by float representations. The output has exactly `src.len()` samples
/// in the same order.
pub fn convert_slice<S: PcmSample, D: PcmSample>(
    src: &[S],
    source_bit_depth: u32,
    target_bit_depth: u32,
) -> Vec<D> {
    let convert = |s: S| D::from_normalized(s.to_normalized(source_bit_depth), target_bit_depth);

    #[cfg(feature = "parallel-processing")]
    if src.len() >= PARALLEL_MIN_SAMPLES {
        use rayon::prelude::*;
        return src.par_iter().map(|&s| convert(s)).collect();
    }

    src.iter().map(|&s| convert(s)).collect()
}

/// Number of samples [`float_to_int`] would clamp at `target_bit_depth`.
fn count_clamped<S: PcmSample>(src: &[S], source_bit_depth: u32, target_bit_depth: u32) -> usize {
    let max = int_max_signed_value(target_bit_depth) as f64;
    let min = int_min_signed_value(target_bit_depth) as f64;
    src.iter()
        .map(|s| (s.to_normalized(source_bit_depth) * max).round())
        .filter(|scaled| *scaled < min || *scaled > max)
        .count()
}

impl<T: PcmSample> SampleBuffer<T> {
    /// Converts into any representation at an explicit target bit depth.
    ///
    /// When the source and target representation and bit depth coincide the
    /// samples are copied unchanged. The result always owns fresh storage.
    ///
    /// # Errors
    /// - [`PcmError::MalformedBuffer`] if the sample count is not a whole number of frames.
    /// - [`PcmError::UnsupportedBitDepth`] if `bit_depth` is zero or too wide for `D`.
    pub fn convert_to<D: PcmSample>(&self, bit_depth: u32) -> PcmResult<SampleBuffer<D>> {
        if bit_depth == 0 || bit_depth > D::MAX_BIT_DEPTH {
            return Err(PcmError::unsupported_bit_depth(
                bit_depth,
                D::KIND.buffer_name(),
            ));
        }
        self.num_frames()?;

        let source_bit_depth = self.bit_depth();
        let format = self.format().with_bit_depth(bit_depth)?;
        trace!(
            from = T::KIND.buffer_name(),
            to = D::KIND.buffer_name(),
            samples = self.len(),
            source_bit_depth,
            target_bit_depth = bit_depth,
            "converting PCM buffer"
        );

        if source_bit_depth == bit_depth {
            if let Some(same) = (self.data_vec() as &dyn Any).downcast_ref::<Vec<D>>() {
                return Ok(SampleBuffer::from_parts(format, same.clone()));
            }
        }

        if D::KIND == SampleKind::Int && tracing::enabled!(Level::DEBUG) {
            let clamped = count_clamped(self.data(), source_bit_depth, bit_depth);
            if clamped > 0 {
                debug!(
                    clamped,
                    target_bit_depth = bit_depth,
                    "clamped out-of-range samples while converting to integers"
                );
            }
        }

        let data = convert_slice::<T, D>(self.data(), source_bit_depth, bit_depth);
        Ok(SampleBuffer::from_parts(format, data))
    }
}

impl<T: PcmSample> PcmBuffer for SampleBuffer<T> {
    fn pcm_format(&self) -> &Format {
        self.format()
    }

    fn num_frames(&self) -> PcmResult<usize> {
        SampleBuffer::num_frames(self)
    }

    fn as_float_buffer(&self) -> PcmResult<FloatBuffer> {
        self.convert_to(<f64 as PcmSample>::NATURAL_BIT_DEPTH)
    }

    fn as_float32_buffer(&self) -> PcmResult<Float32Buffer> {
        self.convert_to(<f32 as PcmSample>::NATURAL_BIT_DEPTH)
    }

    fn as_int_buffer(&self) -> PcmResult<IntBuffer> {
        let bit_depth = match T::KIND {
            SampleKind::Int => self.bit_depth(),
            SampleKind::Float64 | SampleKind::Float32 => <i32 as PcmSample>::NATURAL_BIT_DEPTH,
        };
        self.convert_to(bit_depth)
    }

    fn as_int_buffer_with_depth(&self, bit_depth: u32) -> PcmResult<IntBuffer> {
        self.convert_to(bit_depth)
    }

    fn clone_buffer(&self) -> AnyBuffer {
        T::into_any(self.clone())
    }
}

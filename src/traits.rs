use bytemuck::Pod;
use num_traits::ToBytes;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

use crate::conversions::{MAX_INT_BIT_DEPTH, float_to_int, int_to_float};
use crate::repr::{AnyBuffer, Float32Buffer, FloatBuffer, IntBuffer, SampleBuffer};
use crate::{Format, PcmResult};
use std::fmt::{Debug, Display};

/// The three sample representations a PCM buffer can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum SampleKind {
    /// 64-bit float samples, normalized to `[-1.0, 1.0]`.
    Float64,
    /// 32-bit float samples, normalized to `[-1.0, 1.0]`.
    Float32,
    /// Signed integer samples at the bit depth of the buffer's format.
    Int,
}

impl SampleKind {
    /// Name of the buffer type holding samples of this kind.
    pub const fn buffer_name(&self) -> &'static str {
        match self {
            SampleKind::Float64 => "FloatBuffer",
            SampleKind::Float32 => "Float32Buffer",
            SampleKind::Int => "IntBuffer",
        }
    }

    /// Returns true for the floating-point kinds.
    pub const fn is_float(&self) -> bool {
        matches!(self, SampleKind::Float64 | SampleKind::Float32)
    }
}

/// Core trait for the element types a [`SampleBuffer`] can store.
///
/// Every sample type knows how to move to and from the canonical normalized
/// `f64` domain at a given bit depth. Floating-point samples already live in
/// that domain and ignore the bit depth; integer samples are scaled by it.
/// All buffer conversions are built from these two functions.
///
/// # Supported Types
/// - `f64`: [`FloatBuffer`] samples
/// - `f32`: [`Float32Buffer`] samples
/// - `i32`: [`IntBuffer`] samples, any bit depth from 1 to 32
pub trait PcmSample:
    Copy
    + Default
    + Debug
    + Display
    + PartialEq
    + PartialOrd
    + Send
    + Sync
    + Pod // bytemuck: packed byte views of sample slices
    + ToBytes
    + 'static
{
    /// Representation this sample type belongs to.
    const KIND: SampleKind;
    /// Bit depth stamped on a buffer's format when converting into this representation.
    const NATURAL_BIT_DEPTH: u32;
    /// Largest bit depth this representation can hold.
    const MAX_BIT_DEPTH: u32;

    /// Maps this sample at `bit_depth` onto the normalized float domain.
    fn to_normalized(self, bit_depth: u32) -> f64;

    /// Maps a normalized float onto this representation at `bit_depth`.
    ///
    /// Integer targets round and clamp; float targets cast directly.
    fn from_normalized(value: f64, bit_depth: u32) -> Self;

    /// Wraps a buffer of this sample type into the closed variant set.
    fn into_any(buffer: SampleBuffer<Self>) -> AnyBuffer;
}

macro_rules! impl_float_sample {
    ($type:ty, $kind:ident, $bits:expr, $variant:ident) => {
        impl PcmSample for $type {
            const KIND: SampleKind = SampleKind::$kind;
            const NATURAL_BIT_DEPTH: u32 = $bits;
            const MAX_BIT_DEPTH: u32 = crate::format::MAX_BIT_DEPTH;

            #[inline(always)]
            fn to_normalized(self, _bit_depth: u32) -> f64 {
                self as f64
            }

            #[inline(always)]
            fn from_normalized(value: f64, _bit_depth: u32) -> Self {
                value as $type
            }

            fn into_any(buffer: SampleBuffer<Self>) -> AnyBuffer {
                AnyBuffer::$variant(buffer)
            }
        }
    };
}

impl_float_sample!(f64, Float64, 64, Float64);
impl_float_sample!(f32, Float32, 32, Float32);

impl PcmSample for i32 {
    const KIND: SampleKind = SampleKind::Int;
    const NATURAL_BIT_DEPTH: u32 = MAX_INT_BIT_DEPTH;
    const MAX_BIT_DEPTH: u32 = MAX_INT_BIT_DEPTH;

    #[inline(always)]
    fn to_normalized(self, bit_depth: u32) -> f64 {
        int_to_float(self, bit_depth)
    }

    #[inline(always)]
    fn from_normalized(value: f64, bit_depth: u32) -> Self {
        float_to_int(value, bit_depth)
    }

    fn into_any(buffer: SampleBuffer<Self>) -> AnyBuffer {
        AnyBuffer::Int(buffer)
    }
}

/// The capability every PCM buffer variant offers.
///
/// Code written against `PcmBuffer` accepts any representation and converts
/// on demand. Components that care about throughput should take a concrete
/// buffer type instead and only cross into this trait at module boundaries.
///
/// Every conversion returns a new, independently owned buffer. The result's
/// format is the source format with the bit depth set to the destination's
/// width; channel count, sample rate and byte order are carried unchanged.
///
/// ## Example
/// ```rust
/// use pcm_buffers::{Format, IntBuffer, PcmBuffer};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let format = Format::STEREO_44100;
/// let ints = IntBuffer::new(format, vec![16384, -16384, 0, 32767])?;
///
/// fn peak(buffer: &dyn PcmBuffer) -> pcm_buffers::PcmResult<f32> {
///     let floats = buffer.as_float32_buffer()?;
///     Ok(floats.data().iter().fold(0.0f32, |acc, s| acc.max(s.abs())))
/// }
///
/// assert!(peak(&ints)? < 1.0);
/// assert_eq!(ints.num_frames()?, 2);
/// # Ok(())
/// # }
/// ```
pub trait PcmBuffer {
    /// The format describing this buffer's samples.
    fn pcm_format(&self) -> &Format;

    /// Number of frames, `samples / channel_count`.
    ///
    /// # Errors
    /// [`PcmError::MalformedBuffer`](crate::PcmError::MalformedBuffer) if the sample
    /// count is not divisible by the channel count.
    fn num_frames(&self) -> PcmResult<usize>;

    /// Converts to 64-bit float samples.
    fn as_float_buffer(&self) -> PcmResult<FloatBuffer>;

    /// Converts to 32-bit float samples.
    fn as_float32_buffer(&self) -> PcmResult<Float32Buffer>;

    /// Converts to integer samples.
    ///
    /// Integer sources are copied at their own bit depth; float sources are
    /// scaled to 32-bit integers.
    fn as_int_buffer(&self) -> PcmResult<IntBuffer>;

    /// Converts to integer samples at an explicit bit depth between 1 and 32.
    fn as_int_buffer_with_depth(&self, bit_depth: u32) -> PcmResult<IntBuffer>;

    /// Deep copy of this buffer, same variant, independently owned.
    fn clone_buffer(&self) -> AnyBuffer;
}

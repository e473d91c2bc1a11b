//! Core PCM buffer representation.
//!
//! This module provides the containers every component passes around:
//!
//! - [`SampleBuffer<T>`] - a [`Format`] paired with interleaved samples of type `T`
//! - [`FloatBuffer`], [`Float32Buffer`], [`IntBuffer`] - the three concrete variants
//! - [`AnyBuffer`] - the closed sum of the three, for code that accepts any of them
//!
//! # Memory Layout
//!
//! Samples are interleaved by channel: channel 0 of frame 0, channel 1 of
//! frame 0, ..., channel 0 of frame 1, and so on. A buffer with `n` channels
//! holds `n * frames` samples.
//!
//! # Direct Access
//!
//! The sample storage is handed out for in-place mutation without copying:
//! [`data_mut`](SampleBuffer::data_mut) gives a slice (length fixed) and
//! [`samples_mut`](SampleBuffer::samples_mut) gives the `Vec` itself (length
//! may change). Whoever resizes the `Vec` must leave its length divisible by
//! the channel count. The invariant is not enforced on mutation; it is
//! checked when frames are counted or the buffer is converted, which fail
//! with [`PcmError::MalformedBuffer`] instead of silently truncating.
//!
//! Buffers carry no internal locking. Concurrent writers to one buffer must
//! synchronise externally; conversions and clones always produce independent
//! storage, so their results never contend.
//!
//! # Examples
//!
//! ```rust
//! use pcm_buffers::{Float32Buffer, Format, PcmBuffer};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut stereo = Float32Buffer::new(Format::STEREO_48000, vec![0.1, 0.2, 0.3, 0.4])?;
//! assert_eq!(stereo.num_frames()?, 2);
//!
//! // In-place gain, no copy.
//! stereo.data_mut().iter_mut().for_each(|s| *s *= 0.5);
//! assert_eq!(stereo.frame(1), Some(&[0.15f32, 0.2][..]));
//! # Ok(())
//! # }
//! ```

use std::ops::{Index, IndexMut};
use std::slice::{ChunksExact, ChunksExactMut};

use crate::traits::SampleKind;
use crate::{Format, PcmBuffer, PcmError, PcmResult, PcmSample};

/// Interleaved 64-bit float samples.
pub type FloatBuffer = SampleBuffer<f64>;
/// Interleaved 32-bit float samples.
pub type Float32Buffer = SampleBuffer<f32>;
/// Interleaved signed integer samples at the format's bit depth (1 to 32 bits).
pub type IntBuffer = SampleBuffer<i32>;

/// A [`Format`] and the interleaved samples it describes.
///
/// `Clone` is a deep copy: the clone gets its own format value and its own
/// sample storage, and mutating one never shows through the other.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer<T: PcmSample> {
    format: Format,
    data: Vec<T>,
}

impl<T: PcmSample> SampleBuffer<T> {
    /// Creates a buffer from a format and interleaved samples.
    ///
    /// The sample count is not checked here; producers must supply a multiple
    /// of the channel count, and frame counting reports a mismatch later.
    ///
    /// # Errors
    /// [`PcmError::UnsupportedBitDepth`] if the format's bit depth is wider than
    /// `T` can hold (above 32 bits for [`IntBuffer`]).
    pub fn new(format: Format, data: Vec<T>) -> PcmResult<Self> {
        if format.bit_depth() > T::MAX_BIT_DEPTH {
            return Err(PcmError::unsupported_bit_depth(
                format.bit_depth(),
                T::KIND.buffer_name(),
            ));
        }
        Ok(Self::from_parts(format, data))
    }

    /// Creates a buffer of `frames` silent frames.
    ///
    /// # Errors
    /// [`PcmError::CapacityOverflow`] if `frames * channel_count` overflows
    /// `usize`, otherwise the same as [`SampleBuffer::new`].
    pub fn silence(format: Format, frames: usize) -> PcmResult<Self> {
        let channels = usize::from(format.channel_count());
        let len = frames
            .checked_mul(channels)
            .ok_or(PcmError::CapacityOverflow { frames, channels })?;
        Self::new(format, vec![T::default(); len])
    }

    pub(crate) const fn from_parts(format: Format, data: Vec<T>) -> Self {
        Self { format, data }
    }

    /// Representation held by this buffer.
    pub const fn kind(&self) -> SampleKind {
        T::KIND
    }

    /// The format describing the samples.
    pub const fn format(&self) -> &Format {
        &self.format
    }

    /// Number of interleaved channels.
    pub fn num_channels(&self) -> usize {
        usize::from(self.format.channel_count())
    }

    /// Frames per second.
    pub const fn sample_rate(&self) -> u32 {
        self.format.sample_rate()
    }

    /// Bits per sample as recorded in the format.
    pub const fn bit_depth(&self) -> u32 {
        self.format.bit_depth()
    }

    /// Total number of samples across all channels.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of frames, `len / channel_count`.
    ///
    /// # Errors
    /// [`PcmError::MalformedBuffer`] if `len` is not divisible by the channel count.
    pub fn num_frames(&self) -> PcmResult<usize> {
        let channels = self.num_channels();
        let samples = self.data.len();
        if samples % channels != 0 {
            tracing::debug!(
                samples,
                channels,
                kind = T::KIND.buffer_name(),
                "buffer length is not a whole number of frames"
            );
            return Err(PcmError::malformed(samples, channels));
        }
        Ok(samples / channels)
    }

    /// Playback time of the buffer, in seconds.
    ///
    /// # Errors
    /// Same as [`SampleBuffer::num_frames`].
    pub fn duration_seconds(&self) -> PcmResult<f64> {
        Ok(self.format.frames_to_seconds(self.num_frames()?))
    }

    /// Interleaved samples.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Interleaved samples for in-place mutation. The length cannot change.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// The sample storage itself, for callers that reuse or resize it.
    ///
    /// The length must stay a multiple of the channel count; a violation is
    /// reported by the next frame count or conversion.
    pub fn samples_mut(&mut self) -> &mut Vec<T> {
        &mut self.data
    }

    pub(crate) const fn data_vec(&self) -> &Vec<T> {
        &self.data
    }

    /// Consumes the buffer, returning the sample storage.
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Consumes the buffer, returning its format and sample storage.
    pub fn into_parts(self) -> (Format, Vec<T>) {
        (self.format, self.data)
    }

    /// The samples of frame `index`, one per channel.
    pub fn frame(&self, index: usize) -> Option<&[T]> {
        let channels = self.num_channels();
        let start = index.checked_mul(channels)?;
        self.data.get(start..start.checked_add(channels)?)
    }

    /// Mutable samples of frame `index`, one per channel.
    pub fn frame_mut(&mut self, index: usize) -> Option<&mut [T]> {
        let channels = self.num_channels();
        let start = index.checked_mul(channels)?;
        self.data.get_mut(start..start.checked_add(channels)?)
    }

    /// Iterates over the frames of the buffer.
    ///
    /// # Errors
    /// Same as [`SampleBuffer::num_frames`].
    pub fn frames(&self) -> PcmResult<ChunksExact<'_, T>> {
        self.num_frames()?;
        Ok(self.data.chunks_exact(self.num_channels()))
    }

    /// Iterates mutably over the frames of the buffer.
    ///
    /// # Errors
    /// Same as [`SampleBuffer::num_frames`].
    pub fn frames_mut(&mut self) -> PcmResult<ChunksExactMut<'_, T>> {
        self.num_frames()?;
        let channels = self.num_channels();
        Ok(self.data.chunks_exact_mut(channels))
    }

    /// Iterates over the samples of one channel.
    ///
    /// # Errors
    /// [`PcmError::ChannelOutOfRange`] if `channel` is not below the channel
    /// count, otherwise the same as [`SampleBuffer::num_frames`].
    pub fn channel(&self, channel: usize) -> PcmResult<impl Iterator<Item = T> + '_> {
        let channels = self.num_channels();
        if channel >= channels {
            return Err(PcmError::ChannelOutOfRange { channel, channels });
        }
        Ok(self.frames()?.map(move |frame| frame[channel]))
    }
}

impl<T: PcmSample> Index<usize> for SampleBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T: PcmSample> IndexMut<usize> for SampleBuffer<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }
}

/// Any one of the three buffer variants.
///
/// Use this at module boundaries that must accept every representation; the
/// `match` over it is checked for exhaustiveness at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyBuffer {
    /// 64-bit float samples.
    Float64(FloatBuffer),
    /// 32-bit float samples.
    Float32(Float32Buffer),
    /// Integer samples.
    Int(IntBuffer),
}

macro_rules! dispatch {
    ($self:expr, $buffer:ident => $body:expr) => {
        match $self {
            AnyBuffer::Float64($buffer) => $body,
            AnyBuffer::Float32($buffer) => $body,
            AnyBuffer::Int($buffer) => $body,
        }
    };
}

impl AnyBuffer {
    /// Representation held by this buffer.
    pub const fn kind(&self) -> SampleKind {
        match self {
            AnyBuffer::Float64(_) => SampleKind::Float64,
            AnyBuffer::Float32(_) => SampleKind::Float32,
            AnyBuffer::Int(_) => SampleKind::Int,
        }
    }

    /// Total number of samples across all channels.
    pub fn len(&self) -> usize {
        dispatch!(self, b => b.len())
    }

    /// Returns true if the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        dispatch!(self, b => b.is_empty())
    }

    /// Converts into the representation `kind`, at that representation's
    /// default width.
    pub fn convert(&self, kind: SampleKind) -> PcmResult<AnyBuffer> {
        Ok(match kind {
            SampleKind::Float64 => AnyBuffer::Float64(self.as_float_buffer()?),
            SampleKind::Float32 => AnyBuffer::Float32(self.as_float32_buffer()?),
            SampleKind::Int => AnyBuffer::Int(self.as_int_buffer()?),
        })
    }
}

impl PcmBuffer for AnyBuffer {
    fn pcm_format(&self) -> &Format {
        dispatch!(self, b => b.format())
    }

    fn num_frames(&self) -> PcmResult<usize> {
        dispatch!(self, b => b.num_frames())
    }

    fn as_float_buffer(&self) -> PcmResult<FloatBuffer> {
        dispatch!(self, b => b.as_float_buffer())
    }

    fn as_float32_buffer(&self) -> PcmResult<Float32Buffer> {
        dispatch!(self, b => b.as_float32_buffer())
    }

    fn as_int_buffer(&self) -> PcmResult<IntBuffer> {
        dispatch!(self, b => b.as_int_buffer())
    }

    fn as_int_buffer_with_depth(&self, bit_depth: u32) -> PcmResult<IntBuffer> {
        dispatch!(self, b => b.as_int_buffer_with_depth(bit_depth))
    }

    fn clone_buffer(&self) -> AnyBuffer {
        self.clone()
    }
}

impl<T: PcmSample> From<SampleBuffer<T>> for AnyBuffer {
    fn from(buffer: SampleBuffer<T>) -> Self {
        T::into_any(buffer)
    }
}

macro_rules! impl_try_from_any {
    ($type:ty, $variant:ident) => {
        impl TryFrom<AnyBuffer> for $type {
            type Error = PcmError;

            fn try_from(buffer: AnyBuffer) -> PcmResult<Self> {
                match buffer {
                    AnyBuffer::$variant(inner) => Ok(inner),
                    other => Err(PcmError::VariantMismatch {
                        expected: SampleKind::$variant.buffer_name(),
                        actual: other.kind().buffer_name(),
                    }),
                }
            }
        }
    };
}

impl_try_from_any!(FloatBuffer, Float64);
impl_try_from_any!(Float32Buffer, Float32);
impl_try_from_any!(IntBuffer, Int);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ByteOrder;

    fn stereo_ints() -> IntBuffer {
        IntBuffer::new(Format::STEREO_44100, vec![1, -1, 2, -2, 3, -3]).unwrap()
    }

    #[test]
    fn test_int_buffer_rejects_wide_formats() {
        let format = Format::new(1, 44100, 64, ByteOrder::LittleEndian).unwrap();
        assert!(matches!(
            IntBuffer::new(format, vec![0]),
            Err(PcmError::UnsupportedBitDepth { bit_depth: 64, .. })
        ));
        assert!(FloatBuffer::new(format, vec![0.0]).is_ok());
    }

    #[test]
    fn test_frame_count() {
        let buffer = stereo_ints();
        assert_eq!(buffer.len(), 6);
        assert_eq!(buffer.num_frames().unwrap(), 3);
        assert_eq!(buffer.kind(), SampleKind::Int);

        let empty = Float32Buffer::new(Format::STEREO_44100, Vec::new()).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.num_frames().unwrap(), 0);
    }

    #[test]
    fn test_frame_count_detects_resize_violation() {
        let mut buffer = stereo_ints();
        buffer.samples_mut().truncate(5);
        assert_eq!(buffer.num_frames(), Err(PcmError::malformed(5, 2)));
        assert!(buffer.duration_seconds().is_err());

        buffer.samples_mut().truncate(4);
        assert_eq!(buffer.num_frames().unwrap(), 2);
    }

    #[test]
    fn test_silence() {
        let buffer = FloatBuffer::silence(Format::STEREO_48000, 480).unwrap();
        assert_eq!(buffer.len(), 960);
        assert!(buffer.data().iter().all(|&s| s == 0.0));
        assert_eq!(buffer.duration_seconds().unwrap(), 0.01);
    }

    #[test]
    fn test_frame_access() {
        let mut buffer = stereo_ints();
        assert_eq!(buffer.frame(0), Some(&[1, -1][..]));
        assert_eq!(buffer.frame(2), Some(&[3, -3][..]));
        assert_eq!(buffer.frame(3), None);
        assert_eq!(buffer.frame(usize::MAX), None);

        if let Some(frame) = buffer.frame_mut(1) {
            frame.swap(0, 1);
        }
        assert_eq!(buffer.data(), &[1, -1, -2, 2, 3, -3]);

        let left: Vec<i32> = buffer.channel(0).unwrap().collect();
        assert_eq!(left, vec![1, -2, 3]);
        assert!(matches!(
            buffer.channel(2),
            Err(PcmError::ChannelOutOfRange {
                channel: 2,
                channels: 2
            })
        ));
    }

    #[test]
    fn test_frames_iteration() {
        let mut buffer = stereo_ints();
        assert_eq!(buffer.frames().unwrap().count(), 3);

        for frame in buffer.frames_mut().unwrap() {
            frame[1] = 0;
        }
        assert_eq!(buffer.data(), &[1, 0, 2, 0, 3, 0]);
    }

    #[test]
    fn test_frame_views_reject_partial_frame() {
        let mut buffer = IntBuffer::new(Format::STEREO_44100, vec![1, 2, 3, 4]).unwrap();
        buffer.samples_mut().push(5);
        let expected = PcmError::malformed(5, 2);

        assert_eq!(buffer.frames().err(), Some(expected.clone()));
        assert!(buffer.channel(0).is_err_and(|e| e == expected));
        assert_eq!(buffer.frames_mut().err(), Some(expected));
        assert_eq!(buffer.data(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_silence_rejects_overflowing_length() {
        let frames = usize::MAX / 2 + 1;
        assert_eq!(
            FloatBuffer::silence(Format::STEREO_44100, frames),
            Err(PcmError::CapacityOverflow {
                frames,
                channels: 2
            })
        );
        assert!(IntBuffer::silence(Format::MONO_44100, 0).unwrap().is_empty());
    }

    #[test]
    fn test_clone_is_deep() {
        let original = stereo_ints();
        let mut copy = original.clone();
        copy[0] = 42;
        copy.samples_mut().clear();
        assert_eq!(original[0], 1);
        assert_eq!(original.len(), 6);
    }

    #[test]
    fn test_any_buffer_round_trip() {
        let any = AnyBuffer::from(stereo_ints());
        assert_eq!(any.kind(), SampleKind::Int);
        assert_eq!(any.len(), 6);
        assert_eq!(any.num_frames().unwrap(), 3);
        assert_eq!(any.pcm_format(), &Format::STEREO_44100);

        let err = FloatBuffer::try_from(any.clone()).unwrap_err();
        assert_eq!(
            err,
            PcmError::VariantMismatch {
                expected: "FloatBuffer",
                actual: "IntBuffer"
            }
        );
        let ints = IntBuffer::try_from(any).unwrap();
        assert_eq!(ints, stereo_ints());
    }

    #[test]
    fn test_any_buffer_convert() {
        let any = AnyBuffer::from(stereo_ints());
        let floats = any.convert(SampleKind::Float32).unwrap();
        assert_eq!(floats.kind(), SampleKind::Float32);
        assert_eq!(floats.pcm_format().bit_depth(), 32);
        assert_eq!(floats.len(), any.len());

        let back = floats.convert(SampleKind::Int).unwrap();
        assert_eq!(back.pcm_format().bit_depth(), 32);
    }

    #[test]
    fn test_into_parts() {
        let (format, data) = stereo_ints().into_parts();
        assert_eq!(format, Format::STEREO_44100);
        assert_eq!(data.len(), 6);
        assert_eq!(stereo_ints().into_data(), data);
    }
}

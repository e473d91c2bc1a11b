//! The format descriptor attached to every PCM buffer.
//!
//! A [`Format`] answers "what does this data mean" without looking at the
//! samples: how many interleaved channels make up a frame, how many frames
//! play per second, how many bits each sample was quantised to and in which
//! byte order it travels when packed into raw bytes.
//!
//! ```rust
//! use pcm_buffers::{ByteOrder, Format};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let format = Format::new(2, 48_000, 24, ByteOrder::LittleEndian)?;
//! assert_eq!(format.channel_count(), 2);
//! assert_eq!(format.bytes_per_sample(), 3);
//! assert!(Format::new(0, 48_000, 24, ByteOrder::LittleEndian).is_err());
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

use crate::{PcmError, PcmResult};

/// Largest bit depth any representation in this crate carries.
pub const MAX_BIT_DEPTH: u32 = 64;

/// Byte order used when samples are packed into raw bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum ByteOrder {
    /// Least significant byte first (WAV, most hardware).
    #[default]
    LittleEndian,
    /// Most significant byte first (AIFF, network order).
    BigEndian,
}

impl ByteOrder {
    /// Byte order of the target platform.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }

    /// Returns true if this is the byte order of the target platform.
    pub const fn is_native(&self) -> bool {
        matches!(
            (self, Self::native()),
            (ByteOrder::LittleEndian, ByteOrder::LittleEndian)
                | (ByteOrder::BigEndian, ByteOrder::BigEndian)
        )
    }
}

/// Channel count, sample rate, bit depth and byte order of a block of PCM samples.
///
/// `Format` is a plain `Copy` value: every buffer owns its own copy and
/// conversions stamp a fresh copy onto their result. Equality is field-wise.
/// The only way to build one outside this crate is [`Format::new`], which
/// rejects zero channel counts, sample rates and bit depths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialization", serde(try_from = "RawFormat"))]
pub struct Format {
    channel_count: u16,
    sample_rate: u32,
    bit_depth: u32,
    byte_order: ByteOrder,
}

impl Format {
    /// 16-bit mono at 22.05 kHz.
    pub const MONO_22050: Format = Format::preset(1, 22_050);
    /// 16-bit mono at 44.1 kHz.
    pub const MONO_44100: Format = Format::preset(1, 44_100);
    /// 16-bit mono at 48 kHz.
    pub const MONO_48000: Format = Format::preset(1, 48_000);
    /// 16-bit stereo at 22.05 kHz.
    pub const STEREO_22050: Format = Format::preset(2, 22_050);
    /// 16-bit stereo at 44.1 kHz.
    pub const STEREO_44100: Format = Format::preset(2, 44_100);
    /// 16-bit stereo at 48 kHz.
    pub const STEREO_48000: Format = Format::preset(2, 48_000);

    const fn preset(channel_count: u16, sample_rate: u32) -> Self {
        Format {
            channel_count,
            sample_rate,
            bit_depth: 16,
            byte_order: ByteOrder::LittleEndian,
        }
    }

    /// Creates a validated format.
    ///
    /// # Errors
    /// Returns [`PcmError::InvalidFormat`] if `channel_count`, `sample_rate` or
    /// `bit_depth` is zero, or if `bit_depth` exceeds [`MAX_BIT_DEPTH`].
    pub fn new(
        channel_count: u16,
        sample_rate: u32,
        bit_depth: u32,
        byte_order: ByteOrder,
    ) -> PcmResult<Self> {
        if channel_count == 0 {
            return Err(PcmError::invalid_format(
                "channel_count",
                0,
                "must be at least 1",
            ));
        }
        if sample_rate == 0 {
            return Err(PcmError::invalid_format(
                "sample_rate",
                0,
                "must be at least 1 Hz",
            ));
        }
        validate_bit_depth(bit_depth)?;
        Ok(Format {
            channel_count,
            sample_rate,
            bit_depth,
            byte_order,
        })
    }

    /// Returns a copy of this format with the bit depth replaced.
    ///
    /// # Errors
    /// Returns [`PcmError::InvalidFormat`] if `bit_depth` is zero or above [`MAX_BIT_DEPTH`].
    pub fn with_bit_depth(self, bit_depth: u32) -> PcmResult<Self> {
        validate_bit_depth(bit_depth)?;
        Ok(Format { bit_depth, ..self })
    }

    /// Returns a copy of this format with the byte order replaced.
    pub const fn with_byte_order(self, byte_order: ByteOrder) -> Self {
        Format { byte_order, ..self }
    }

    /// Number of interleaved channels per frame.
    pub const fn channel_count(&self) -> u16 {
        self.channel_count
    }

    /// Frames per second, in Hz.
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Bits per sample.
    pub const fn bit_depth(&self) -> u32 {
        self.bit_depth
    }

    /// Byte order used when packing samples into bytes.
    pub const fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Width of one packed sample in bytes, `ceil(bit_depth / 8)`.
    pub const fn bytes_per_sample(&self) -> usize {
        self.bit_depth.div_ceil(8) as usize
    }

    /// Playback time of `frames` frames, in seconds.
    pub fn frames_to_seconds(&self, frames: usize) -> f64 {
        frames as f64 / self.sample_rate as f64
    }

    /// Number of whole frames covering `seconds` of audio, rounded to nearest.
    ///
    /// Negative or non-finite durations yield zero frames.
    pub fn seconds_to_frames(&self, seconds: f64) -> usize {
        let frames = (seconds * self.sample_rate as f64).round();
        if frames.is_finite() && frames > 0.0 {
            frames as usize
        } else {
            0
        }
    }
}

fn validate_bit_depth(bit_depth: u32) -> PcmResult<()> {
    if bit_depth == 0 {
        return Err(PcmError::invalid_format(
            "bit_depth",
            0,
            "must be at least 1 bit",
        ));
    }
    if bit_depth > MAX_BIT_DEPTH {
        return Err(PcmError::invalid_format(
            "bit_depth",
            u64::from(bit_depth),
            format!("must not exceed {MAX_BIT_DEPTH} bits"),
        ));
    }
    Ok(())
}

/// Unvalidated mirror of [`Format`] so deserialisation goes through [`Format::new`].
#[cfg(feature = "serialization")]
#[derive(Deserialize)]
struct RawFormat {
    channel_count: u16,
    sample_rate: u32,
    bit_depth: u32,
    byte_order: ByteOrder,
}

#[cfg(feature = "serialization")]
impl TryFrom<RawFormat> for Format {
    type Error = PcmError;

    fn try_from(raw: RawFormat) -> PcmResult<Self> {
        Format::new(
            raw.channel_count,
            raw.sample_rate,
            raw.bit_depth,
            raw.byte_order,
        )
    }
}

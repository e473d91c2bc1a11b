//! Error types and result utilities for PCM buffer operations.

use thiserror::Error;

/// Convenience type alias for results that may contain a [`PcmError`].
pub type PcmResult<T> = Result<T, PcmError>;

/// Error types that can occur while building, inspecting or converting PCM buffers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PcmError {
    /// A [`Format`](crate::Format) field was zero or out of range.
    #[error("Invalid format: {field} = {value} ({reason})")]
    InvalidFormat {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: u64,
        /// Why the value was rejected.
        reason: String,
    },

    /// The sample sequence length is not a whole number of frames.
    ///
    /// Detected when frames are counted or a conversion runs, not at construction,
    /// because the sample storage stays mutable after the buffer is built.
    #[error("Malformed buffer: {samples} samples cannot be split into frames of {channels} channels")]
    MalformedBuffer {
        /// Number of samples held by the buffer.
        samples: usize,
        /// Channel count of the buffer's format.
        channels: usize,
    },

    /// A channel index at or past the format's channel count.
    #[error("Channel {channel} out of range for {channels} channels")]
    ChannelOutOfRange {
        /// The requested channel index.
        channel: usize,
        /// Channel count of the buffer's format.
        channels: usize,
    },

    /// The requested frame count does not fit in addressable memory.
    #[error("Capacity overflow: {frames} frames of {channels} channels")]
    CapacityOverflow {
        /// Requested number of frames.
        frames: usize,
        /// Channel count of the format.
        channels: usize,
    },

    /// The requested bit depth cannot be represented by the target sample storage.
    #[error("Unsupported bit depth {bit_depth} for {operation}")]
    UnsupportedBitDepth {
        /// The rejected bit depth.
        bit_depth: u32,
        /// Operation that rejected it.
        operation: &'static str,
    },

    /// A raw byte slice does not hold a whole number of samples.
    #[error("Byte length {bytes} is not a multiple of the {sample_width}-byte sample width")]
    ByteLength {
        /// Length of the byte slice.
        bytes: usize,
        /// Width of one packed sample in bytes.
        sample_width: usize,
    },

    /// An [`AnyBuffer`](crate::AnyBuffer) did not hold the requested variant.
    #[error("Buffer variant mismatch: expected {expected}, got {actual}")]
    VariantMismatch {
        /// Variant that was requested.
        expected: &'static str,
        /// Variant that was present.
        actual: &'static str,
    },
}

impl PcmError {
    /// Create an invalid format error.
    pub fn invalid_format(field: &'static str, value: u64, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            field,
            value,
            reason: reason.into(),
        }
    }

    /// Create a malformed buffer error.
    pub const fn malformed(samples: usize, channels: usize) -> Self {
        Self::MalformedBuffer { samples, channels }
    }

    /// Create an unsupported bit depth error.
    pub const fn unsupported_bit_depth(bit_depth: u32, operation: &'static str) -> Self {
        Self::UnsupportedBitDepth {
            bit_depth,
            operation,
        }
    }

    /// Returns true if the error describes a buffer whose contents broke the frame invariant.
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedBuffer { .. })
    }
}

//! Raw PCM byte packing.
//!
//! Producers that receive samples as raw bytes (a device callback, the data
//! section of a file another component has already parsed) and consumers that
//! must hand bytes back out use these methods. The byte order comes from the
//! buffer's [`Format`]; no container framing is read or written.
//!
//! - Integer samples occupy [`Format::bytes_per_sample`] bytes each, two's
//!   complement and right-aligned. Values outside the bit depth's range are
//!   clamped before packing; unpacking sign-extends from the bit depth, so a
//!   12-bit `0x0800` reads as `-2048`.
//! - Float samples are IEEE-754, 4 bytes for [`Float32Buffer`] and 8 bytes for
//!   [`FloatBuffer`].
//!
//! ```rust
//! use pcm_buffers::{ByteOrder, Format, IntBuffer};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let format = Format::new(1, 48_000, 24, ByteOrder::BigEndian)?;
//! let buffer = IntBuffer::new(format, vec![1, -2])?;
//! assert_eq!(buffer.to_bytes(), vec![0x00, 0x00, 0x01, 0xFF, 0xFF, 0xFE]);
//!
//! let decoded = IntBuffer::from_bytes(format, &buffer.to_bytes())?;
//! assert_eq!(decoded, buffer);
//! # Ok(())
//! # }
//! ```

use bytemuck::Pod;
use num_traits::ToBytes;

use crate::conversions::{MAX_INT_BIT_DEPTH, int_max_signed_value, int_min_signed_value};
use crate::repr::{Float32Buffer, FloatBuffer, IntBuffer, SampleBuffer};
use crate::{ByteOrder, Format, PcmError, PcmResult, PcmSample};

fn check_byte_length(bytes: &[u8], sample_width: usize) -> PcmResult<()> {
    if bytes.len() % sample_width != 0 {
        return Err(PcmError::ByteLength {
            bytes: bytes.len(),
            sample_width,
        });
    }
    Ok(())
}

/// Reads one `T` from `chunk`, which holds exactly `size_of::<T>()` bytes in `order`.
fn read_pod<T: Pod>(chunk: &[u8], order: ByteOrder) -> T {
    if order.is_native() {
        return bytemuck::pod_read_unaligned(chunk);
    }
    let mut swapped = [0u8; 8];
    let swapped = &mut swapped[..chunk.len()];
    swapped.copy_from_slice(chunk);
    swapped.reverse();
    bytemuck::pod_read_unaligned(swapped)
}

fn pack_floats<T: PcmSample>(samples: &[T], order: ByteOrder) -> Vec<u8> {
    if order.is_native() {
        return bytemuck::cast_slice::<T, u8>(samples).to_vec();
    }
    let mut out = Vec::with_capacity(std::mem::size_of_val(samples));
    for sample in samples {
        match order {
            ByteOrder::LittleEndian => out.extend_from_slice(sample.to_le_bytes().as_ref()),
            ByteOrder::BigEndian => out.extend_from_slice(sample.to_be_bytes().as_ref()),
        }
    }
    out
}

fn unpack_floats<T: PcmSample>(format: Format, bytes: &[u8]) -> PcmResult<SampleBuffer<T>> {
    let width = std::mem::size_of::<T>();
    check_byte_length(bytes, width)?;
    let order = format.byte_order();
    let data = bytes
        .chunks_exact(width)
        .map(|chunk| read_pod::<T>(chunk, order))
        .collect();
    SampleBuffer::new(format.with_bit_depth(T::NATURAL_BIT_DEPTH)?, data)
}

macro_rules! impl_float_bytes {
    ($buffer:ty, $width:literal) => {
        impl $buffer {
            #[doc = concat!("Packs the samples as ", $width, "-byte IEEE-754 values in the format's byte order.")]
            pub fn to_bytes(&self) -> Vec<u8> {
                pack_floats(self.data(), self.format().byte_order())
            }

            #[doc = concat!("Unpacks ", $width, "-byte IEEE-754 values in `format`'s byte order.")]
            ///
            /// The resulting format's bit depth is set to the sample width.
            ///
            /// # Errors
            /// [`PcmError::ByteLength`] if `bytes` is not a whole number of samples.
            pub fn from_bytes(format: Format, bytes: &[u8]) -> PcmResult<Self> {
                unpack_floats(format, bytes)
            }
        }
    };
}

impl_float_bytes!(FloatBuffer, "8");
impl_float_bytes!(Float32Buffer, "4");

impl IntBuffer {
    /// Packs the samples into `bytes_per_sample()` bytes each, in the format's byte order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let format = self.format();
        let width = format.bytes_per_sample();
        let min = int_min_signed_value(format.bit_depth()) as i32;
        let max = int_max_signed_value(format.bit_depth()) as i32;

        let mut out = Vec::with_capacity(self.len() * width);
        for &sample in self.data() {
            let le = sample.clamp(min, max).to_le_bytes();
            let packed = &le[..width];
            match format.byte_order() {
                ByteOrder::LittleEndian => out.extend_from_slice(packed),
                ByteOrder::BigEndian => out.extend(packed.iter().rev()),
            }
        }
        out
    }

    /// Unpacks `bytes_per_sample()`-byte two's complement samples in `format`'s byte order.
    ///
    /// Only the low `bit_depth` bits of each sample are read, so every decoded
    /// value lies in the depth's signed range.
    ///
    /// # Errors
    /// - [`PcmError::UnsupportedBitDepth`] if the format is wider than 32 bits.
    /// - [`PcmError::ByteLength`] if `bytes` is not a whole number of samples.
    pub fn from_bytes(format: Format, bytes: &[u8]) -> PcmResult<Self> {
        if format.bit_depth() > MAX_INT_BIT_DEPTH {
            return Err(PcmError::unsupported_bit_depth(
                format.bit_depth(),
                "integer byte unpacking",
            ));
        }
        let width = format.bytes_per_sample();
        check_byte_length(bytes, width)?;

        let shift = 32 - format.bit_depth();
        let data = bytes
            .chunks_exact(width)
            .map(|chunk| {
                let mut le = [0u8; 4];
                le[..width].copy_from_slice(chunk);
                if format.byte_order() == ByteOrder::BigEndian {
                    le[..width].reverse();
                }
                // Sign-extend from the bit depth; padding bits above it are ignored.
                (i32::from_le_bytes(le) << shift) >> shift
            })
            .collect();
        IntBuffer::new(format, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_format(bit_depth: u32, order: ByteOrder) -> Format {
        Format::new(2, 44100, bit_depth, order).unwrap()
    }

    #[test]
    fn test_int16_little_endian() {
        let buffer = IntBuffer::new(
            int_format(16, ByteOrder::LittleEndian),
            vec![1, -1, 0x1234, i16::MIN as i32],
        )
        .unwrap();
        assert_eq!(
            buffer.to_bytes(),
            vec![0x01, 0x00, 0xFF, 0xFF, 0x34, 0x12, 0x00, 0x80]
        );
    }

    #[test]
    fn test_int16_big_endian() {
        let buffer =
            IntBuffer::new(int_format(16, ByteOrder::BigEndian), vec![0x1234, -2]).unwrap();
        assert_eq!(buffer.to_bytes(), vec![0x12, 0x34, 0xFF, 0xFE]);
    }

    #[test]
    fn test_int24_sign_extension() {
        let format = int_format(24, ByteOrder::LittleEndian);
        let bytes = [0xFF, 0xFF, 0x7F, 0x00, 0x00, 0x80];
        let buffer = IntBuffer::from_bytes(format, &bytes).unwrap();
        assert_eq!(buffer.data(), &[8_388_607, -8_388_608]);
        assert_eq!(buffer.to_bytes(), bytes.to_vec());
    }

    #[test]
    fn test_int12_sign_extends_from_bit_depth() {
        let format = int_format(12, ByteOrder::LittleEndian);
        let bytes = [0x00, 0x08, 0xFF, 0x07, 0xFF, 0xFF, 0xFF, 0x0F];
        let buffer = IntBuffer::from_bytes(format, &bytes).unwrap();
        assert_eq!(buffer.data(), &[-2048, 2047, -1, -1]);

        let buffer = IntBuffer::new(format, vec![-2048, 2047]).unwrap();
        assert_eq!(buffer.to_bytes(), vec![0x00, 0xF8, 0xFF, 0x07]);
        assert_eq!(IntBuffer::from_bytes(format, &buffer.to_bytes()).unwrap(), buffer);

        let format = int_format(12, ByteOrder::BigEndian);
        let buffer = IntBuffer::from_bytes(format, &[0x08, 0x00, 0x07, 0xFF]).unwrap();
        assert_eq!(buffer.data(), &[-2048, 2047]);
    }

    #[test]
    fn test_int8_and_int32() {
        let format = int_format(8, ByteOrder::LittleEndian);
        let buffer = IntBuffer::from_bytes(format, &[0x80, 0x7F]).unwrap();
        assert_eq!(buffer.data(), &[-128, 127]);

        let format = int_format(32, ByteOrder::BigEndian);
        let buffer = IntBuffer::new(format, vec![i32::MIN, 1]).unwrap();
        let bytes = buffer.to_bytes();
        assert_eq!(bytes, vec![0x80, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(IntBuffer::from_bytes(format, &bytes).unwrap(), buffer);
    }

    #[test]
    fn test_int_packing_clamps_out_of_range() {
        let buffer =
            IntBuffer::new(int_format(16, ByteOrder::LittleEndian), vec![40_000, -40_000]).unwrap();
        let decoded = IntBuffer::from_bytes(*buffer.format(), &buffer.to_bytes()).unwrap();
        assert_eq!(decoded.data(), &[32767, -32768]);
    }

    #[test]
    fn test_byte_length_mismatch() {
        let err = IntBuffer::from_bytes(int_format(24, ByteOrder::LittleEndian), &[0; 7]).unwrap_err();
        assert_eq!(
            err,
            PcmError::ByteLength {
                bytes: 7,
                sample_width: 3
            }
        );
        assert!(Float32Buffer::from_bytes(Format::MONO_44100, &[0; 6]).is_err());
    }

    #[test]
    fn test_float_bytes_both_orders() {
        for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
            let format = Format::MONO_48000.with_byte_order(order);
            let buffer = Float32Buffer::new(format, vec![0.5, -0.25, 1.0e-3]).unwrap();
            let bytes = buffer.to_bytes();
            assert_eq!(bytes.len(), 12);
            let decoded = Float32Buffer::from_bytes(format, &bytes).unwrap();
            assert_eq!(decoded.data(), buffer.data());
            assert_eq!(decoded.bit_depth(), 32);
        }

        let format = Format::MONO_48000.with_byte_order(ByteOrder::BigEndian);
        let buffer = Float32Buffer::new(format, vec![1.0]).unwrap();
        assert_eq!(buffer.to_bytes(), vec![0x3F, 0x80, 0x00, 0x00]);
    }

    #[test]
    fn test_float64_bytes() {
        let format = Format::STEREO_44100.with_byte_order(ByteOrder::LittleEndian);
        let buffer = FloatBuffer::new(format, vec![-1.0, 0.125]).unwrap();
        let bytes = buffer.to_bytes();
        assert_eq!(&bytes[..8], &(-1.0f64).to_le_bytes());
        let decoded = FloatBuffer::from_bytes(format, &bytes).unwrap();
        assert_eq!(decoded.data(), &[-1.0, 0.125]);
        assert_eq!(decoded.bit_depth(), 64);
    }

    #[test]
    fn test_int_from_bytes_rejects_wide_format() {
        let format = Format::new(1, 44100, 48, ByteOrder::LittleEndian).unwrap();
        assert!(matches!(
            IntBuffer::from_bytes(format, &[0; 6]),
            Err(PcmError::UnsupportedBitDepth { bit_depth: 48, .. })
        ));
    }
}

//! Tests for behaviour that spans buffers, conversions and the capability trait.
//!
//! Every variant and every conversion path is checked against the invariants
//! downstream chaining relies on: frame counts, sample counts, format
//! passthrough, scaling boundaries and clone isolation.

use crate::{AnyBuffer, ByteOrder, Float32Buffer, FloatBuffer, Format, IntBuffer};


/// Helper function to build a stereo ramp of `frames` frames in every variant.
pub(crate) fn create_test_buffers(frames: usize, bit_depth: u32) -> Vec<AnyBuffer> {
    let format = Format::new(2, 48000, bit_depth, ByteOrder::LittleEndian)
        .expect("valid test format");
    let normalized: Vec<f64> = (0..frames * 2)
        .map(|i| (i as f64 / (frames * 2) as f64) * 2.0 - 1.0)
        .collect();

    let scale = (1i64 << (bit_depth - 1)) as f64;
    let ints = normalized
        .iter()
        .map(|v| (v * scale).round().min(scale - 1.0) as i32)
        .collect();

    vec![
        AnyBuffer::from(FloatBuffer::new(format, normalized.clone()).expect("f64 buffer")),
        AnyBuffer::from(
            Float32Buffer::new(format, normalized.iter().map(|&v| v as f32).collect())
                .expect("f32 buffer"),
        ),
        AnyBuffer::from(IntBuffer::new(format, ints).expect("int buffer")),
    ]
}

//! Sample packing for tri-linear color-cube samplers.
//!
//! Both encodings emit one entry per lattice point in [`TABLE_ORDER`], so
//! packing never re-transposes what the parser laid out.
//!
//! [`TABLE_ORDER`]: crate::lut::TABLE_ORDER

use crate::error::{ColorError, ColorResult};
use crate::lut::LutTable;
use serde::{Deserialize, Serialize};

/// Sampler buffer encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackingMode {
    /// One `0xAARRGGBB` word per sample, alpha opaque, channels quantized.
    #[default]
    IntegerArgb,
    /// Four `f32` per sample (`r, g, b, 1.0`), unclamped.
    FloatRgba,
}

/// Packed sample storage.
#[derive(Debug, Clone, PartialEq)]
pub enum PackedSamples {
    Argb(Vec<u32>),
    Rgba(Vec<f32>),
}

/// Sampler-ready buffer plus its cube dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedLut {
    pub dimension: usize,
    pub samples: PackedSamples,
}

impl PackedLut {
    /// Encoding of this buffer.
    pub fn mode(&self) -> PackingMode {
        match self.samples {
            PackedSamples::Argb(_) => PackingMode::IntegerArgb,
            PackedSamples::Rgba(_) => PackingMode::FloatRgba,
        }
    }

    /// Number of lattice points.
    pub fn sample_count(&self) -> usize {
        match &self.samples {
            PackedSamples::Argb(words) => words.len(),
            PackedSamples::Rgba(floats) => floats.len() / 4,
        }
    }

    /// Raw buffer in native byte order, for sampler APIs taking untyped data.
    pub fn as_bytes(&self) -> &[u8] {
        match &self.samples {
            PackedSamples::Argb(words) => bytemuck::cast_slice(words),
            PackedSamples::Rgba(floats) => bytemuck::cast_slice(floats),
        }
    }

    /// Decode the RGB of sample `index` back to normalized floats.
    pub fn rgb_at(&self, index: usize) -> Option<[f32; 3]> {
        match &self.samples {
            PackedSamples::Argb(words) => words.get(index).map(|&w| {
                let [_, r, g, b] = w.to_be_bytes();
                [
                    f32::from(r) / 255.0,
                    f32::from(g) / 255.0,
                    f32::from(b) / 255.0,
                ]
            }),
            PackedSamples::Rgba(floats) => floats
                .get(index * 4..index * 4 + 3)
                .map(|c| [c[0], c[1], c[2]]),
        }
    }

    /// Decode the whole buffer into a table holding exactly what a sampler
    /// would read, quantization included.
    pub fn unpack(&self) -> ColorResult<LutTable> {
        let count = self.sample_count();
        let samples = (0..count)
            .map(|i| self.rgb_at(i))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| {
                ColorError::sample_count_mismatch(self.dimension, count * 3, 0)
            })?;
        LutTable::from_samples(self.dimension, samples)
    }
}

/// Pack a table for a sampler using `mode`.
pub fn pack(table: &LutTable, mode: PackingMode) -> PackedLut {
    let samples = match mode {
        PackingMode::IntegerArgb => {
            PackedSamples::Argb(table.samples().iter().map(|&rgb| pack_argb(rgb)).collect())
        }
        PackingMode::FloatRgba => PackedSamples::Rgba(
            table
                .samples()
                .iter()
                .flat_map(|&[r, g, b]| [r, g, b, 1.0])
                .collect(),
        ),
    };
    PackedLut {
        dimension: table.size(),
        samples,
    }
}

/// Opaque `0xAARRGGBB` word for one normalized color.
#[inline]
pub fn pack_argb([r, g, b]: [f32; 3]) -> u32 {
    0xFF00_0000
        | u32::from(quantize_channel(r)) << 16
        | u32::from(quantize_channel(g)) << 8
        | u32::from(quantize_channel(b))
}

/// `round(value * 255)` clamped to `[0, 255]`.
///
/// Ties round away from zero, so `127.5` becomes `128` and `126.5` becomes
/// `127`. Out-of-range values saturate instead of failing.
#[inline]
pub fn quantize_channel(value: f32) -> u8 {
    quantize_scaled(value * 255.0)
}

#[inline]
fn quantize_scaled(scaled: f32) -> u8 {
    // NaN saturates to 0 through the float-to-int cast.
    scaled.round().clamp(0.0, 255.0) as u8
}

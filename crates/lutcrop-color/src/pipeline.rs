//! LUT preparation: parse, blend and pack under one configuration.

use crate::blend::blend;
use crate::cube::{parse_table, validate_intensity};
use crate::error::ColorResult;
use crate::lut::LutTable;
use crate::pack::{pack, PackedLut, PackingMode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Which LUT behaviours a platform exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LutOptions {
    /// Honour the requested intensity. When off, LUTs apply at full strength.
    pub intensity_enabled: bool,
    /// Sampler buffer encoding.
    pub packing_mode: PackingMode,
}

impl Default for LutOptions {
    fn default() -> Self {
        Self {
            intensity_enabled: true,
            packing_mode: PackingMode::IntegerArgb,
        }
    }
}

/// A LUT ready to hand to a sampler.
#[derive(Debug, Clone)]
pub struct PreparedLut {
    /// Blended table.
    pub table: LutTable,
    /// Sampler buffer built from `table`.
    pub packed: PackedLut,
    /// Intensity actually applied.
    pub intensity: f32,
}

/// Turns `.cube` text into sampler input.
#[derive(Debug, Clone, Default)]
pub struct LutPipeline {
    options: LutOptions,
}

impl LutPipeline {
    pub fn new(options: LutOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LutOptions {
        &self.options
    }

    /// Parse, blend and pack. Nothing is packed unless the table validated.
    pub fn prepare(&self, text: &str, intensity: Option<f32>) -> ColorResult<PreparedLut> {
        let intensity = if self.options.intensity_enabled {
            validate_intensity(intensity)?
        } else {
            if let Some(requested) = intensity {
                debug!(requested, "Intensity control disabled, applying LUT at full strength");
            }
            1.0
        };

        let table = blend(&parse_table(text)?, intensity);
        let packed = pack(&table, self.options.packing_mode);
        info!(
            size = table.size(),
            intensity,
            mode = ?self.options.packing_mode,
            "Prepared LUT"
        );
        Ok(PreparedLut {
            table,
            packed,
            intensity,
        })
    }
}

//! Intensity blending between a LUT and the identity transform.

use crate::lut::{identity_value, LutTable, TABLE_ORDER};

/// Blend `table` toward identity: `identity * (1 - intensity) + stored * intensity`.
///
/// `1.0` returns the table unchanged and `0.0` yields the identity table.
/// The caller validates the range; see [`crate::cube::validate_intensity`].
pub fn blend(table: &LutTable, intensity: f32) -> LutTable {
    if intensity == 1.0 {
        return table.clone();
    }

    let size = table.size();
    let keep = 1.0 - intensity;
    table.map_samples(|i, stored| {
        let (r, g, b) = TABLE_ORDER.coords(i, size);
        let identity = [
            identity_value(r, size),
            identity_value(g, size),
            identity_value(b, size),
        ];
        [
            identity[0] * keep + stored[0] * intensity,
            identity[1] * keep + stored[1] * intensity,
            identity[2] * keep + stored[2] * intensity,
        ]
    })
}

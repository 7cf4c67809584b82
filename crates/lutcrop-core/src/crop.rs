//! Centered square crop with optional horizontal mirror.
//!
//! Both platform pipelines feed the compositor from this one computation so
//! that the rendered square is pixel-identical everywhere.

use crate::error::{CoreError, Result};
use crate::geometry::{Rect, Transform2D, Vec2};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Placement of the output square inside a source frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropGeometry {
    /// Edge length of the output square.
    pub side: u32,
    /// Left edge of the crop rectangle in source coordinates.
    pub offset_x: f64,
    /// Top edge of the crop rectangle in source coordinates.
    pub offset_y: f64,
    /// Whether the output is mirrored horizontally.
    pub flipped: bool,
    /// Maps source coordinates into the `side x side` output frame.
    pub transform: Transform2D,
}

impl CropGeometry {
    /// Compute the crop for a `source_width x source_height` frame.
    ///
    /// `requested_side` of `None` or `Some(0)` selects the largest centered
    /// square, truncated to whole pixels. An explicit side larger than the
    /// smaller source dimension is rejected. Offsets keep their fractional
    /// part.
    pub fn compute(
        source_width: f64,
        source_height: f64,
        requested_side: Option<u32>,
        flip_horizontally: bool,
    ) -> Result<Self> {
        if !(source_width.is_finite() && source_height.is_finite())
            || source_width <= 0.0
            || source_height <= 0.0
        {
            return Err(CoreError::InvalidDimensions {
                width: source_width,
                height: source_height,
            });
        }

        let shorter = source_width.min(source_height);
        let side = match requested_side.filter(|&s| s > 0) {
            Some(side) if f64::from(side) > shorter => {
                return Err(CoreError::InvalidArgument(format!(
                    "crop size {side} exceeds source {source_width}x{source_height}"
                )));
            }
            Some(side) => side,
            None => {
                let side = shorter.trunc() as u32;
                if side == 0 {
                    return Err(CoreError::InvalidDimensions {
                        width: source_width,
                        height: source_height,
                    });
                }
                side
            }
        };

        let side_f = f64::from(side);
        let offset_x = (source_width - side_f) / 2.0;
        let offset_y = (source_height - side_f) / 2.0;

        let crop = Transform2D::translate(-offset_x, -offset_y);
        let transform = if flip_horizontally {
            Transform2D::mirror_horizontal(side_f).then(crop)
        } else {
            crop
        };

        debug!(
            source_width,
            source_height,
            side,
            offset_x,
            offset_y,
            flip_horizontally,
            "Computed crop geometry"
        );

        Ok(Self {
            side,
            offset_x,
            offset_y,
            flipped: flip_horizontally,
            transform,
        })
    }

    /// Crop rectangle in source coordinates.
    pub fn crop_rect(&self) -> Rect {
        let side = f64::from(self.side);
        Rect::new(self.offset_x, self.offset_y, side, side)
    }

    /// Output render rectangle, anchored at the origin.
    pub fn render_rect(&self) -> Rect {
        Rect::square(f64::from(self.side))
    }

    /// Map a source point into output coordinates.
    #[inline]
    pub fn map_point(&self, source: Vec2) -> Vec2 {
        self.transform.transform_point(source)
    }
}

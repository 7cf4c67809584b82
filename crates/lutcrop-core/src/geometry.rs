//! Geometric primitives for 2D transformations.
//!
//! Everything is `f64` so sub-pixel crop offsets survive unchanged on their
//! way to the compositor.

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

/// 2D vector.
pub type Vec2 = DVec2;

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square with its top-left corner at the origin.
    #[inline]
    pub const fn square(side: f64) -> Self {
        Self::new(0.0, 0.0, side, side)
    }

    /// Minimum corner (top-left).
    #[inline]
    pub fn min(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Maximum corner (bottom-right).
    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    /// Center point.
    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

/// 2D affine transformation.
///
/// Composition follows matrix order: `a.then(b)` applies `b` first, then `a`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    inner: DAffine2,
}

impl Transform2D {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        inner: DAffine2::IDENTITY,
    };

    /// Create a translation transform.
    #[inline]
    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            inner: DAffine2::from_translation(Vec2::new(x, y)),
        }
    }

    /// Create a scale transform.
    #[inline]
    pub fn scale(x: f64, y: f64) -> Self {
        Self {
            inner: DAffine2::from_scale(Vec2::new(x, y)),
        }
    }

    /// Mirror about the vertical line `x = width / 2`.
    #[inline]
    pub fn mirror_horizontal(width: f64) -> Self {
        Self::translate(width, 0.0).then(Self::scale(-1.0, 1.0))
    }

    /// Combine two transforms (`self * other`).
    #[inline]
    pub fn then(self, other: Self) -> Self {
        Self {
            inner: self.inner * other.inner,
        }
    }

    /// Transform a point.
    #[inline]
    pub fn transform_point(self, point: Vec2) -> Vec2 {
        self.inner.transform_point2(point)
    }

    /// Get the inverse transform.
    #[inline]
    pub fn inverse(self) -> Self {
        Self {
            inner: self.inner.inverse(),
        }
    }

    /// Components in `[a, b, c, d, tx, ty]` order, mapping
    /// `(x, y)` to `(a*x + c*y + tx, b*x + d*y + ty)`.
    pub fn components(self) -> [f64; 6] {
        let m = self.inner.matrix2;
        let t = self.inner.translation;
        [m.x_axis.x, m.x_axis.y, m.y_axis.x, m.y_axis.y, t.x, t.y]
    }

    /// Build from `[a, b, c, d, tx, ty]` components.
    pub fn from_components(c: [f64; 6]) -> Self {
        Self {
            inner: DAffine2::from_cols(
                Vec2::new(c[0], c[1]),
                Vec2::new(c[2], c[3]),
                Vec2::new(c[4], c[5]),
            ),
        }
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Serialize for Transform2D {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.components().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Transform2D {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <[f64; 6]>::deserialize(deserializer).map(Self::from_components)
    }
}

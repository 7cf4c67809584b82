//! LutCrop Core - Foundation types shared by the color and media crates
//!
//! This crate provides:
//! - Stable error codes and the caller-facing error shape
//! - Geometric primitives (Rect, Transform2D)
//! - Square-crop / mirror geometry

pub mod crop;
pub mod error;
pub mod geometry;

pub use crop::CropGeometry;
pub use error::{CoreError, ErrorCode, Result, TransformError};
pub use geometry::{Rect, Transform2D, Vec2};

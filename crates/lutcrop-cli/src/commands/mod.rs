//! Subcommand implementations.

pub mod geometry;
pub mod inspect;
pub mod pack;
pub mod transform;

use anyhow::{Context, Result};
use std::path::Path;

/// Read a `.cube` file as text.
pub(crate) fn read_lut(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub(crate) fn format_rgb([r, g, b]: [f32; 3]) -> String {
    format!("{r:.6} {g:.6} {b:.6}")
}

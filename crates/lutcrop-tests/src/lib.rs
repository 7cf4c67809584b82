//! Integration test crate for LutCrop.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on the color, core and media crates to verify they work
//! together.

#[cfg(test)]
mod lut;

#[cfg(test)]
mod geometry;

#[cfg(test)]
mod transform;

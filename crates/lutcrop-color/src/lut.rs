//! Dense 3D lookup table and the lattice order policy shared by the parser
//! and the packer.

use crate::error::{ColorError, ColorResult};

/// Enumeration order of lattice points in a flat buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatticeOrder {
    /// Red varies fastest, blue slowest.
    RedFastest,
    /// Blue varies fastest, red slowest (`cube[r][g][b]` addressing).
    BlueFastest,
}

impl LatticeOrder {
    /// Flat index of lattice point `(r, g, b)` in a table of `size` per axis.
    #[inline]
    pub fn index(self, r: usize, g: usize, b: usize, size: usize) -> usize {
        match self {
            Self::RedFastest => r + size * (g + size * b),
            Self::BlueFastest => b + size * (g + size * r),
        }
    }

    /// Inverse of [`LatticeOrder::index`], returning `(r, g, b)`.
    #[inline]
    pub fn coords(self, index: usize, size: usize) -> (usize, usize, usize) {
        let fast = index % size;
        let mid = (index / size) % size;
        let slow = index / (size * size);
        match self {
            Self::RedFastest => (fast, mid, slow),
            Self::BlueFastest => (slow, mid, fast),
        }
    }
}

/// Order in which `.cube` files list their triples: blue slowest, red fastest.
pub const CUBE_FILE_ORDER: LatticeOrder = LatticeOrder::RedFastest;

/// Order of [`LutTable`] storage and of every packed sampler buffer.
///
/// The parser transposes once from [`CUBE_FILE_ORDER`] into this order; the
/// packer emits samples in this order as-is.
pub const TABLE_ORDER: LatticeOrder = LatticeOrder::BlueFastest;

/// Validated 3D color lookup table with `size³` RGB samples.
///
/// Immutable once built. Values are normalized but not clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct LutTable {
    size: usize,
    samples: Vec<[f32; 3]>,
}

impl LutTable {
    /// Build a table from samples already laid out in [`TABLE_ORDER`].
    pub fn from_samples(size: usize, samples: Vec<[f32; 3]>) -> ColorResult<Self> {
        if size == 0 {
            return Err(ColorError::MissingOrInvalidSize { declared: 0 });
        }
        let expected = lattice_len(size)?;
        if samples.len() != expected {
            return Err(ColorError::sample_count_mismatch(
                size,
                expected * 3,
                samples.len() * 3,
            ));
        }
        Ok(Self { size, samples })
    }

    /// The identity transform at the given resolution.
    pub fn identity(size: usize) -> ColorResult<Self> {
        if size == 0 {
            return Err(ColorError::MissingOrInvalidSize { declared: 0 });
        }
        let len = lattice_len(size)?;
        let samples = (0..len)
            .map(|i| {
                let (r, g, b) = TABLE_ORDER.coords(i, size);
                [
                    identity_value(r, size),
                    identity_value(g, size),
                    identity_value(b, size),
                ]
            })
            .collect();
        Ok(Self { size, samples })
    }

    /// Per-axis resolution.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Samples in [`TABLE_ORDER`].
    #[inline]
    pub fn samples(&self) -> &[[f32; 3]] {
        &self.samples
    }

    /// Number of lattice points (`size³`).
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; a valid table has at least one sample.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Same lattice with every sample replaced by `f(index, sample)`.
    pub(crate) fn map_samples(&self, mut f: impl FnMut(usize, &[f32; 3]) -> [f32; 3]) -> Self {
        Self {
            size: self.size,
            samples: self.samples.iter().enumerate().map(|(i, s)| f(i, s)).collect(),
        }
    }

    /// Sample at lattice point `(r, g, b)`.
    ///
    /// # Panics
    /// If any coordinate is `>= size`.
    #[inline]
    pub fn get(&self, r: usize, g: usize, b: usize) -> [f32; 3] {
        assert!(
            r < self.size && g < self.size && b < self.size,
            "lattice point ({r}, {g}, {b}) outside size {}",
            self.size
        );
        self.samples[TABLE_ORDER.index(r, g, b, self.size)]
    }

    /// Sample at lattice point `(r, g, b)`, or `None` outside the lattice.
    #[inline]
    pub fn try_get(&self, r: usize, g: usize, b: usize) -> Option<[f32; 3]> {
        (r < self.size && g < self.size && b < self.size)
            .then(|| self.samples[TABLE_ORDER.index(r, g, b, self.size)])
    }
}

/// Normalized input color of lattice coordinate `coord`.
///
/// A single-entry axis maps to `0.0`.
#[inline]
pub fn identity_value(coord: usize, size: usize) -> f32 {
    if size > 1 {
        coord as f32 / (size - 1) as f32
    } else {
        0.0
    }
}

/// `size³`, rejecting resolutions whose component count overflows.
pub(crate) fn lattice_len(size: usize) -> ColorResult<usize> {
    size.checked_mul(size)
        .and_then(|sq| sq.checked_mul(size))
        .and_then(|len| len.checked_mul(3).map(|_| len))
        .ok_or(ColorError::MissingOrInvalidSize {
            declared: i64::try_from(size).unwrap_or(i64::MAX),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_are_transposes() {
        let n = 4;
        for r in 0..n {
            for g in 0..n {
                for b in 0..n {
                    let f = CUBE_FILE_ORDER.index(r, g, b, n);
                    let t = TABLE_ORDER.index(r, g, b, n);
                    assert_eq!(CUBE_FILE_ORDER.coords(f, n), (r, g, b));
                    assert_eq!(TABLE_ORDER.coords(t, n), (r, g, b));
                }
            }
        }
        // Red steps by one in the file, by n² in the table.
        assert_eq!(CUBE_FILE_ORDER.index(1, 0, 0, n), 1);
        assert_eq!(TABLE_ORDER.index(1, 0, 0, n), 16);
    }

    #[test]
    fn test_identity_table() {
        let lut = LutTable::identity(3).unwrap();
        assert_eq!(lut.len(), 27);
        assert_eq!(lut.get(0, 0, 0), [0.0, 0.0, 0.0]);
        assert_eq!(lut.get(2, 1, 0), [1.0, 0.5, 0.0]);
        assert_eq!(lut.get(2, 2, 2), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_single_entry_identity_is_black() {
        let lut = LutTable::identity(1).unwrap();
        assert_eq!(lut.samples(), &[[0.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_from_samples_validates() {
        assert!(matches!(
            LutTable::from_samples(0, vec![]),
            Err(ColorError::MissingOrInvalidSize { declared: 0 })
        ));
        let err = LutTable::from_samples(2, vec![[0.0; 3]; 7]).unwrap_err();
        assert_eq!(
            err,
            ColorError::SampleCountMismatch {
                size: 2,
                expected_values: 24,
                actual_values: 21,
                expected_triples: 8,
                actual_triples: 7,
            }
        );
    }

    #[test]
    fn test_oversized_lattice_rejected() {
        assert!(lattice_len(usize::MAX / 2).is_err());
    }

    #[test]
    #[should_panic]
    fn test_get_out_of_range_panics() {
        let lut = LutTable::identity(2).unwrap();
        lut.get(2, 0, 0);
    }

    #[test]
    fn test_try_get_bounds() {
        let lut = LutTable::identity(2).unwrap();
        assert_eq!(lut.try_get(1, 0, 1), Some([1.0, 0.0, 1.0]));
        assert_eq!(lut.try_get(1, 0, 1), Some(lut.get(1, 0, 1)));
        assert_eq!(lut.try_get(2, 0, 0), None);
        assert_eq!(lut.try_get(0, 0, usize::MAX), None);
    }
}

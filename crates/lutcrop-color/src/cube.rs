//! Adobe/Resolve `.cube` 3D LUT parsing and writing.
//!
//! # Format
//!
//! ```text
//! # Comment
//! TITLE "LUT Name"
//! LUT_3D_SIZE 33
//! DOMAIN_MIN 0.0 0.0 0.0
//! DOMAIN_MAX 1.0 1.0 1.0
//! 0.0 0.0 0.0
//! ...
//! 1.0 1.0 1.0
//! ```
//!
//! Keywords are matched case-insensitively as line prefixes. `TITLE` and the
//! `DOMAIN_*` lines are skipped without validation. Triples are listed with
//! red varying fastest and blue slowest.

use crate::blend::blend;
use crate::error::{ColorError, ColorResult};
use crate::lut::{lattice_len, LutTable, CUBE_FILE_ORDER, TABLE_ORDER};
use std::fmt::Write;
use tracing::debug;

const SKIP_PREFIXES: [&str; 4] = ["#", "TITLE", "DOMAIN_MIN", "DOMAIN_MAX"];
const SIZE_KEYWORD: &str = "LUT_3D_SIZE";

/// Classification of one line of a `.cube` file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedLine {
    /// Blank, comment or ignored metadata.
    Skip,
    /// `LUT_3D_SIZE` declaration.
    Size(i64),
    /// One RGB sample.
    Triple([f32; 3]),
}

impl ParsedLine {
    /// Classify a single line. `line_no` is 1-based and only used in errors.
    pub fn classify(line_no: usize, raw: &str) -> ColorResult<Self> {
        let line = raw.trim();
        if line.is_empty() || SKIP_PREFIXES.iter().any(|p| starts_with_ignore_case(line, p)) {
            return Ok(Self::Skip);
        }

        if starts_with_ignore_case(line, SIZE_KEYWORD) {
            // The last token wins: "LUT_3D_SIZE 33".
            let token = line.split_whitespace().last().unwrap_or(line);
            let size = token.parse::<i64>().map_err(|_| ColorError::MalformedNumber {
                line: line_no,
                token: token.to_string(),
            })?;
            return Ok(Self::Size(size));
        }

        let mut rgb = [0.0f32; 3];
        let mut tokens = line.split_whitespace();
        for (found, slot) in rgb.iter_mut().enumerate() {
            let token = tokens
                .next()
                .ok_or(ColorError::MalformedLine { line: line_no, found })?;
            *slot = parse_component(line_no, token)?;
        }
        Ok(Self::Triple(rgb))
    }
}

/// Parse `.cube` text into a table, blended toward identity by `intensity`.
///
/// `intensity` of `None` means full strength. Out-of-range intensities fail
/// before any line is read.
pub fn parse_cube(text: &str, intensity: Option<f32>) -> ColorResult<LutTable> {
    let intensity = validate_intensity(intensity)?;
    let table = parse_table(text)?;
    Ok(blend(&table, intensity))
}

/// Check an optional intensity, defaulting to `1.0`.
pub fn validate_intensity(intensity: Option<f32>) -> ColorResult<f32> {
    match intensity {
        None => Ok(1.0),
        Some(i) if (0.0..=1.0).contains(&i) => Ok(i),
        Some(i) => Err(ColorError::InvalidArgument(format!(
            "intensity must be between 0.0 and 1.0, got {i}"
        ))),
    }
}

/// Parse `.cube` text into an unblended table.
pub fn parse_table(text: &str) -> ColorResult<LutTable> {
    let mut declared: i64 = 0;
    let mut raw: Vec<[f32; 3]> = Vec::new();

    for (i, line) in text.lines().enumerate() {
        match ParsedLine::classify(i + 1, line)? {
            ParsedLine::Skip => {}
            ParsedLine::Size(size) => declared = size,
            ParsedLine::Triple(rgb) => raw.push(rgb),
        }
    }

    let size = usize::try_from(declared)
        .ok()
        .filter(|&s| s > 0)
        .ok_or(ColorError::MissingOrInvalidSize { declared })?;
    let expected = lattice_len(size)?;
    if raw.len() != expected {
        return Err(ColorError::sample_count_mismatch(
            size,
            expected * 3,
            raw.len() * 3,
        ));
    }

    let mut samples = vec![[0.0f32; 3]; expected];
    let mut file_idx = 0;
    for b in 0..size {
        for g in 0..size {
            for r in 0..size {
                debug_assert_eq!(file_idx, CUBE_FILE_ORDER.index(r, g, b, size));
                samples[TABLE_ORDER.index(r, g, b, size)] = raw[file_idx];
                file_idx += 1;
            }
        }
    }

    debug!(size, triples = expected, "Parsed .cube LUT");
    LutTable::from_samples(size, samples)
}

/// Serialize a table back to `.cube` text in file order.
pub fn write_cube(table: &LutTable, title: Option<&str>) -> String {
    let size = table.size();
    let mut out = String::with_capacity(table.len() * 30 + 64);
    if let Some(title) = title {
        let _ = writeln!(out, "TITLE \"{}\"", title.replace('"', "'"));
    }
    let _ = writeln!(out, "LUT_3D_SIZE {size}");
    for b in 0..size {
        for g in 0..size {
            for r in 0..size {
                let [cr, cg, cb] = table.get(r, g, b);
                let _ = writeln!(out, "{cr:.6} {cg:.6} {cb:.6}");
            }
        }
    }
    out
}

fn parse_component(line_no: usize, token: &str) -> ColorResult<f32> {
    token
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ColorError::MalformedNumber {
            line: line_no,
            token: token.to_string(),
        })
}

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

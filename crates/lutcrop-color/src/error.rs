//! Color subsystem errors.

use lutcrop_core::{ErrorCode, TransformError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("LUT_3D_SIZE not found or is invalid (declared {declared})")]
    MissingOrInvalidSize { declared: i64 },

    #[error(
        "Sample count mismatch for LUT size {size}: expected {expected_values}, got {actual_values} \
         component values ({actual_triples} RGB triplets found, {expected_triples} expected)"
    )]
    SampleCountMismatch {
        size: usize,
        expected_values: usize,
        actual_values: usize,
        expected_triples: usize,
        actual_triples: usize,
    },

    #[error("Line {line}: malformed number '{token}'")]
    MalformedNumber { line: usize, token: String },

    #[error("Line {line}: expected 3 color components, found {found}")]
    MalformedLine { line: usize, found: usize },
}

impl ColorError {
    /// Build a count mismatch from raw component counts.
    pub fn sample_count_mismatch(size: usize, expected_values: usize, actual_values: usize) -> Self {
        Self::SampleCountMismatch {
            size,
            expected_values,
            actual_values,
            expected_triples: expected_values / 3,
            actual_triples: actual_values / 3,
        }
    }

    /// Stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::MissingOrInvalidSize { .. } => ErrorCode::MissingOrInvalidSize,
            Self::SampleCountMismatch { .. } => ErrorCode::SampleCountMismatch,
            Self::MalformedNumber { .. } => ErrorCode::MalformedNumber,
            Self::MalformedLine { .. } => ErrorCode::MalformedLine,
        }
    }
}

impl From<ColorError> for TransformError {
    fn from(err: ColorError) -> Self {
        TransformError::from_error(err.code(), &err)
    }
}

/// Result type alias for color operations.
pub type ColorResult<T> = std::result::Result<T, ColorError>;

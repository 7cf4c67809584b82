//! Error types and stable error codes for LutCrop.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable, machine-readable error codes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidArgument,
    MissingOrInvalidSize,
    SampleCountMismatch,
    MalformedNumber,
    MalformedLine,
    InvalidDimensions,
    AssetNotFound,
    IoFailure,
    ProbeFailed,
    ExportFailed,
    ExportCancelled,
}

impl ErrorCode {
    /// The wire representation of this code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::MissingOrInvalidSize => "MISSING_OR_INVALID_SIZE",
            Self::SampleCountMismatch => "SAMPLE_COUNT_MISMATCH",
            Self::MalformedNumber => "MALFORMED_NUMBER",
            Self::MalformedLine => "MALFORMED_LINE",
            Self::InvalidDimensions => "INVALID_DIMENSIONS",
            Self::AssetNotFound => "ASSET_NOT_FOUND",
            Self::IoFailure => "IO_FAILURE",
            Self::ProbeFailed => "PROBE_FAILED",
            Self::ExportFailed => "EXPORT_FAILED",
            Self::ExportCancelled => "EXPORT_CANCELLED",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the core geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CoreError {
    /// Stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidDimensions { .. } => ErrorCode::InvalidDimensions,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
        }
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Caller-facing error: a stable code, a human-readable message and an
/// optional diagnostic payload that never drives control flow.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct TransformError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl TransformError {
    /// Create an error without diagnostics.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach a diagnostic payload.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Build from any error, recording its source chain as diagnostics.
    pub fn from_error(code: ErrorCode, err: &(dyn std::error::Error + 'static)) -> Self {
        let mut chain = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        let mut out = Self::new(code, err.to_string());
        if !chain.is_empty() {
            out.details = Some(chain.join("\ncaused by: "));
        }
        out
    }
}

impl From<CoreError> for TransformError {
    fn from(err: CoreError) -> Self {
        Self::from_error(err.code(), &err)
    }
}

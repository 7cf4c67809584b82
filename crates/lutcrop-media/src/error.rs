//! Media subsystem errors.

use lutcrop_color::ColorError;
use lutcrop_core::{CoreError, ErrorCode, TransformError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Probe failed: {0}")]
    Probe(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Export cancelled")]
    Cancelled,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Color(#[from] ColorError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl MediaError {
    /// Stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::AssetNotFound(_) => ErrorCode::AssetNotFound,
            Self::Io(_) => ErrorCode::IoFailure,
            Self::Probe(_) => ErrorCode::ProbeFailed,
            Self::Export(_) => ErrorCode::ExportFailed,
            Self::Cancelled => ErrorCode::ExportCancelled,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Color(e) => e.code(),
            Self::Core(e) => e.code(),
        }
    }
}

impl From<MediaError> for TransformError {
    fn from(err: MediaError) -> Self {
        TransformError::from_error(err.code(), &err)
    }
}

/// Result type alias for media operations.
pub type MediaResult<T> = std::result::Result<T, MediaError>;

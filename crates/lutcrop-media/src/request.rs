//! Caller-facing request and event shapes.

use lutcrop_core::TransformError;
use serde::{Deserialize, Serialize};

use crate::error::{MediaError, MediaResult};

/// A request to grade and square-crop one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformRequest {
    /// Source video path.
    pub input_path: String,
    /// Asset key of the `.cube` LUT; no LUT when absent.
    #[serde(default)]
    pub lut_asset: Option<String>,
    /// LUT strength in `[0, 1]`; full strength when absent.
    #[serde(default)]
    pub lut_intensity: Option<f64>,
    #[serde(default)]
    pub flip_horizontally: bool,
    /// Output square side; the smaller source dimension when absent.
    #[serde(default)]
    pub crop_square_size: Option<i64>,
    /// Where to write the result; a generated file in the output directory
    /// when absent.
    #[serde(default)]
    pub output_path: Option<String>,
}

impl TransformRequest {
    pub fn new(input_path: impl Into<String>) -> Self {
        Self {
            input_path: input_path.into(),
            lut_asset: None,
            lut_intensity: None,
            flip_horizontally: false,
            crop_square_size: None,
            output_path: None,
        }
    }

    pub fn with_lut(mut self, asset: impl Into<String>) -> Self {
        self.lut_asset = Some(asset.into());
        self
    }

    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.lut_intensity = Some(intensity);
        self
    }

    pub fn with_flip(mut self, flip: bool) -> Self {
        self.flip_horizontally = flip;
        self
    }

    pub fn with_crop_size(mut self, side: i64) -> Self {
        self.crop_square_size = Some(side);
        self
    }

    pub fn with_output(mut self, path: impl Into<String>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Check argument shapes that need no I/O. Returns the crop side.
    pub fn validate(&self) -> MediaResult<Option<u32>> {
        if self.input_path.trim().is_empty() {
            return Err(MediaError::InvalidArgument("inputPath is empty".into()));
        }
        if let Some(i) = self.lut_intensity {
            if !(0.0..=1.0).contains(&i) {
                return Err(MediaError::InvalidArgument(format!(
                    "lutIntensity must be between 0.0 and 1.0, got {i}"
                )));
            }
        }
        match self.crop_square_size {
            None => Ok(None),
            Some(side) => u32::try_from(side)
                .ok()
                .filter(|&s| s > 0)
                .map(Some)
                .ok_or_else(|| {
                    MediaError::InvalidArgument(format!(
                        "cropSquareSize must be a positive integer, got {side}"
                    ))
                }),
        }
    }
}

/// One item of the per-request event stream.
///
/// The stream carries `Progress` events and ends with exactly one
/// `Completed` or `Failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransformEvent {
    Completed {
        progress: f64,
        #[serde(rename = "outputPath")]
        output_path: String,
    },
    Failed(TransformError),
    Progress {
        progress: f64,
    },
}

impl TransformEvent {
    /// Successful completion at `output_path`.
    pub fn completed(output_path: impl Into<String>) -> Self {
        Self::Completed {
            progress: 1.0,
            output_path: output_path.into(),
        }
    }

    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }

    /// Progress carried by this event, if any.
    pub fn progress(&self) -> Option<f64> {
        match self {
            Self::Completed { progress, .. } | Self::Progress { progress } => Some(*progress),
            Self::Failed(_) => None,
        }
    }
}

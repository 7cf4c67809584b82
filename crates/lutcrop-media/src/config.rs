//! Transformer configuration.

use crate::error::{MediaError, MediaResult};
use crate::export::find_binary;
use crate::progress::ProgressEstimate;
use crate::request::TransformRequest;
use lutcrop_color::LutOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings shared by every request handled by one orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformerConfig {
    pub lut: LutOptions,
    /// Directory for generated output files.
    pub output_dir: PathBuf,
    /// How long a new request waits for the previous export to stop.
    pub cancel_timeout_ms: u64,
    pub progress: ProgressEstimate,
    /// `ffmpeg` executable; looked up on `PATH` when unset.
    pub ffmpeg: Option<PathBuf>,
    /// `ffprobe` executable; looked up on `PATH` when unset.
    pub ffprobe: Option<PathBuf>,
    /// FFmpeg video encoder.
    pub video_codec: String,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            lut: LutOptions::default(),
            output_dir: std::env::temp_dir(),
            cancel_timeout_ms: 5_000,
            progress: ProgressEstimate::default(),
            ffmpeg: None,
            ffprobe: None,
            video_codec: "libx264".into(),
        }
    }
}

impl TransformerConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> MediaResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| MediaError::InvalidArgument(format!("Invalid config: {e}")))
    }

    pub fn from_json_file(path: &Path) -> MediaResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn cancel_timeout(&self) -> Duration {
        Duration::from_millis(self.cancel_timeout_ms)
    }

    /// Where `request` will be written.
    pub fn output_path_for(&self, request: &TransformRequest) -> PathBuf {
        match request.output_path.as_deref() {
            Some(p) if !p.trim().is_empty() => PathBuf::from(p),
            _ => self
                .output_dir
                .join(format!("transformed_{}.mp4", uuid::Uuid::new_v4())),
        }
    }

    pub fn ffmpeg_binary(&self) -> PathBuf {
        resolve_binary(self.ffmpeg.as_deref(), "ffmpeg")
    }

    pub fn ffprobe_binary(&self) -> PathBuf {
        resolve_binary(self.ffprobe.as_deref(), "ffprobe")
    }
}

fn resolve_binary(configured: Option<&Path>, name: &str) -> PathBuf {
    configured
        .map(Path::to_path_buf)
        .or_else(|| find_binary(name))
        .unwrap_or_else(|| PathBuf::from(name))
}

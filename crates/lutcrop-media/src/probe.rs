//! Source video probing to get display dimensions without decoding.

use crate::error::{MediaError, MediaResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// What the crop geometry needs to know about a source video.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Display width, after applying rotation metadata.
    pub width: f64,
    /// Display height, after applying rotation metadata.
    pub height: f64,
    /// Duration in seconds, when the container reports one.
    pub duration_secs: Option<f64>,
}

/// Reads source video metadata.
pub trait SourceProbe: Send + Sync {
    fn probe(&self, input: &Path) -> MediaResult<SourceInfo>;
}

/// Probe backed by the `ffprobe` binary.
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    binary: PathBuf,
}

impl FfprobeProbe {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl SourceProbe for FfprobeProbe {
    fn probe(&self, input: &Path) -> MediaResult<SourceInfo> {
        if !input.exists() {
            return Err(MediaError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Input video not found: {}", input.display()),
            )));
        }

        let output = Command::new(&self.binary)
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=width,height:stream_tags=rotate:stream_side_data=rotation:format=duration",
                "-of",
                "json",
            ])
            .arg(input)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                MediaError::Probe(format!(
                    "Failed to run ffprobe ({}): {e}",
                    self.binary.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(stderr = %stderr, "ffprobe failed");
            return Err(MediaError::Probe(format!(
                "ffprobe exited with status {}: {}",
                output.status,
                stderr.chars().take(500).collect::<String>()
            )));
        }

        parse_ffprobe_json(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse `ffprobe -of json` output for the first video stream.
pub fn parse_ffprobe_json(json_str: &str) -> MediaResult<SourceInfo> {
    let value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| MediaError::Probe(format!("Failed to parse ffprobe JSON: {e}")))?;

    let stream = value
        .get("streams")
        .and_then(|v| v.as_array())
        .and_then(|streams| streams.first())
        .ok_or_else(|| MediaError::Probe("No video track found".to_string()))?;

    let width = stream.get("width").and_then(|v| v.as_f64());
    let height = stream.get("height").and_then(|v| v.as_f64());
    let (Some(width), Some(height)) = (width, height) else {
        return Err(MediaError::Probe(
            "Video stream has no dimensions".to_string(),
        ));
    };

    // Older muxers write a `rotate` tag, newer ones a display matrix.
    let rotation = stream
        .get("tags")
        .and_then(|t| t.get("rotate"))
        .and_then(|v| v.as_str())
        .and_then(|s| s.trim().parse::<i64>().ok())
        .or_else(|| {
            stream
                .get("side_data_list")
                .and_then(|v| v.as_array())
                .and_then(|list| {
                    list.iter()
                        .find_map(|sd| sd.get("rotation").and_then(|r| r.as_f64()))
                })
                .map(|r| r.round() as i64)
        })
        .unwrap_or(0);

    let (width, height) = if rotation.rem_euclid(180) == 90 {
        (height, width)
    } else {
        (width, height)
    };

    let duration_secs = value
        .get("format")
        .and_then(|f| f.get("duration"))
        .and_then(|d| {
            d.as_str()
                .and_then(|s| s.parse::<f64>().ok())
                .or_else(|| d.as_f64())
        })
        .filter(|d| d.is_finite() && *d > 0.0);

    debug!(width, height, rotation, ?duration_secs, "Probed source");
    Ok(SourceInfo {
        width,
        height,
        duration_secs,
    })
}

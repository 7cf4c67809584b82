//! Export pipeline: crop, flip and grade a source video into a new file.
//!
//! The production backend drives FFmpeg as a child process. Grading uses
//! FFmpeg's `lut3d` filter fed with a `.cube` rendition of the packed
//! sampler buffer, so the intensity blend and packing are already baked in.

use crate::error::{MediaError, MediaResult};
use crossbeam_channel::RecvTimeoutError;
use lutcrop_color::{write_cube, PreparedLut};
use lutcrop_core::CropGeometry;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Everything a backend needs to render one request.
#[derive(Debug, Clone)]
pub struct ExportPlan {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub geometry: CropGeometry,
    /// Blended and packed LUT; no grading when absent.
    pub lut: Option<PreparedLut>,
    /// Source duration, used to turn encoder timestamps into fractions.
    pub duration_secs: Option<f64>,
}

/// How an export ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    Completed,
    Cancelled,
}

/// Renders an [`ExportPlan`].
///
/// `progress` receives fractions in `[0, 1]` whenever the backend knows
/// them. Implementations poll `cancel` and return
/// [`ExportOutcome::Cancelled`] promptly once it is set.
pub trait ExportBackend: Send + Sync {
    fn export(
        &self,
        plan: &ExportPlan,
        progress: &dyn Fn(f64),
        cancel: &ExportCancel,
    ) -> MediaResult<ExportOutcome>;
}

/// Handle for cancelling an in-progress export.
#[derive(Debug, Clone)]
pub struct ExportCancel(Arc<AtomicBool>);

impl ExportCancel {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Signal cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for ExportCancel {
    fn default() -> Self {
        Self::new()
    }
}

/// Look up an executable on `PATH`.
pub fn find_binary(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Export backend that shells out to `ffmpeg`.
#[derive(Debug, Clone)]
pub struct FfmpegExport {
    binary: PathBuf,
    video_codec: String,
    scratch_dir: PathBuf,
}

/// How often the progress loop wakes up to check for cancellation.
const CANCEL_POLL: Duration = Duration::from_millis(50);

/// Upper bound on the stderr tail carried in errors.
const STDERR_TAIL: usize = 2000;

impl FfmpegExport {
    pub fn new(binary: impl Into<PathBuf>, video_codec: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            video_codec: video_codec.into(),
            scratch_dir: std::env::temp_dir(),
        }
    }

    /// Directory for the temporary `.cube` handed to FFmpeg.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    /// Video filter chain: crop first, then mirror, then grade.
    pub fn filter_chain(&self, geometry: &CropGeometry, lut_path: Option<&Path>) -> String {
        let mut filters = vec![format!(
            "crop={side}:{side}:{x}:{y}",
            side = geometry.side,
            x = geometry.offset_x,
            y = geometry.offset_y
        )];
        if geometry.flipped {
            filters.push("hflip".into());
        }
        if let Some(path) = lut_path {
            filters.push(format!(
                "lut3d=file='{}'",
                escape_filter_path(&path.to_string_lossy())
            ));
        }
        filters.join(",")
    }

    /// Build the FFmpeg command arguments.
    pub fn ffmpeg_args(&self, plan: &ExportPlan, lut_path: Option<&Path>) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-y".into(),
            "-i".into(),
            plan.input_path.to_string_lossy().into_owned(),
            "-vf".into(),
            self.filter_chain(&plan.geometry, lut_path),
            "-c:v".into(),
            self.video_codec.clone(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            "-c:a".into(),
            "copy".into(),
            "-progress".into(),
            "pipe:1".into(),
            "-nostats".into(),
        ];
        args.push(plan.output_path.to_string_lossy().into_owned());
        args
    }

    fn write_lut(&self, lut: &PreparedLut) -> MediaResult<ScratchFile> {
        std::fs::create_dir_all(&self.scratch_dir)?;
        let path = self
            .scratch_dir
            .join(format!("lutcrop_{}.cube", uuid::Uuid::new_v4()));
        // Render what the sampler buffer holds, so ARGB quantization and
        // clamping match the preview.
        let sampled = lut.packed.unpack()?;
        std::fs::write(&path, write_cube(&sampled, Some("lutcrop")))?;
        debug!(
            path = %path.display(),
            size = sampled.size(),
            mode = ?lut.packed.mode(),
            "Wrote scratch LUT"
        );
        Ok(ScratchFile(path))
    }
}

impl ExportBackend for FfmpegExport {
    fn export(
        &self,
        plan: &ExportPlan,
        progress: &dyn Fn(f64),
        cancel: &ExportCancel,
    ) -> MediaResult<ExportOutcome> {
        let scratch = plan.lut.as_ref().map(|l| self.write_lut(l)).transpose()?;
        let args = self.ffmpeg_args(plan, scratch.as_ref().map(|s| s.0.as_path()));
        info!(
            input = %plan.input_path.display(),
            output = %plan.output_path.display(),
            side = plan.geometry.side,
            flipped = plan.geometry.flipped,
            graded = scratch.is_some(),
            "Starting ffmpeg export"
        );

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                MediaError::Export(format!(
                    "Failed to spawn ffmpeg ({}): {e}",
                    self.binary.display()
                ))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| MediaError::Export("Failed to open ffmpeg stdout".into()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| MediaError::Export("Failed to open ffmpeg stderr".into()))?;

        // stderr must be drained or ffmpeg stalls once the pipe fills.
        let stderr_thread = std::thread::spawn(move || {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf);
            buf
        });

        let (line_tx, line_rx) = crossbeam_channel::unbounded::<String>();
        let stdout_thread = std::thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                let Ok(line) = line else { break };
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        });

        let duration_us = plan
            .duration_secs
            .filter(|d| d.is_finite() && *d > 0.0)
            .map(|d| d * 1_000_000.0);

        loop {
            if cancel.is_cancelled() {
                let _ = child.kill();
                let _ = child.wait();
                let _ = stdout_thread.join();
                let _ = stderr_thread.join();
                if let Err(e) = std::fs::remove_file(&plan.output_path) {
                    debug!(error = %e, "No partial output to remove");
                }
                info!(output = %plan.output_path.display(), "ffmpeg export cancelled");
                return Ok(ExportOutcome::Cancelled);
            }
            match line_rx.recv_timeout(CANCEL_POLL) {
                Ok(line) => match parse_progress_line(&line) {
                    Some(ProgressLine::OutTimeUs(us)) => {
                        if let Some(total) = duration_us {
                            progress((us / total).clamp(0.0, 1.0));
                        }
                    }
                    Some(ProgressLine::End) => progress(1.0),
                    None => {}
                },
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        let status = child
            .wait()
            .map_err(|e| MediaError::Export(format!("Failed to wait for ffmpeg: {e}")))?;
        let _ = stdout_thread.join();
        let stderr_text = stderr_thread.join().unwrap_or_default();

        if !status.success() {
            warn!(%status, "ffmpeg failed");
            return Err(MediaError::Export(format!(
                "ffmpeg exited with status {status}: {}",
                tail(&stderr_text, STDERR_TAIL)
            )));
        }

        info!(output = %plan.output_path.display(), "ffmpeg export finished");
        Ok(ExportOutcome::Completed)
    }
}

/// One meaningful line of `-progress` output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressLine {
    /// Encoded timestamp in microseconds.
    OutTimeUs(f64),
    End,
}

/// Parse a `key=value` line from FFmpeg's `-progress` stream.
///
/// `out_time_ms` is reported in microseconds as well, despite its name.
pub fn parse_progress_line(line: &str) -> Option<ProgressLine> {
    let (key, value) = line.trim().split_once('=')?;
    match key {
        "out_time_us" | "out_time_ms" => value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(ProgressLine::OutTimeUs),
        "progress" if value.trim() == "end" => Some(ProgressLine::End),
        _ => None,
    }
}

/// Escape a path for use inside a single-quoted filtergraph argument.
fn escape_filter_path(path: &str) -> String {
    path.replace('\\', "/").replace('\'', r"'\''")
}

fn tail(text: &str, max_chars: usize) -> &str {
    let count = text.chars().count();
    if count <= max_chars {
        return text;
    }
    let skip = count - max_chars;
    let start = text.char_indices().nth(skip).map_or(0, |(i, _)| i);
    &text[start..]
}

/// Temporary file removed on drop.
struct ScratchFile(PathBuf);

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.0) {
            warn!(path = %self.0.display(), error = %e, "Failed to remove scratch LUT");
        }
    }
}

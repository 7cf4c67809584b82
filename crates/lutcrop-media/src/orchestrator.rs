//! Per-request orchestration: LUT preparation, crop geometry and export.
//!
//! Everything that can fail cheaply (request shape, LUT parsing, probing,
//! geometry) runs on the caller's thread before the backend is touched.
//! The export itself runs on a worker thread and reports through a
//! channel of [`TransformEvent`]s.

use crate::asset::{AssetSource, FsAssetSource};
use crate::config::TransformerConfig;
use crate::error::{MediaError, MediaResult};
use crate::export::{ExportBackend, ExportCancel, ExportOutcome, ExportPlan, FfmpegExport};
use crate::probe::{FfprobeProbe, SourceProbe};
use crate::progress::ProgressSink;
use crate::request::{TransformEvent, TransformRequest};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use lutcrop_color::LutPipeline;
use lutcrop_core::{CropGeometry, TransformError};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Cancellation token for one running export.
#[derive(Debug, Clone)]
pub struct TransformHandle {
    id: Uuid,
    cancel: ExportCancel,
    done: Receiver<()>,
}

impl TransformHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Ask the export to stop. Returns immediately.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether the worker has exited.
    pub fn is_finished(&self) -> bool {
        matches!(self.done.try_recv(), Ok(()) | Err(TryRecvError::Disconnected))
    }

    /// Block until the worker exits or `timeout` elapses. Returns whether
    /// the worker exited.
    pub fn wait(&self, timeout: Duration) -> bool {
        !matches!(self.done.recv_timeout(timeout), Err(RecvTimeoutError::Timeout))
    }
}

/// A started transform.
#[derive(Debug)]
pub struct TransformSession {
    pub handle: TransformHandle,
    /// Progress events, ending with exactly one terminal event.
    pub events: Receiver<TransformEvent>,
    pub output_path: PathBuf,
    pub geometry: CropGeometry,
}

impl TransformSession {
    /// Drain events until the terminal one, forwarding progress.
    pub fn join(self, mut on_progress: impl FnMut(f64)) -> Result<PathBuf, TransformError> {
        for event in self.events.iter() {
            match event {
                TransformEvent::Progress { progress } => on_progress(progress),
                TransformEvent::Completed { output_path, .. } => {
                    on_progress(1.0);
                    return Ok(PathBuf::from(output_path));
                }
                TransformEvent::Failed(err) => return Err(err),
            }
        }
        Err(MediaError::Export("export worker exited without a result".into()).into())
    }
}

/// Runs one export at a time.
pub struct TransformOrchestrator {
    config: TransformerConfig,
    pipeline: LutPipeline,
    assets: Arc<dyn AssetSource>,
    probe: Arc<dyn SourceProbe>,
    backend: Arc<dyn ExportBackend>,
    current: Mutex<Option<TransformHandle>>,
}

impl TransformOrchestrator {
    pub fn new(
        config: TransformerConfig,
        assets: Arc<dyn AssetSource>,
        probe: Arc<dyn SourceProbe>,
        backend: Arc<dyn ExportBackend>,
    ) -> Self {
        Self {
            pipeline: LutPipeline::new(config.lut),
            config,
            assets,
            probe,
            backend,
            current: Mutex::new(None),
        }
    }

    /// Orchestrator backed by `ffprobe`/`ffmpeg`, reading LUTs under
    /// `asset_root`.
    pub fn with_ffmpeg(config: TransformerConfig, asset_root: impl Into<PathBuf>) -> Self {
        let probe = FfprobeProbe::new(config.ffprobe_binary());
        let backend = FfmpegExport::new(config.ffmpeg_binary(), config.video_codec.clone());
        Self::new(
            config,
            Arc::new(FsAssetSource::new(asset_root)),
            Arc::new(probe),
            Arc::new(backend),
        )
    }

    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }

    /// Handle of the most recently started export, if any.
    pub fn current(&self) -> Option<TransformHandle> {
        self.current.lock().clone()
    }

    /// Cancel the running export. Returns whether one was still running.
    pub fn cancel(&self) -> bool {
        match self.current.lock().as_ref() {
            Some(handle) if !handle.is_finished() => {
                info!(id = %handle.id(), "Cancelling export");
                handle.cancel();
                true
            }
            _ => false,
        }
    }

    /// Start a transform, failing fast on anything detectable before export.
    pub fn start(&self, request: &TransformRequest) -> Result<TransformSession, TransformError> {
        self.start_inner(request).map_err(|e| {
            warn!(code = %e.code(), error = %e, "Transform setup failed");
            TransformError::from(e)
        })
    }

    /// Start a transform and return its event stream. Setup failures arrive
    /// as a single `Failed` event.
    pub fn submit(&self, request: &TransformRequest) -> Receiver<TransformEvent> {
        match self.start(request) {
            Ok(session) => session.events,
            Err(err) => {
                let (tx, rx) = crossbeam_channel::bounded(1);
                let _ = tx.send(TransformEvent::Failed(err));
                rx
            }
        }
    }

    fn start_inner(&self, request: &TransformRequest) -> MediaResult<TransformSession> {
        let requested_side = request.validate()?;

        let (done_tx, done) = crossbeam_channel::bounded::<()>(1);
        let handle = TransformHandle {
            id: Uuid::new_v4(),
            cancel: ExportCancel::new(),
            done,
        };

        // Claim the slot up front so `cancel` reaches a request still in
        // setup. The lock is never held across setup or export.
        let previous = self.current.lock().replace(handle.clone());
        if let Some(previous) = previous {
            self.stop_previous(&previous);
        }

        let (tx, events) = crossbeam_channel::unbounded();
        let sink = Arc::new(ProgressSink::new(tx));
        sink.report(0.0);

        let plan = self
            .plan_export(request, requested_side, &handle)
            .and_then(|plan| {
                ensure_live(&handle)?;
                Ok(plan)
            });
        let plan = match plan {
            Ok(plan) => plan,
            Err(e) => {
                self.release(&handle);
                return Err(e);
            }
        };
        let output_path = plan.output_path.clone();
        let geometry = plan.geometry;

        if let Err(e) = self.spawn_export(plan, sink, &handle, done_tx) {
            self.release(&handle);
            return Err(e);
        }
        info!(
            id = %handle.id(),
            input = %request.input_path,
            output = %output_path.display(),
            side = geometry.side,
            flipped = geometry.flipped,
            "Transform started"
        );

        Ok(TransformSession {
            handle,
            events,
            output_path,
            geometry,
        })
    }

    /// LUT, source info and geometry for one request, checking for cancellation
    /// between the slow steps.
    fn plan_export(
        &self,
        request: &TransformRequest,
        requested_side: Option<u32>,
        handle: &TransformHandle,
    ) -> MediaResult<ExportPlan> {
        let lut = match request.lut_asset.as_deref() {
            Some(key) => {
                let text = self.assets.read_text(key)?;
                let intensity = request.lut_intensity.map(|i| i as f32);
                Some(self.pipeline.prepare(&text, intensity)?)
            }
            None => {
                if request.lut_intensity.is_some() {
                    debug!("Intensity given without a LUT, ignoring");
                }
                None
            }
        };
        ensure_live(handle)?;

        let input_path = PathBuf::from(&request.input_path);
        let source = self.probe.probe(&input_path)?;
        let geometry = CropGeometry::compute(
            source.width,
            source.height,
            requested_side,
            request.flip_horizontally,
        )?;

        Ok(ExportPlan {
            input_path,
            output_path: self.config.output_path_for(request),
            geometry,
            lut,
            duration_secs: source.duration_secs,
        })
    }

    /// Clear the slot if it still belongs to `handle`.
    fn release(&self, handle: &TransformHandle) {
        let mut current = self.current.lock();
        if current.as_ref().is_some_and(|h| h.id == handle.id) {
            *current = None;
        }
    }

    fn stop_previous(&self, previous: &TransformHandle) {
        if previous.is_finished() {
            return;
        }
        previous.cancel();
        let timeout = self.config.cancel_timeout();
        if previous.wait(timeout) {
            debug!(id = %previous.id(), "Previous export stopped");
        } else {
            warn!(
                id = %previous.id(),
                timeout_ms = timeout.as_millis() as u64,
                "Previous export did not stop in time, starting anyway"
            );
        }
    }

    fn spawn_export(
        &self,
        plan: ExportPlan,
        sink: Arc<ProgressSink>,
        handle: &TransformHandle,
        done_tx: Sender<()>,
    ) -> MediaResult<()> {
        let id = handle.id;
        let backend = Arc::clone(&self.backend);
        let estimate = self.config.progress;
        let worker_cancel = handle.cancel.clone();

        std::thread::Builder::new()
            .name(format!("lutcrop-export-{id}"))
            .spawn(move || {
                let _done = done_tx;
                sink.report(estimate.start);

                let real_progress = Arc::new(AtomicBool::new(false));
                let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(0);
                let ticker = {
                    let sink = Arc::clone(&sink);
                    let real_progress = Arc::clone(&real_progress);
                    std::thread::spawn(move || {
                        let begun = Instant::now();
                        while let Err(RecvTimeoutError::Timeout) =
                            stop_rx.recv_timeout(estimate.interval())
                        {
                            if !real_progress.load(Ordering::Acquire) {
                                sink.report(estimate.at(begun.elapsed()));
                            }
                        }
                    })
                };

                let on_progress = |fraction: f64| {
                    real_progress.store(true, Ordering::Release);
                    sink.report(fraction);
                };
                let result = backend.export(&plan, &on_progress, &worker_cancel);
                drop(stop_tx);
                let _ = ticker.join();

                match result {
                    Ok(ExportOutcome::Completed) => {
                        info!(%id, output = %plan.output_path.display(), "Transform completed");
                        sink.finish(TransformEvent::completed(path_string(&plan.output_path)));
                    }
                    Ok(ExportOutcome::Cancelled) => {
                        info!(%id, "Transform cancelled");
                        sink.finish(TransformEvent::Failed(MediaError::Cancelled.into()));
                    }
                    Err(e) => {
                        error!(%id, error = %e, "Transform failed");
                        sink.finish(TransformEvent::Failed(e.into()));
                    }
                }
            })?;
        Ok(())
    }
}

fn ensure_live(handle: &TransformHandle) -> MediaResult<()> {
    if handle.is_cancelled() {
        debug!(id = %handle.id(), "Cancelled during setup");
        return Err(MediaError::Cancelled);
    }
    Ok(())
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

//! LutCrop Media - Export orchestration around FFmpeg
//!
//! This crate handles:
//! - Reading `.cube` assets
//! - Source probing
//! - Export planning and the FFmpeg backend
//! - Progress, cancellation and the per-request event stream

pub mod asset;
pub mod config;
pub mod error;
pub mod export;
pub mod orchestrator;
pub mod probe;
pub mod progress;
pub mod request;

pub use asset::{AssetSource, FsAssetSource, MemoryAssetSource};
pub use config::TransformerConfig;
pub use error::{MediaError, MediaResult};
pub use export::{
    find_binary, ExportBackend, ExportCancel, ExportOutcome, ExportPlan, FfmpegExport,
};
pub use orchestrator::{TransformHandle, TransformOrchestrator, TransformSession};
pub use probe::{FfprobeProbe, SourceInfo, SourceProbe};
pub use progress::{ProgressEstimate, ProgressSink, MAX_IN_FLIGHT_PROGRESS};
pub use request::{TransformEvent, TransformRequest};

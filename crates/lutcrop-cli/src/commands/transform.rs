//! Video transform command

use crate::TransformArgs;
use anyhow::{Context, Result};
use lutcrop_media::{TransformOrchestrator, TransformRequest, TransformerConfig};
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run(args: TransformArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => TransformerConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TransformerConfig::default(),
    };

    // The LUT's directory becomes the asset root and its file name the key.
    let (asset_root, lut_key) = match &args.lut {
        Some(lut) => {
            let root = lut
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            let key = lut
                .file_name()
                .with_context(|| format!("Not a file: {}", lut.display()))?
                .to_string_lossy()
                .into_owned();
            (root, Some(key))
        }
        None => (PathBuf::from("."), None),
    };

    let mut request = TransformRequest::new(args.input.to_string_lossy()).with_flip(args.flip);
    request.lut_asset = lut_key;
    request.lut_intensity = args.intensity;
    request.crop_square_size = args.crop;
    request.output_path = args.output.map(|p| p.to_string_lossy().into_owned());

    let orchestrator = TransformOrchestrator::with_ffmpeg(config, asset_root);
    let session = orchestrator.start(&request)?;
    info!(
        side = session.geometry.side,
        offset_x = session.geometry.offset_x,
        offset_y = session.geometry.offset_y,
        output = %session.output_path.display(),
        "Rendering"
    );

    let mut last_pct = None;
    let output = session.join(|progress| {
        let pct = (progress * 100.0).floor() as u32;
        if last_pct != Some(pct) {
            last_pct = Some(pct);
            info!("{pct:>3}%");
        }
    })?;

    println!("{}", output.display());
    Ok(())
}

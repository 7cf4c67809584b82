//! Crop geometry command

use crate::GeometryArgs;
use anyhow::Result;
use lutcrop_core::{CropGeometry, TransformError};

pub fn run(args: GeometryArgs) -> Result<()> {
    let geometry = CropGeometry::compute(args.width, args.height, args.side, args.flip)
        .map_err(TransformError::from)?;

    let value = serde_json::json!({
        "geometry": geometry,
        "cropRect": geometry.crop_rect(),
        "renderRect": geometry.render_rect(),
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

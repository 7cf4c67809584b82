//! LUT packing command

use crate::PackArgs;
use anyhow::{Context, Result};
use lutcrop_color::{LutOptions, LutPipeline, PackedSamples};
use tracing::info;

pub fn run(args: PackArgs) -> Result<()> {
    let text = super::read_lut(&args.lut)?;
    let pipeline = LutPipeline::new(LutOptions {
        intensity_enabled: true,
        packing_mode: args.mode.into(),
    });
    let prepared = pipeline
        .prepare(&text, args.intensity)
        .with_context(|| format!("Invalid LUT {}", args.lut.display()))?;
    let packed = &prepared.packed;

    println!("{}", args.lut.display());
    println!("  dimension: {}", packed.dimension);
    println!("  mode:      {:?}", packed.mode());
    println!("  intensity: {}", prepared.intensity);
    println!("  samples:   {}", packed.sample_count());
    println!("  bytes:     {}", packed.as_bytes().len());

    let shown = args.show.min(packed.sample_count());
    for i in 0..shown {
        match &packed.samples {
            PackedSamples::Argb(words) => println!("    [{i}] 0x{:08X}", words[i]),
            PackedSamples::Rgba(floats) => {
                let c = &floats[i * 4..i * 4 + 4];
                println!("    [{i}] {:.6} {:.6} {:.6} {:.1}", c[0], c[1], c[2], c[3]);
            }
        }
    }

    if let Some(path) = &args.raw {
        std::fs::write(path, packed.as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), bytes = packed.as_bytes().len(), "Wrote sampler buffer");
    }
    Ok(())
}

//! LUT inspection command

use crate::InspectArgs;
use anyhow::{Context, Result};
use lutcrop_color::parse_table;

pub fn run(args: InspectArgs) -> Result<()> {
    let text = super::read_lut(&args.lut)?;
    let table =
        parse_table(&text).with_context(|| format!("Invalid LUT {}", args.lut.display()))?;

    let n = table.size();
    let last = n - 1;
    println!("{}", args.lut.display());
    println!("  size:    {n}");
    println!("  samples: {}", table.len());
    println!("  corners (r g b -> value):");
    for (r, g, b) in [
        (0, 0, 0),
        (last, 0, 0),
        (0, last, 0),
        (0, 0, last),
        (last, last, 0),
        (last, 0, last),
        (0, last, last),
        (last, last, last),
    ] {
        println!(
            "    {r:>3} {g:>3} {b:>3} -> {}",
            super::format_rgb(table.get(r, g, b))
        );
    }
    Ok(())
}

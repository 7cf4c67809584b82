//! LutCrop Color - `.cube` LUT ingestion and sampler table construction

pub mod blend;
pub mod cube;
pub mod error;
pub mod lut;
pub mod pack;
pub mod pipeline;

pub use blend::blend;
pub use cube::{parse_cube, parse_table, validate_intensity, write_cube, ParsedLine};
pub use error::{ColorError, ColorResult};
pub use lut::{identity_value, LatticeOrder, LutTable, CUBE_FILE_ORDER, TABLE_ORDER};
pub use pack::{pack, pack_argb, quantize_channel, PackedLut, PackedSamples, PackingMode};
pub use pipeline::{LutOptions, LutPipeline, PreparedLut};

//! Integration tests for LUT parsing, blending and packing.

use lutcrop_color::{
    blend, pack, parse_cube, parse_table, write_cube, ColorError, LutOptions, LutPipeline,
    LutTable, PackedSamples, PackingMode,
};
use lutcrop_core::{ErrorCode, TransformError};

const PRIMARIES_2: &str = "TITLE \"primaries\"
LUT_3D_SIZE 2
0 0 0
1 0 0
0 1 0
1 1 0
0 0 1
1 0 1
0 1 1
1 1 1
";

fn argb_words(table: &LutTable) -> Vec<u32> {
    match pack(table, PackingMode::IntegerArgb).samples {
        PackedSamples::Argb(words) => words,
        PackedSamples::Rgba(_) => unreachable!(),
    }
}

#[test]
fn primaries_cube_packs_to_expected_colors() {
    let table = parse_cube(PRIMARIES_2, None).unwrap();
    assert_eq!(table.size(), 2);
    assert_eq!(table.len(), 8);

    let words = argb_words(&table);
    let at = |r: usize, g: usize, b: usize| words[b + 2 * (g + 2 * r)];
    assert_eq!(at(0, 0, 0), 0xFF00_0000);
    assert_eq!(at(1, 0, 0), 0xFFFF_0000);
    assert_eq!(at(0, 1, 0), 0xFF00_FF00);
    assert_eq!(at(0, 0, 1), 0xFF00_00FF);
    assert_eq!(at(1, 1, 1), 0xFFFF_FFFF);
}

#[test]
fn short_cube_reports_component_counts() {
    let err = parse_cube("LUT_3D_SIZE 2\n0 0 0\n1 1 1\n", None).unwrap_err();
    assert!(matches!(
        err,
        ColorError::SampleCountMismatch {
            expected_triples: 8,
            actual_triples: 2,
            ..
        }
    ));
    let msg = err.to_string();
    assert!(msg.contains("expected 24, got 6"), "{msg}");

    let wire = TransformError::from(err);
    assert_eq!(wire.code, ErrorCode::SampleCountMismatch);
}

#[test]
fn missing_size_is_reported_even_with_good_data() {
    let text = PRIMARIES_2.replace("LUT_3D_SIZE 2\n", "");
    let err = parse_cube(&text, None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::MissingOrInvalidSize);
}

#[test]
fn intensity_is_checked_before_parsing() {
    // Garbage text, but the intensity error wins.
    let err = parse_cube("not a cube", Some(2.0)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
}

#[test]
fn zero_intensity_collapses_to_identity() {
    let inverted = "LUT_3D_SIZE 2
1 1 1
0 1 1
1 0 1
0 0 1
1 1 0
0 1 0
1 0 0
0 0 0
";
    let table = parse_cube(inverted, Some(0.0)).unwrap();
    assert_eq!(table, LutTable::identity(2).unwrap());
}

#[test]
fn full_intensity_is_a_no_op() {
    let table = parse_table(PRIMARIES_2).unwrap();
    assert_eq!(blend(&table, 1.0), table);
    assert_eq!(parse_cube(PRIMARIES_2, Some(1.0)).unwrap(), table);
}

#[test]
fn written_cube_parses_back_to_same_table() {
    let table = parse_cube(PRIMARIES_2, Some(0.25)).unwrap();
    let text = write_cube(&table, Some("blended"));
    let reparsed = parse_table(&text).unwrap();
    for (a, b) in table.samples().iter().zip(reparsed.samples()) {
        for c in 0..3 {
            assert!((a[c] - b[c]).abs() < 1e-6);
        }
    }
}

#[test]
fn pipeline_float_mode_matches_table_order() {
    let pipeline = LutPipeline::new(LutOptions {
        intensity_enabled: true,
        packing_mode: PackingMode::FloatRgba,
    });
    let prepared = pipeline.prepare(PRIMARIES_2, None).unwrap();
    let packed = &prepared.packed;
    assert_eq!(packed.dimension, 2);
    assert_eq!(packed.sample_count(), 8);
    assert_eq!(packed.as_bytes().len(), 8 * 4 * 4);
    // Index 4 is (r=1, g=0, b=0) with blue fastest.
    assert_eq!(packed.rgb_at(4), Some([1.0, 0.0, 0.0]));
    assert_eq!(packed.rgb_at(1), Some([0.0, 0.0, 1.0]));
}

#[test]
fn pipeline_without_intensity_ignores_request() {
    let pipeline = LutPipeline::new(LutOptions {
        intensity_enabled: false,
        packing_mode: PackingMode::IntegerArgb,
    });
    let prepared = pipeline.prepare(PRIMARIES_2, Some(0.0)).unwrap();
    assert_eq!(prepared.intensity, 1.0);
    assert_eq!(prepared.table, parse_table(PRIMARIES_2).unwrap());
}

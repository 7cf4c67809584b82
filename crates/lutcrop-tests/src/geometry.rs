//! Integration tests for square-crop geometry.

use lutcrop_core::{CropGeometry, ErrorCode, TransformError, Vec2};

#[test]
fn landscape_hd_crops_center_square() {
    let geo = CropGeometry::compute(1920.0, 1080.0, None, false).unwrap();
    assert_eq!(geo.side, 1080);
    assert_eq!((geo.offset_x, geo.offset_y), (420.0, 0.0));

    let rect = geo.crop_rect();
    assert_eq!((rect.x, rect.y, rect.width, rect.height), (420.0, 0.0, 1080.0, 1080.0));
    assert_eq!(geo.map_point(Vec2::new(420.0, 0.0)), Vec2::new(0.0, 0.0));
}

#[test]
fn portrait_source_offsets_vertically() {
    let geo = CropGeometry::compute(720.0, 1280.0, Some(600), false).unwrap();
    assert_eq!(geo.side, 600);
    assert_eq!((geo.offset_x, geo.offset_y), (60.0, 340.0));
}

#[test]
fn flip_mirrors_inside_output_square() {
    let plain = CropGeometry::compute(1920.0, 1080.0, None, false).unwrap();
    let flipped = CropGeometry::compute(1920.0, 1080.0, None, true).unwrap();
    for x in [420.0, 500.0, 960.0, 1499.5] {
        let p = Vec2::new(x, 100.0);
        let a = plain.map_point(p);
        let b = flipped.map_point(p);
        assert!((b.x - (1080.0 - a.x)).abs() < 1e-9);
        assert_eq!(a.y, b.y);
    }
}

#[test]
fn odd_difference_keeps_half_pixel() {
    let geo = CropGeometry::compute(1081.0, 1080.0, None, false).unwrap();
    assert_eq!(geo.offset_x, 0.5);
}

#[test]
fn geometry_json_is_camel_case() {
    let geo = CropGeometry::compute(1920.0, 1080.0, None, true).unwrap();
    let value = serde_json::to_value(geo).unwrap();
    assert_eq!(value["side"], 1080);
    assert_eq!(value["offsetX"], 420.0);
    assert_eq!(value["flipped"], true);
    let back: CropGeometry = serde_json::from_value(value).unwrap();
    assert_eq!(back, geo);
}

#[test]
fn degenerate_sources_fail_with_codes() {
    for (w, h) in [(0.0, 1080.0), (1920.0, -1.0), (f64::NAN, 10.0), (0.5, 0.5)] {
        let err = TransformError::from(CropGeometry::compute(w, h, None, false).unwrap_err());
        assert_eq!(err.code, ErrorCode::InvalidDimensions, "{w}x{h}");
    }
    let err = TransformError::from(CropGeometry::compute(100.0, 50.0, Some(51), false).unwrap_err());
    assert_eq!(err.code, ErrorCode::InvalidArgument);
}

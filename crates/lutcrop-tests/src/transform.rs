//! Integration tests for the transform orchestrator with on-disk assets.

use lutcrop_color::PackingMode;
use lutcrop_core::ErrorCode;
use lutcrop_media::{
    ExportBackend, ExportCancel, ExportOutcome, ExportPlan, FsAssetSource, MediaResult,
    SourceInfo, SourceProbe, TransformEvent, TransformOrchestrator, TransformRequest,
    TransformerConfig,
};
use std::path::Path;
use std::sync::{Arc, Mutex};

const WARM_CUBE: &str = "# warm
LUT_3D_SIZE 2
DOMAIN_MIN 0 0 0
DOMAIN_MAX 1 1 1
0.1 0 0
1 0 0
0.1 1 0
1 1 0
0.1 0 1
1 0 1
0.1 1 1
1 1 1
";

struct Landscape;

impl SourceProbe for Landscape {
    fn probe(&self, input: &Path) -> MediaResult<SourceInfo> {
        if !input.exists() {
            return Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no input").into());
        }
        Ok(SourceInfo {
            width: 1280.0,
            height: 720.0,
            duration_secs: Some(2.0),
        })
    }
}

/// Writes a marker file instead of encoding.
#[derive(Default)]
struct TouchBackend {
    plans: Mutex<Vec<ExportPlan>>,
}

impl ExportBackend for TouchBackend {
    fn export(
        &self,
        plan: &ExportPlan,
        progress: &dyn Fn(f64),
        _cancel: &ExportCancel,
    ) -> MediaResult<ExportOutcome> {
        progress(0.5);
        std::fs::write(&plan.output_path, b"video")?;
        progress(1.0);
        self.plans.lock().unwrap().push(plan.clone());
        Ok(ExportOutcome::Completed)
    }
}

struct Fixture {
    dir: tempfile::TempDir,
    backend: Arc<TouchBackend>,
    orchestrator: TransformOrchestrator,
}

fn fixture(config_json: &str) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("luts")).unwrap();
    std::fs::create_dir(dir.path().join("out")).unwrap();
    std::fs::write(dir.path().join("luts/warm.cube"), WARM_CUBE).unwrap();
    std::fs::write(dir.path().join("in.mp4"), b"source").unwrap();

    let mut config = TransformerConfig::from_json_str(config_json).unwrap();
    config.output_dir = dir.path().join("out");

    let backend = Arc::new(TouchBackend::default());
    let orchestrator = TransformOrchestrator::new(
        config,
        Arc::new(FsAssetSource::new(dir.path().join("luts"))),
        Arc::new(Landscape),
        backend.clone(),
    );
    Fixture {
        dir,
        backend,
        orchestrator,
    }
}

fn input(f: &Fixture) -> String {
    f.dir.path().join("in.mp4").to_string_lossy().into_owned()
}

#[test]
fn request_json_drives_full_transform() {
    let f = fixture("{}");
    let json = serde_json::json!({
        "inputPath": input(&f),
        "lutAsset": "warm.cube",
        "flipHorizontally": true,
        "lutIntensity": 0.5,
    });
    let request: TransformRequest = serde_json::from_value(json).unwrap();

    let events: Vec<_> = f.orchestrator.submit(&request).iter().collect();
    let last = events.last().unwrap();
    let TransformEvent::Completed {
        progress,
        output_path,
    } = last
    else {
        panic!("unexpected terminal event {last:?}");
    };
    assert_eq!(*progress, 1.0);
    assert!(Path::new(output_path).starts_with(f.dir.path().join("out")));
    assert!(Path::new(output_path).exists());

    let wire = serde_json::to_value(last).unwrap();
    assert_eq!(wire["outputPath"], output_path.as_str());

    let plans = f.backend.plans.lock().unwrap();
    let plan = &plans[0];
    assert_eq!(plan.geometry.side, 720);
    assert_eq!(plan.geometry.offset_x, 280.0);
    assert!(plan.geometry.flipped);

    // Red at the black corner was 0.1, halfway back toward identity.
    let lut = plan.lut.as_ref().unwrap();
    assert!((lut.table.get(0, 0, 0)[0] - 0.05).abs() < 1e-6);
    assert_eq!(lut.packed.mode(), PackingMode::IntegerArgb);
}

#[test]
fn float_packing_from_config() {
    let f = fixture(r#"{"lut": {"packing_mode": "float_rgba"}}"#);
    let request = TransformRequest::new(input(&f)).with_lut("warm.cube");
    let session = f.orchestrator.start(&request).unwrap();
    session.join(|_| {}).unwrap();

    let plans = f.backend.plans.lock().unwrap();
    let packed = &plans[0].lut.as_ref().unwrap().packed;
    assert_eq!(packed.mode(), PackingMode::FloatRgba);
    assert_eq!(packed.rgb_at(0), Some([0.1, 0.0, 0.0]));
}

#[test]
fn missing_input_fails_before_export() {
    let f = fixture("{}");
    let request = TransformRequest::new(f.dir.path().join("nope.mp4").to_string_lossy())
        .with_lut("warm.cube");
    let err = f.orchestrator.start(&request).unwrap_err();
    assert_eq!(err.code, ErrorCode::IoFailure);
    assert!(f.backend.plans.lock().unwrap().is_empty());
}

#[test]
fn escaping_asset_key_is_not_found() {
    let f = fixture("{}");
    let request = TransformRequest::new(input(&f)).with_lut("../in.mp4");
    let events: Vec<_> = f.orchestrator.submit(&request).iter().collect();
    assert_eq!(events.len(), 1);
    match &events[0] {
        TransformEvent::Failed(err) => assert_eq!(err.code, ErrorCode::AssetNotFound),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn progress_is_monotonic_and_below_one_until_done() {
    let f = fixture("{}");
    let events: Vec<_> = f
        .orchestrator
        .submit(&TransformRequest::new(input(&f)))
        .iter()
        .collect();
    let (last, in_flight) = events.split_last().unwrap();
    assert!(last.is_terminal());
    let values: Vec<f64> = in_flight.iter().filter_map(TransformEvent::progress).collect();
    assert_eq!(values.len(), in_flight.len());
    assert_eq!(values[0], 0.0);
    assert!(values.windows(2).all(|w| w[0] < w[1]));
    assert!(values.iter().all(|v| *v < 1.0));
}

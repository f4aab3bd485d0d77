//! Report export through the capture/assemble seams.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use pn_app::{
    AppConfig, BoxError, CaptureStep, CapturedImage, DirectoryAssembler, DocumentAssembler,
    ExportError, PngCapture, ReplayService, ReportSummary, Session, Surface, SurfaceCapture,
    SvgCapture, export_report,
};
use pn_project::load_yaml;
use pn_results::{
    OperatingPointRequest, OperatingPointResponse, ResponseBook, SegmentResult,
    SystemCurvePoint, SystemCurveResponse, fingerprint,
};

fn demo_path() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // crates
    path.pop(); // repo root
    path.push("scenarios");
    path.push("demo_branch.yaml");
    path
}

fn calculated_session() -> Session {
    let scenario = load_yaml(&demo_path()).expect("demo scenario");
    let request = OperatingPointRequest::from_scenario(&scenario);

    let mut book = ResponseBook::default();
    book.record_operating_point(
        &fingerprint(&request),
        OperatingPointResponse {
            flow_op: 48.0,
            head_op: 26.4,
            efficiency_op: Some(0.69),
            power_kw: Some(5.0),
            cost_per_year: Some(10950.0),
            npsh_available: Some(9.1),
            npsh_required: Some(2.3),
            cavitation_risk: false,
            details: vec![SegmentResult {
                section_id: Some(scenario.topology.suction[0].id.clone()),
                total_loss_m: 0.4,
                major_loss_m: 0.3,
                minor_loss_m: 0.1,
                velocity_m_s: 1.62,
                reynolds: 165_000.0,
                friction_factor: 0.019,
            }],
            natural_flow_m3h: None,
            head_breakdown: None,
            is_extrapolated: false,
        },
    );
    book.record_system_curve(
        "any",
        SystemCurveResponse {
            points: vec![
                SystemCurvePoint { flow: 0.0, head: 15.1, npsh_available: Some(10.0) },
                SystemCurvePoint { flow: 50.0, head: 27.0, npsh_available: Some(9.0) },
            ],
        },
    );

    let service = Arc::new(ReplayService::new(book));
    let mut session = Session::new(scenario, service, AppConfig::default()).unwrap();
    session.calculate();
    session.refresh_system_curve();
    let mut received = 0;
    while received < 2 {
        let n = session.wait(Duration::from_secs(5));
        assert!(n > 0, "replay service did not answer");
        received += n;
    }
    session
}

/// Records the steps it was asked for and fails at one of them.
struct FailingCapture {
    fail_at: CaptureStep,
    seen: Vec<CaptureStep>,
}

impl SurfaceCapture for FailingCapture {
    fn capture(&mut self, step: CaptureStep, _surface: &Surface<'_>) -> Result<CapturedImage, BoxError> {
        self.seen.push(step);
        if step == self.fail_at {
            return Err("renderer unavailable".into());
        }
        Ok(CapturedImage {
            step,
            media_type: "image/png".to_string(),
            bytes: vec![0x89],
        })
    }
}

/// Counts assemble calls.
#[derive(Default)]
struct CountingAssembler {
    calls: usize,
}

impl DocumentAssembler for CountingAssembler {
    type Document = usize;

    fn assemble(&mut self, _summary: &ReportSummary, images: &[CapturedImage]) -> Result<usize, BoxError> {
        self.calls += 1;
        Ok(images.len())
    }
}

#[test]
fn export_needs_an_operating_point() {
    let scenario = load_yaml(&demo_path()).expect("demo scenario");
    let mut session =
        Session::new(scenario, Arc::new(ReplayService::default()), AppConfig::default()).unwrap();

    let err = export_report(&mut session, &mut SvgCapture, &mut CountingAssembler::default())
        .unwrap_err();
    assert!(matches!(err, ExportError::NoResults));
}

#[test]
fn failing_capture_aborts_and_names_the_step() {
    let mut session = calculated_session();
    let mut capture = FailingCapture {
        fail_at: CaptureStep::HeadChart,
        seen: Vec::new(),
    };
    let mut assembler = CountingAssembler::default();

    let err = export_report(&mut session, &mut capture, &mut assembler).unwrap_err();
    match &err {
        ExportError::Capture { step, .. } => assert_eq!(*step, CaptureStep::HeadChart),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("head/flow chart"));
    assert_eq!(capture.seen, vec![CaptureStep::Schematic, CaptureStep::HeadChart]);
    assert_eq!(assembler.calls, 0, "no partial document");
}

#[test]
fn captures_run_in_order_then_assemble() {
    let mut session = calculated_session();
    let mut capture = FailingCapture {
        fail_at: CaptureStep::NpshChart,
        seen: Vec::new(),
    };
    let _ = export_report(&mut session, &mut capture, &mut CountingAssembler::default());
    assert_eq!(capture.seen, CaptureStep::ORDER.to_vec());

    let count = export_report(&mut session, &mut SvgCapture, &mut CountingAssembler::default())
        .unwrap();
    assert_eq!(count, 3);
}

#[test]
fn directory_assembler_writes_figures_and_summary() {
    let mut session = calculated_session();
    let dir = std::env::temp_dir().join(format!("pn_app_report_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let mut assembler = DirectoryAssembler::new(&dir);
    let report = export_report(&mut session, &mut SvgCapture, &mut assembler).unwrap();

    assert_eq!(report, dir.join("report.md"));
    for step in CaptureStep::ORDER {
        let figure = dir.join(format!("{}.svg", step.file_stem()));
        let svg = std::fs::read_to_string(&figure).unwrap();
        assert!(svg.starts_with("<svg"), "{} is not svg", figure.display());
    }

    let md = std::fs::read_to_string(&report).unwrap();
    assert!(md.starts_with("# Demo transfer line with bypass"));
    assert!(md.contains("- Flow: 48.0 m³/h"));
    assert!(md.contains("| suction | Tank outlet | 10.0 | 102.3 | 1.62 |"));
    assert!(md.contains("![schematic](schematic.svg)"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn png_capture_embeds_raster_figures() {
    let mut session = calculated_session();
    let dir = std::env::temp_dir().join(format!("pn_app_png_report_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let mut assembler = DirectoryAssembler::new(&dir);
    let report = export_report(&mut session, &mut PngCapture::new(1.0), &mut assembler).unwrap();

    for step in CaptureStep::ORDER {
        let figure = dir.join(format!("{}.png", step.file_stem()));
        let bytes = std::fs::read(&figure).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"), "{} is not png", figure.display());
    }
    let md = std::fs::read_to_string(&report).unwrap();
    assert!(md.contains("![schematic](schematic.png)"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn summary_rows_follow_topology_order() {
    let session = calculated_session();
    let summary = ReportSummary::from_session(&session).unwrap();
    let names: Vec<&str> = summary.segments.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        ["Tank outlet", "Pump inlet", "Header", "Heat exchanger", "Delivery"]
    );
    assert_eq!(summary.npsh_margin, Some(9.1 - 2.3));
    assert!(summary.segments[1].velocity_m_s.is_none());
}

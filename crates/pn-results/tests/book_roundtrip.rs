use pn_core::SegmentId;
use pn_project::Scenario;
use pn_results::*;

fn response(flow: f64) -> OperatingPointResponse {
    OperatingPointResponse {
        flow_op: flow,
        head_op: 20.0,
        efficiency_op: Some(0.7),
        power_kw: Some(3.2),
        cost_per_year: Some(7_008.0),
        npsh_available: Some(9.1),
        npsh_required: Some(2.4),
        cavitation_risk: false,
        details: vec![SegmentResult {
            section_id: Some(SegmentId::new("suc-1")),
            total_loss_m: 0.42,
            major_loss_m: 0.30,
            minor_loss_m: 0.12,
            velocity_m_s: 1.6,
            reynolds: 160_000.0,
            friction_factor: 0.019,
        }],
        natural_flow_m3h: None,
        head_breakdown: None,
        is_extrapolated: false,
    }
}

#[test]
fn save_and_load_book() {
    let path = std::env::temp_dir().join("pn_results_book.json");
    let _ = std::fs::remove_file(&path);

    let request = OperatingPointRequest::from_scenario(&Scenario::new("book"));
    let key = fingerprint(&request);

    let mut book = ResponseBook::default();
    book.record_operating_point(&key, response(40.0));
    book.record_operating_point(&key, response(42.0));
    book.record_system_curve(
        "curve",
        SystemCurveResponse {
            points: vec![SystemCurvePoint {
                flow: 0.0,
                head: 10.0,
                npsh_available: Some(9.8),
            }],
        },
    );
    book.save(&path).unwrap();

    let loaded = ResponseBook::load(&path).unwrap();
    assert_eq!(loaded, book);
    assert_eq!(loaded.operating_point_for(&key).map(|r| r.flow_op), Some(42.0));
    assert!(loaded.operating_point_for("other").is_none());
    assert_eq!(loaded.latest_system_curve().map(|c| c.points.len()), Some(1));
}

#[test]
fn correlator_from_recorded_response() {
    let c = ResultCorrelator::from_response(7, &response(40.0));
    let r = c.result_for(&SegmentId::new("suc-1")).unwrap();
    assert_eq!(r.velocity_m_s, 1.6);
    assert_eq!(c.flow_m3h(), Some(40.0));
    assert_eq!(c.generation(), 7);
}

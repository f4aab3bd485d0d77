//! Threaded request orchestration against controllable services.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use pn_app::{AppConfig, CalculationService, ServiceError, Session};
use pn_project::Scenario;
use pn_results::{
    OperatingPointRequest, OperatingPointResponse, SystemCurvePoint, SystemCurveRequest,
    SystemCurveResponse,
};
use pn_topology::SegmentDraft;

const WAIT: Duration = Duration::from_secs(5);

fn response(flow: f64) -> OperatingPointResponse {
    OperatingPointResponse {
        flow_op: flow,
        head_op: 18.0,
        efficiency_op: None,
        power_kw: None,
        cost_per_year: None,
        npsh_available: None,
        npsh_required: None,
        cavitation_risk: false,
        details: Vec::new(),
        natural_flow_m3h: None,
        head_breakdown: None,
        is_extrapolated: false,
    }
}

fn scenario() -> Scenario {
    let mut scenario = Scenario::new("orchestration");
    scenario.parameters.static_head_m = 10.0;
    scenario
}

fn session_with(service: Arc<dyn CalculationService>) -> Session {
    let mut session = Session::new(scenario(), service, AppConfig::default()).unwrap();
    session
        .store_mut()
        .add_suction(SegmentDraft::new("Inlet", 5.0, 102.3));
    session
}

/// Block until `want` responses have been applied, counting those a `tick`
/// already applied.
fn settle(session: &mut Session, mut applied: usize, want: usize) {
    while applied < want {
        let n = session.wait(WAIT);
        assert!(n > 0, "timed out after {applied} of {want} responses");
        applied += n;
    }
    assert_eq!(applied, want);
}

fn set_static_head(session: &mut Session, head: f64) {
    let mut params = session.parameters().clone();
    params.static_head_m = head;
    session.set_parameters(params);
}

/// Holds every operating-point call until its static head is released, and
/// answers with that head as the flow.
#[derive(Default)]
struct GatedService {
    open: Mutex<Vec<i64>>,
    cv: Condvar,
}

impl GatedService {
    fn release(&self, static_head: f64) {
        self.open.lock().unwrap().push(static_head as i64);
        self.cv.notify_all();
    }
}

impl CalculationService for GatedService {
    fn operating_point(
        &self,
        request: &OperatingPointRequest,
    ) -> Result<OperatingPointResponse, ServiceError> {
        let key = request.inputs.static_head_m as i64;
        let mut open = self.open.lock().unwrap();
        while !open.contains(&key) {
            open = self.cv.wait(open).unwrap();
        }
        Ok(response(key as f64))
    }

    fn system_curve(
        &self,
        _request: &SystemCurveRequest,
    ) -> Result<SystemCurveResponse, ServiceError> {
        Ok(SystemCurveResponse::default())
    }
}

#[test]
fn late_response_of_an_older_request_is_discarded() {
    let service = Arc::new(GatedService::default());
    let mut session = session_with(service.clone());

    set_static_head(&mut session, 10.0);
    session.calculate();
    set_static_head(&mut session, 20.0);
    session.calculate();
    assert_eq!(session.in_flight(), 2);

    service.release(20.0);
    assert_eq!(session.wait(WAIT), 1);
    assert_eq!(session.operating_point().map(|op| op.flow_op), Some(20.0));

    service.release(10.0);
    assert_eq!(session.wait(WAIT), 1);
    assert_eq!(
        session.operating_point().map(|op| op.flow_op),
        Some(20.0),
        "older response must not overwrite the newer one"
    );
    assert!(session.notice().is_none());
}

/// Counts system-curve calls and answers immediately.
#[derive(Default)]
struct CountingService {
    curves: AtomicUsize,
}

impl CalculationService for CountingService {
    fn operating_point(
        &self,
        _request: &OperatingPointRequest,
    ) -> Result<OperatingPointResponse, ServiceError> {
        Err(ServiceError::Transport("offline".to_string()))
    }

    fn system_curve(
        &self,
        request: &SystemCurveRequest,
    ) -> Result<SystemCurveResponse, ServiceError> {
        self.curves.fetch_add(1, Ordering::SeqCst);
        Ok(SystemCurveResponse {
            points: vec![
                SystemCurvePoint {
                    flow: 0.0,
                    head: request.inputs.static_head_m,
                    npsh_available: None,
                },
                SystemCurvePoint {
                    flow: 50.0,
                    head: request.inputs.static_head_m + 4.0,
                    npsh_available: None,
                },
            ],
        })
    }
}

#[test]
fn burst_of_edits_fetches_the_curve_once() {
    let service = Arc::new(CountingService::default());
    let mut session = session_with(service.clone());
    let delay = session.config().debounce();
    let t0 = Instant::now();

    session.tick(t0);
    for (i, head) in [11.0, 12.0, 13.0].into_iter().enumerate() {
        set_static_head(&mut session, head);
        session.tick(t0 + Duration::from_millis(10 * (i as u64 + 1)));
    }
    assert!(session.debounce_pending());
    assert_eq!(service.curves.load(Ordering::SeqCst), 0);

    let fire = t0 + Duration::from_millis(30) + delay;
    let applied = session.tick(fire);
    settle(&mut session, applied, 1);
    assert_eq!(service.curves.load(Ordering::SeqCst), 1);
    assert_eq!(session.system_curve()[0].head, 13.0);

    // Nothing changed since: further ticks stay quiet.
    session.tick(fire + delay * 2);
    assert_eq!(service.curves.load(Ordering::SeqCst), 1);
}

#[test]
fn edit_and_undo_within_the_quiet_period_skips_the_fetch() {
    let service = Arc::new(CountingService::default());
    let mut session = session_with(service.clone());
    let delay = session.config().debounce();
    let t0 = Instant::now();

    session.tick(t0);
    let applied = session.tick(t0 + delay);
    settle(&mut session, applied, 1);
    assert_eq!(service.curves.load(Ordering::SeqCst), 1);

    let t1 = t0 + delay * 2;
    set_static_head(&mut session, 25.0);
    session.tick(t1);
    set_static_head(&mut session, 10.0);
    session.tick(t1 + Duration::from_millis(5));
    session.tick(t1 + Duration::from_millis(5) + delay);

    assert!(!session.debounce_pending());
    assert_eq!(service.curves.load(Ordering::SeqCst), 1);
}

#[test]
fn service_failure_surfaces_a_notice() {
    let service = Arc::new(CountingService::default());
    let mut session = session_with(service);

    session.calculate();
    assert_eq!(session.wait(WAIT), 1);

    let notice = session.notice().expect("failure notice");
    assert!(notice.message.contains("offline"));
    assert!(session.operating_point().is_none());

    session.dismiss_notice();
    assert!(session.notice().is_none());
}

//! The editing session: one explicit state container for everything the user
//! is working on.
//!
//! The topology store is the single source of truth. Results, chart series and
//! the schematic are derived from it and rebuilt whenever it changes; nothing
//! derived is patched in place.

use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::time::{Duration, Instant};

use pn_layout::{Layout, RenderMode};
use pn_project::{EnergyParameters, Fluid, OperatingParameters, Pump, Scenario};
use pn_results::{
    ChartPoint, OperatingMarker, OperatingPointRequest, OperatingPointResponse, ResultCorrelator,
    SystemCurvePoint, SystemCurveRequest, fingerprint, merge,
};
use pn_topology::{Topology, TopologyStore};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::{AppResult, ServiceError};
use crate::orchestrate::{Debouncer, RequestKind, RequestSequencer, Ticket};
use crate::service::CalculationService;
use crate::worker::{CalcWorker, WorkerMessage};

/// A failed request shown to the user until dismissed.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: RequestKind,
    pub message: String,
}

impl Notice {
    fn failed(kind: RequestKind, err: &ServiceError) -> Self {
        Self {
            kind,
            message: format!("{kind} calculation failed: {err}"),
        }
    }
}

/// What happened to a worker message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Updated,
    /// A newer request of the same kind was issued; the response was dropped.
    Superseded,
    /// The service failed; previous results stay visible.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LayoutKey {
    revision: u64,
    generation: u64,
    mode: RenderMode,
}

pub struct Session {
    name: String,
    store: TopologyStore,
    fluid: Fluid,
    parameters: OperatingParameters,
    energy: EnergyParameters,
    pump: Pump,
    /// Bumped by every setter of the non-topology inputs.
    inputs_version: u64,

    config: AppConfig,
    service: Arc<dyn CalculationService>,
    sequencer: RequestSequencer,
    debouncer: Debouncer,
    tx: Sender<WorkerMessage>,
    rx: Receiver<WorkerMessage>,
    workers: Vec<CalcWorker>,

    /// (revision, inputs_version) last looked at by `tick`.
    watched_inputs: Option<(u64, u64)>,
    /// Fingerprint of the would-be system-curve request at the last change.
    watched_fingerprint: Option<String>,
    /// Fingerprint of the system curve currently displayed.
    curve_fingerprint: Option<String>,

    operating_point: Option<OperatingPointResponse>,
    correlator: ResultCorrelator,
    generation: u64,
    system_curve: Vec<SystemCurvePoint>,
    notice: Option<Notice>,

    layout_cache: Option<(LayoutKey, Layout)>,
}

impl Session {
    pub fn new(scenario: Scenario, service: Arc<dyn CalculationService>, config: AppConfig) -> AppResult<Self> {
        let store = TopologyStore::from_topology(scenario.topology)?;
        let (tx, rx) = channel();
        let debouncer = Debouncer::new(config.debounce());
        Ok(Self {
            name: scenario.name,
            store,
            fluid: scenario.fluid,
            parameters: scenario.parameters,
            energy: scenario.energy,
            pump: scenario.pump,
            inputs_version: 0,
            config,
            service,
            sequencer: RequestSequencer::new(),
            debouncer,
            tx,
            rx,
            workers: Vec::new(),
            watched_inputs: None,
            watched_fingerprint: None,
            curve_fingerprint: None,
            operating_point: None,
            correlator: ResultCorrelator::empty(),
            generation: 0,
            system_curve: Vec::new(),
            notice: None,
            layout_cache: None,
        })
    }

    // ---- inputs -------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn topology(&self) -> &Topology {
        self.store.topology()
    }

    pub fn store(&self) -> &TopologyStore {
        &self.store
    }

    /// Mutations go through the store; derived state notices them through its
    /// revision counter.
    pub fn store_mut(&mut self) -> &mut TopologyStore {
        &mut self.store
    }

    pub fn fluid(&self) -> &Fluid {
        &self.fluid
    }

    pub fn set_fluid(&mut self, fluid: Fluid) {
        self.fluid = fluid;
        self.inputs_version += 1;
    }

    pub fn parameters(&self) -> &OperatingParameters {
        &self.parameters
    }

    pub fn set_parameters(&mut self, parameters: OperatingParameters) {
        self.parameters = parameters;
        self.inputs_version += 1;
    }

    pub fn energy(&self) -> &EnergyParameters {
        &self.energy
    }

    pub fn set_energy(&mut self, energy: EnergyParameters) {
        self.energy = energy;
        self.inputs_version += 1;
    }

    pub fn pump(&self) -> &Pump {
        &self.pump
    }

    pub fn set_pump(&mut self, pump: Pump) {
        self.pump = pump;
        self.inputs_version += 1;
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AppConfig) {
        self.debouncer = Debouncer::new(config.debounce());
        self.config = config;
        self.layout_cache = None;
        self.inputs_version += 1;
    }

    // ---- scenario -----------------------------------------------------------

    /// Snapshot of the current inputs.
    pub fn to_scenario(&self) -> Scenario {
        let mut scenario = Scenario::new(self.name.clone());
        scenario.fluid = self.fluid.clone();
        scenario.parameters = self.parameters.clone();
        scenario.energy = self.energy.clone();
        scenario.pump = self.pump.clone();
        scenario.topology = self.store.topology().clone();
        scenario
    }

    /// Replace every input with `scenario` and drop all derived state.
    ///
    /// Responses still in flight for the previous scenario are discarded when
    /// they arrive.
    pub fn replace_scenario(&mut self, scenario: Scenario) -> AppResult<()> {
        self.store.replace(scenario.topology)?;
        self.name = scenario.name;
        self.fluid = scenario.fluid;
        self.parameters = scenario.parameters;
        self.energy = scenario.energy;
        self.pump = scenario.pump;
        self.inputs_version += 1;

        self.sequencer.invalidate(RequestKind::OperatingPoint);
        self.sequencer.invalidate(RequestKind::SystemCurve);
        self.debouncer.cancel();
        self.watched_inputs = None;
        self.watched_fingerprint = None;
        self.curve_fingerprint = None;
        self.operating_point = None;
        self.generation += 1;
        self.correlator = ResultCorrelator::from_results(self.generation, None, &[]);
        self.system_curve.clear();
        self.notice = None;
        self.layout_cache = None;
        info!(name = %self.name, segments = self.store.topology().segment_count(), "scenario replaced");
        Ok(())
    }

    pub fn load_scenario(&mut self, path: &Path) -> AppResult<()> {
        let scenario = pn_project::load_any(path)?;
        self.replace_scenario(scenario)
    }

    /// Save by extension: `.json` is JSON, anything else is YAML.
    pub fn save_scenario(&self, path: &Path) -> AppResult<()> {
        let scenario = self.to_scenario();
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => pn_project::save_json(path, &scenario)?,
            _ => pn_project::save_yaml(path, &scenario)?,
        }
        Ok(())
    }

    // ---- requests -----------------------------------------------------------

    pub fn operating_point_request(&self) -> OperatingPointRequest {
        OperatingPointRequest::new(
            self.store.topology(),
            &self.fluid,
            &self.parameters,
            &self.energy,
            &self.pump,
        )
    }

    pub fn system_curve_request(&self) -> SystemCurveRequest {
        SystemCurveRequest::new(
            self.store.topology(),
            &self.fluid,
            &self.parameters,
            self.config.curve_range(&self.pump),
        )
    }

    /// Stamp an operating-point request without sending it.
    pub fn issue_operating_point(&mut self) -> (Ticket, OperatingPointRequest) {
        let ticket = self.sequencer.issue(RequestKind::OperatingPoint);
        debug!(seq = ticket.seq, "operating point requested");
        (ticket, self.operating_point_request())
    }

    /// Stamp a system-curve request without sending it.
    pub fn issue_system_curve(&mut self) -> (Ticket, SystemCurveRequest, String) {
        let ticket = self.sequencer.issue(RequestKind::SystemCurve);
        let request = self.system_curve_request();
        let key = fingerprint(&request);
        debug!(seq = ticket.seq, steps = request.range.steps, "system curve requested");
        (ticket, request, key)
    }

    /// User-triggered operating-point calculation.
    pub fn calculate(&mut self) -> Ticket {
        let (ticket, request) = self.issue_operating_point();
        self.workers.push(CalcWorker::operating_point(
            Arc::clone(&self.service),
            ticket,
            request,
            self.tx.clone(),
        ));
        ticket
    }

    /// Fetch the system curve now, bypassing the debounce.
    pub fn refresh_system_curve(&mut self) -> Ticket {
        self.debouncer.cancel();
        let (ticket, request, key) = self.issue_system_curve();
        self.workers.push(CalcWorker::system_curve(
            Arc::clone(&self.service),
            ticket,
            request,
            key,
            self.tx.clone(),
        ));
        ticket
    }

    /// Drive automatic work: notice input changes, fire the debounced curve
    /// fetch, apply whatever responses have arrived.
    pub fn tick(&mut self, now: Instant) -> usize {
        let inputs = (self.store.revision(), self.inputs_version);
        if self.watched_inputs != Some(inputs) {
            self.watched_inputs = Some(inputs);
            let key = fingerprint(&self.system_curve_request());
            if self.watched_fingerprint.as_deref() != Some(key.as_str()) {
                debug!("curve inputs changed; debounce restarted");
                self.watched_fingerprint = Some(key);
                self.debouncer.schedule(now);
            }
        }

        if self.debouncer.poll(now) {
            let unchanged = self.curve_fingerprint.is_some()
                && self.curve_fingerprint == self.watched_fingerprint;
            if unchanged {
                debug!("curve inputs back to the displayed state; fetch skipped");
            } else {
                self.refresh_system_curve();
            }
        }

        self.poll()
    }

    /// Apply every response that has arrived, without blocking.
    pub fn poll(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.rx.try_recv() {
            self.apply(msg);
            count += 1;
        }
        self.workers.retain(|w| !w.is_finished());
        count
    }

    /// Block up to `timeout` for one response, then drain the rest.
    pub fn wait(&mut self, timeout: Duration) -> usize {
        match self.rx.recv_timeout(timeout) {
            Ok(msg) => {
                self.apply(msg);
                1 + self.poll()
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => 0,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.workers.iter().filter(|w| !w.is_finished()).count()
    }

    pub fn debounce_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn apply(&mut self, msg: WorkerMessage) -> Applied {
        let ticket = msg.ticket();
        if !self.sequencer.is_current(ticket) {
            warn!(kind = %ticket.kind, seq = ticket.seq, "superseded response discarded");
            return Applied::Superseded;
        }

        match msg {
            WorkerMessage::OperatingPoint { result, .. } => match result {
                Ok(response) => {
                    self.generation += 1;
                    self.correlator = ResultCorrelator::from_response(self.generation, &response);
                    let stale = self.correlator.stale_count(self.store.topology());
                    if stale > 0 {
                        debug!(stale, "results reference removed segments");
                    }
                    info!(
                        flow = response.flow_op,
                        head = response.head_op,
                        segments = self.correlator.len(),
                        "operating point applied"
                    );
                    self.operating_point = Some(response);
                    self.clear_notice(RequestKind::OperatingPoint);
                    Applied::Updated
                }
                Err(err) => self.fail(RequestKind::OperatingPoint, &err),
            },
            WorkerMessage::SystemCurve {
                fingerprint, result, ..
            } => match result {
                Ok(response) => {
                    debug!(points = response.points.len(), "system curve applied");
                    self.system_curve = response.points;
                    self.curve_fingerprint = Some(fingerprint);
                    self.clear_notice(RequestKind::SystemCurve);
                    Applied::Updated
                }
                Err(err) => self.fail(RequestKind::SystemCurve, &err),
            },
        }
    }

    fn fail(&mut self, kind: RequestKind, err: &ServiceError) -> Applied {
        warn!(%kind, error = %err, "calculation failed; keeping previous results");
        self.notice = Some(Notice::failed(kind, err));
        Applied::Failed
    }

    fn clear_notice(&mut self, kind: RequestKind) {
        if self.notice.as_ref().is_some_and(|n| n.kind == kind) {
            self.notice = None;
        }
    }

    // ---- derived state ------------------------------------------------------

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn operating_point(&self) -> Option<&OperatingPointResponse> {
        self.operating_point.as_ref()
    }

    pub fn results(&self) -> &ResultCorrelator {
        &self.correlator
    }

    pub fn system_curve(&self) -> &[SystemCurvePoint] {
        &self.system_curve
    }

    /// Merged head/NPSH series for the charts.
    pub fn chart(&self) -> Vec<ChartPoint> {
        merge(
            &self.system_curve,
            &self.pump.curve,
            self.operating_point.as_ref().map(OperatingMarker::from),
        )
    }

    /// Schematic for `mode`, rebuilt only when the topology, the results or the
    /// mode changed since the last call.
    pub fn layout(&mut self, mode: RenderMode) -> &Layout {
        let key = LayoutKey {
            revision: self.store.revision(),
            generation: self.generation,
            mode,
        };
        if self.layout_cache.as_ref().is_some_and(|(k, _)| *k != key) {
            self.layout_cache = None;
        }
        let options = self.config.layout_options(mode);
        let (_, layout) = self.layout_cache.get_or_insert_with(|| {
            (
                key,
                pn_layout::layout(self.store.topology(), &self.correlator, &options),
            )
        });
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ReplayService;
    use pn_core::SegmentId;
    use pn_results::SegmentResult;
    use pn_topology::SegmentDraft;

    fn session() -> Session {
        let mut s = Session::new(
            Scenario::new("test"),
            Arc::new(ReplayService::default()),
            AppConfig::default(),
        )
        .unwrap();
        s.store_mut().add_suction(SegmentDraft::new("S1", 10.0, 102.3));
        s
    }

    fn response(id: &SegmentId, flow: f64) -> OperatingPointResponse {
        OperatingPointResponse {
            flow_op: flow,
            head_op: 20.0,
            efficiency_op: Some(0.7),
            power_kw: Some(3.0),
            cost_per_year: None,
            npsh_available: Some(8.0),
            npsh_required: Some(2.0),
            cavitation_risk: false,
            details: vec![SegmentResult {
                section_id: Some(id.clone()),
                total_loss_m: 0.5,
                major_loss_m: 0.4,
                minor_loss_m: 0.1,
                velocity_m_s: 1.4,
                reynolds: 140_000.0,
                friction_factor: 0.02,
            }],
            natural_flow_m3h: None,
            head_breakdown: None,
            is_extrapolated: false,
        }
    }

    fn first_id(s: &Session) -> SegmentId {
        s.topology().suction[0].id.clone()
    }

    #[test]
    fn superseded_response_never_overwrites() {
        let mut s = session();
        let id = first_id(&s);
        let (old, _) = s.issue_operating_point();
        let (new, _) = s.issue_operating_point();

        let applied = s.apply(WorkerMessage::OperatingPoint {
            ticket: new,
            result: Ok(response(&id, 50.0)),
        });
        assert_eq!(applied, Applied::Updated);

        let late = s.apply(WorkerMessage::OperatingPoint {
            ticket: old,
            result: Ok(response(&id, 10.0)),
        });
        assert_eq!(late, Applied::Superseded);
        assert_eq!(s.operating_point().map(|r| r.flow_op), Some(50.0));
    }

    #[test]
    fn failure_keeps_last_good_results() {
        let mut s = session();
        let id = first_id(&s);
        let (t1, _) = s.issue_operating_point();
        s.apply(WorkerMessage::OperatingPoint {
            ticket: t1,
            result: Ok(response(&id, 42.0)),
        });

        let (t2, _) = s.issue_operating_point();
        let applied = s.apply(WorkerMessage::OperatingPoint {
            ticket: t2,
            result: Err(ServiceError::Transport("connection refused".into())),
        });
        assert_eq!(applied, Applied::Failed);
        assert_eq!(s.operating_point().map(|r| r.flow_op), Some(42.0));
        assert!(s.results().result_for(&id).is_some());
        let notice = s.notice().cloned();
        assert_eq!(notice.as_ref().map(|n| n.kind), Some(RequestKind::OperatingPoint));
        assert!(notice.is_some_and(|n| n.message.contains("connection refused")));

        s.dismiss_notice();
        assert!(s.notice().is_none());
    }

    #[test]
    fn curve_failure_leaves_operating_point_notice_alone() {
        let mut s = session();
        let (t, _, key) = s.issue_system_curve();
        s.apply(WorkerMessage::SystemCurve {
            ticket: t,
            fingerprint: key,
            result: Err(ServiceError::Decode("bad json".into())),
        });
        assert_eq!(s.notice().map(|n| n.kind), Some(RequestKind::SystemCurve));

        let id = first_id(&s);
        let (op, _) = s.issue_operating_point();
        s.apply(WorkerMessage::OperatingPoint {
            ticket: op,
            result: Ok(response(&id, 30.0)),
        });
        assert_eq!(s.notice().map(|n| n.kind), Some(RequestKind::SystemCurve));
    }

    #[test]
    fn layout_is_rebuilt_on_edit_and_on_results() {
        let mut s = session();
        let before = s.layout(RenderMode::Screen).clone();
        assert_eq!(s.layout(RenderMode::Screen), &before);

        let id = first_id(&s);
        let (t, _) = s.issue_operating_point();
        s.apply(WorkerMessage::OperatingPoint {
            ticket: t,
            result: Ok(response(&id, 25.0)),
        });
        let with_results = s.layout(RenderMode::Screen).clone();
        assert_eq!(with_results.nodes, before.nodes);
        assert_eq!(with_results.edges[0].label.len(), 4);

        s.store_mut().add_discharge_after(SegmentDraft::new("D1", 5.0, 77.9));
        let edited = s.layout(RenderMode::Screen);
        assert!(edited.total_width > before.total_width);
        let new_edge = edited.edges.last().map(|e| e.label.clone());
        assert_eq!(new_edge, Some(vec!["D1".to_string()]));
    }

    #[test]
    fn replacing_the_scenario_drops_results_and_in_flight_tickets() {
        let mut s = session();
        let id = first_id(&s);
        let (t1, _) = s.issue_operating_point();
        s.apply(WorkerMessage::OperatingPoint {
            ticket: t1,
            result: Ok(response(&id, 25.0)),
        });
        let (pending, _) = s.issue_operating_point();

        s.replace_scenario(Scenario::new("other")).unwrap();
        assert!(s.operating_point().is_none());
        assert!(s.results().is_empty());
        assert_eq!(s.name(), "other");
        assert!(s.topology().is_empty());

        let late = s.apply(WorkerMessage::OperatingPoint {
            ticket: pending,
            result: Ok(response(&id, 99.0)),
        });
        assert_eq!(late, Applied::Superseded);
        assert!(s.operating_point().is_none());
    }

    #[test]
    fn chart_includes_operating_point_flow() {
        let mut s = session();
        let mut pump = Pump::default();
        pump.curve = vec![
            pn_project::PumpCurvePoint::new(0.0, 30.0),
            pn_project::PumpCurvePoint::new(50.0, 18.0),
        ];
        s.set_pump(pump);
        let id = first_id(&s);
        let (t, _) = s.issue_operating_point();
        s.apply(WorkerMessage::OperatingPoint {
            ticket: t,
            result: Ok(response(&id, 25.0)),
        });
        let flows: Vec<f64> = s.chart().iter().map(|p| p.flow).collect();
        assert_eq!(flows, vec![0.0, 25.0, 50.0]);
    }

    #[test]
    fn parameter_edits_restart_the_debounce() {
        let mut s = session();
        let t0 = Instant::now();
        s.tick(t0);
        assert!(s.debounce_pending());

        let mut p = s.parameters().clone();
        p.static_head_m = 12.0;
        s.set_parameters(p);
        s.tick(t0 + Duration::from_millis(300));
        assert!(s.debounce_pending());
        s.tick(t0 + Duration::from_millis(600));
        assert!(s.debounce_pending(), "deadline moved by the second edit");
    }
}

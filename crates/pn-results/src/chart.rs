//! Merge of the three flow-indexed sources drawn on the head/NPSH charts.
//!
//! Samples are keyed by their exact flow value. The sources never share a
//! sampling grid and nothing is interpolated: a point carries only the fields
//! some source sampled at exactly that flow.

use std::collections::HashMap;

use pn_project::PumpCurvePoint;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{OperatingPointResponse, SystemCurvePoint};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub flow: f64,
    pub system_head: Option<f64>,
    pub pump_head: Option<f64>,
    pub npsh_available: Option<f64>,
    pub npsh_required: Option<f64>,
}

impl ChartPoint {
    fn at(flow: f64) -> Self {
        Self {
            flow,
            ..Self::default()
        }
    }
}

/// The operating point drawn as a marker on the head chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingMarker {
    pub flow: f64,
    pub head: f64,
}

impl From<&OperatingPointResponse> for OperatingMarker {
    fn from(r: &OperatingPointResponse) -> Self {
        Self {
            flow: r.flow_op,
            head: r.head_op,
        }
    }
}

/// Key on the bit pattern so equality is exact; -0.0 folds onto 0.0.
fn flow_key(flow: f64) -> Option<u64> {
    if flow.is_finite() {
        Some((flow + 0.0).to_bits())
    } else {
        None
    }
}

/// Incremental form of [`merge`].
///
/// Only present fields are written; an absent field never blanks a value
/// another source already set.
#[derive(Debug, Clone, Default)]
pub struct ChartMerger {
    entries: HashMap<u64, ChartPoint>,
}

impl ChartMerger {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, flow: f64, source: &'static str) -> Option<&mut ChartPoint> {
        let Some(key) = flow_key(flow) else {
            warn!(source, flow, "non-finite chart sample dropped");
            return None;
        };
        Some(
            self.entries
                .entry(key)
                .or_insert_with(|| ChartPoint::at(flow + 0.0)),
        )
    }

    pub fn add_system_curve(&mut self, samples: &[SystemCurvePoint]) -> &mut Self {
        for sample in samples {
            if let Some(point) = self.entry(sample.flow, "system curve") {
                point.system_head = Some(sample.head);
                if sample.npsh_available.is_some() {
                    point.npsh_available = sample.npsh_available;
                }
            }
        }
        self
    }

    pub fn add_pump_curve(&mut self, samples: &[PumpCurvePoint]) -> &mut Self {
        for sample in samples {
            if let Some(point) = self.entry(sample.flow, "pump curve") {
                point.pump_head = Some(sample.head);
                if sample.npshr.is_some() {
                    point.npsh_required = sample.npshr;
                }
            }
        }
        self
    }

    /// Make sure a point exists at `flow` so a marker can be drawn there.
    pub fn mark_operating_point(&mut self, flow: f64) -> &mut Self {
        self.entry(flow, "operating point");
        self
    }

    /// Merged points, ascending by flow.
    pub fn finish(&self) -> Vec<ChartPoint> {
        let mut points: Vec<ChartPoint> = self.entries.values().copied().collect();
        points.sort_by(|a, b| a.flow.total_cmp(&b.flow));
        points
    }
}

/// System curve first, then pump curve, then the operating point.
pub fn merge(
    system: &[SystemCurvePoint],
    pump: &[PumpCurvePoint],
    operating_point: Option<OperatingMarker>,
) -> Vec<ChartPoint> {
    let mut merger = ChartMerger::new();
    merger.add_system_curve(system).add_pump_curve(pump);
    if let Some(op) = operating_point {
        merger.mark_operating_point(op.flow);
    }
    merger.finish()
}

/// `[flow, value]` pairs for one field, skipping points where it is absent.
pub fn column(points: &[ChartPoint], field: impl Fn(&ChartPoint) -> Option<f64>) -> Vec<[f64; 2]> {
    points
        .iter()
        .filter_map(|p| field(p).map(|v| [p.flow, v]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sys(flow: f64, head: f64) -> SystemCurvePoint {
        SystemCurvePoint {
            flow,
            head,
            npsh_available: None,
        }
    }

    #[test]
    fn operating_point_gets_an_empty_entry() {
        let points = merge(
            &[sys(0.0, 20.0), sys(50.0, 15.0)],
            &[PumpCurvePoint::new(0.0, 30.0), PumpCurvePoint::new(50.0, 18.0)],
            Some(OperatingMarker {
                flow: 25.0,
                head: 17.0,
            }),
        );
        let flows: Vec<f64> = points.iter().map(|p| p.flow).collect();
        assert_eq!(flows, vec![0.0, 25.0, 50.0]);
        assert_eq!(points[1], ChartPoint::at(25.0));
        assert_eq!(points[0].system_head, Some(20.0));
        assert_eq!(points[0].pump_head, Some(30.0));
        assert_eq!(points[2].pump_head, Some(18.0));
    }

    #[test]
    fn absent_fields_never_blank_present_ones() {
        let mut m = ChartMerger::new();
        m.add_system_curve(&[SystemCurvePoint {
            flow: 10.0,
            head: 12.0,
            npsh_available: Some(8.0),
        }]);
        m.add_system_curve(&[sys(10.0, 12.5)]);
        m.add_pump_curve(&[PumpCurvePoint::new(10.0, 28.0).with_npshr(2.0)]);
        m.add_pump_curve(&[PumpCurvePoint::new(10.0, 27.0)]);
        let p = m.finish()[0];
        assert_eq!(p.system_head, Some(12.5));
        assert_eq!(p.npsh_available, Some(8.0));
        assert_eq!(p.pump_head, Some(27.0));
        assert_eq!(p.npsh_required, Some(2.0));
    }

    #[test]
    fn negative_zero_and_zero_share_a_point() {
        let points = merge(&[sys(-0.0, 20.0)], &[PumpCurvePoint::new(0.0, 30.0)], None);
        assert_eq!(points.len(), 1);
        assert!(points[0].flow.is_sign_positive());
    }

    #[test]
    fn non_finite_samples_are_dropped() {
        let points = merge(
            &[sys(f64::NAN, 1.0), sys(5.0, 2.0)],
            &[PumpCurvePoint::new(f64::INFINITY, 3.0)],
            Some(OperatingMarker {
                flow: f64::NAN,
                head: 0.0,
            }),
        );
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].flow, 5.0);
    }

    #[test]
    fn nearby_flows_are_not_coalesced() {
        let points = merge(&[sys(0.1 + 0.2, 1.0)], &[PumpCurvePoint::new(0.3, 2.0)], None);
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn column_skips_absent_values() {
        let points = merge(&[sys(0.0, 20.0)], &[PumpCurvePoint::new(10.0, 30.0)], None);
        assert_eq!(column(&points, |p| p.pump_head), vec![[10.0, 30.0]]);
        assert_eq!(column(&points, |p| p.system_head), vec![[0.0, 20.0]]);
    }
}

//! Response data types of the calculation service.

use std::collections::BTreeMap;

use pn_core::SegmentId;
use serde::{Deserialize, Serialize};

/// Computed hydraulics of one segment, tagged with the segment's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentResult {
    #[serde(default)]
    pub section_id: Option<SegmentId>,
    pub total_loss_m: f64,
    /// Friction (distributed) loss.
    pub major_loss_m: f64,
    /// Fittings plus fixed equipment loss.
    pub minor_loss_m: f64,
    pub velocity_m_s: f64,
    pub reynolds: f64,
    pub friction_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingPointResponse {
    pub flow_op: f64,
    pub head_op: f64,
    #[serde(default)]
    pub efficiency_op: Option<f64>,
    #[serde(default)]
    pub power_kw: Option<f64>,
    #[serde(default)]
    pub cost_per_year: Option<f64>,
    #[serde(default)]
    pub npsh_available: Option<f64>,
    #[serde(default)]
    pub npsh_required: Option<f64>,
    #[serde(default)]
    pub cavitation_risk: bool,
    #[serde(default)]
    pub details: Vec<SegmentResult>,
    #[serde(default)]
    pub natural_flow_m3h: Option<f64>,
    #[serde(default)]
    pub head_breakdown: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub is_extrapolated: bool,
}

impl OperatingPointResponse {
    /// NPSH available minus required, when both are known.
    pub fn npsh_margin(&self) -> Option<f64> {
        Some(self.npsh_available? - self.npsh_required?)
    }
}

/// One sample of the computed system curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemCurvePoint {
    /// m³/h
    pub flow: f64,
    /// m
    pub head: f64,
    #[serde(default)]
    pub npsh_available: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemCurveResponse {
    #[serde(default)]
    pub points: Vec<SystemCurvePoint>,
}

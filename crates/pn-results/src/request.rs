//! Request payloads of the calculation service.
//!
//! Both requests carry the whole topology flattened to the top level
//! (`suction_sections`, `discharge_sections_before`,
//! `discharge_parallel_sections`, `discharge_sections_after`).

use pn_project::{EnergyParameters, Fluid, OperatingParameters, Pump, PumpCurvePoint, Scenario};
use pn_topology::Topology;
use serde::{Deserialize, Serialize};

/// Fields shared by both request kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydraulicInputs {
    #[serde(flatten)]
    pub topology: Topology,
    pub fluid: Fluid,
    pub static_head_m: f64,
    pub pressure_suction_bar_g: f64,
    pub pressure_discharge_bar_g: f64,
    pub atmospheric_pressure_bar: f64,
}

impl HydraulicInputs {
    pub fn new(topology: &Topology, fluid: &Fluid, params: &OperatingParameters) -> Self {
        Self {
            topology: topology.clone(),
            fluid: fluid.clone(),
            static_head_m: params.static_head_m,
            pressure_suction_bar_g: params.pressure_suction_bar_g,
            pressure_discharge_bar_g: params.pressure_discharge_bar_g,
            atmospheric_pressure_bar: params.atmospheric_pressure_bar,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingPointRequest {
    #[serde(flatten)]
    pub inputs: HydraulicInputs,
    pub pump_curve_points: Vec<PumpCurvePoint>,
    pub efficiency_motor: f64,
    pub hours_per_day: f64,
    pub energy_cost_per_kwh: f64,
}

impl OperatingPointRequest {
    pub fn new(
        topology: &Topology,
        fluid: &Fluid,
        params: &OperatingParameters,
        energy: &EnergyParameters,
        pump: &Pump,
    ) -> Self {
        Self {
            inputs: HydraulicInputs::new(topology, fluid, params),
            pump_curve_points: pump.curve.clone(),
            efficiency_motor: energy.efficiency_motor,
            hours_per_day: energy.hours_per_day,
            energy_cost_per_kwh: energy.energy_cost_per_kwh,
        }
    }

    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self::new(
            &scenario.topology,
            &scenario.fluid,
            &scenario.parameters,
            &scenario.energy,
            &scenario.pump,
        )
    }
}

/// Flow interval sampled by a system-curve request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveRange {
    pub flow_min_m3h: f64,
    pub flow_max_m3h: f64,
    pub steps: u32,
}

impl CurveRange {
    pub const DEFAULT_STEPS: u32 = 30;
    pub const DEFAULT_FLOW_MAX_FACTOR: f64 = 1.2;
    pub const DEFAULT_FLOW_MAX_M3H: f64 = 100.0;

    /// From zero to `factor` times the largest pump-curve flow, or to
    /// `fallback_max` when the pump curve has no usable point.
    pub fn for_pump(pump: &Pump, factor: f64, fallback_max: f64, steps: u32) -> Self {
        let flow_max_m3h = match pump.max_flow() {
            Some(max) if max > 0.0 => max * factor,
            _ => fallback_max,
        };
        Self {
            flow_min_m3h: 0.0,
            flow_max_m3h,
            steps,
        }
    }
}

impl Default for CurveRange {
    fn default() -> Self {
        Self {
            flow_min_m3h: 0.0,
            flow_max_m3h: Self::DEFAULT_FLOW_MAX_M3H,
            steps: Self::DEFAULT_STEPS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemCurveRequest {
    #[serde(flatten)]
    pub inputs: HydraulicInputs,
    #[serde(flatten)]
    pub range: CurveRange,
}

impl SystemCurveRequest {
    pub fn new(
        topology: &Topology,
        fluid: &Fluid,
        params: &OperatingParameters,
        range: CurveRange,
    ) -> Self {
        Self {
            inputs: HydraulicInputs::new(topology, fluid, params),
            range,
        }
    }

    pub fn from_scenario(scenario: &Scenario) -> Self {
        let range = CurveRange::for_pump(
            &scenario.pump,
            CurveRange::DEFAULT_FLOW_MAX_FACTOR,
            CurveRange::DEFAULT_FLOW_MAX_M3H,
            CurveRange::DEFAULT_STEPS,
        );
        Self::new(&scenario.topology, &scenario.fluid, &scenario.parameters, range)
    }
}

//! Scenario schema definitions.

use pn_core::{bar, barometric_pressure, kg_per_m3, m, pressure_head, to_bar, to_m};
use pn_topology::Topology;
use serde::{Deserialize, Serialize};

/// A full snapshot of one pumping system: written and read wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub fluid: Fluid,
    #[serde(default)]
    pub parameters: OperatingParameters,
    #[serde(default)]
    pub energy: EnergyParameters,
    #[serde(default)]
    pub pump: Pump,
    #[serde(default)]
    pub topology: Topology,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: crate::migrate::LATEST_VERSION,
            name: name.into(),
            fluid: Fluid::default(),
            parameters: OperatingParameters::default(),
            energy: EnergyParameters::default(),
            pump: Pump::default(),
            topology: Topology::default(),
        }
    }
}

/// Pumped liquid properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fluid {
    pub name: String,
    /// Density, kg/m³.
    pub rho: f64,
    /// Kinematic viscosity, m²/s.
    pub nu: f64,
    /// Vapor pressure, kPa.
    pub pv_kpa: f64,
}

impl Default for Fluid {
    fn default() -> Self {
        Self {
            name: "Water (20°C)".to_string(),
            rho: 998.2,
            nu: 1.004e-6,
            pv_kpa: 2.34,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OperatingParameters {
    /// Geometric height difference between discharge and suction levels.
    pub static_head_m: f64,
    pub pressure_suction_bar_g: f64,
    pub pressure_discharge_bar_g: f64,
    pub atmospheric_pressure_bar: f64,
    pub altitude_m: f64,
}

impl Default for OperatingParameters {
    fn default() -> Self {
        Self {
            static_head_m: 10.0,
            pressure_suction_bar_g: 0.0,
            pressure_discharge_bar_g: 0.0,
            atmospheric_pressure_bar: 1.013_25,
            altitude_m: 0.0,
        }
    }
}

impl OperatingParameters {
    /// Set the site altitude and recompute atmospheric pressure from it.
    pub fn set_altitude(&mut self, altitude_m: f64) {
        self.altitude_m = altitude_m;
        self.atmospheric_pressure_bar = to_bar(barometric_pressure(m(altitude_m)));
    }

    /// Static head plus the gauge pressure difference expressed as liquid column.
    pub fn total_static_head_m(&self, fluid: &Fluid) -> f64 {
        let dp = bar(self.pressure_discharge_bar_g - self.pressure_suction_bar_g);
        self.static_head_m + to_m(pressure_head(dp, kg_per_m3(fluid.rho)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnergyParameters {
    pub efficiency_motor: f64,
    pub hours_per_day: f64,
    /// Currency per kWh.
    pub energy_cost_per_kwh: f64,
}

impl Default for EnergyParameters {
    fn default() -> Self {
        Self {
            efficiency_motor: 0.90,
            hours_per_day: 8.0,
            energy_cost_per_kwh: 0.75,
        }
    }
}

/// One user-entered point of the pump characteristic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PumpCurvePoint {
    /// m³/h
    pub flow: f64,
    /// m
    pub head: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npshr: Option<f64>,
}

impl PumpCurvePoint {
    pub fn new(flow: f64, head: f64) -> Self {
        Self {
            flow,
            head,
            efficiency: None,
            npshr: None,
        }
    }

    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.efficiency = Some(efficiency);
        self
    }

    pub fn with_npshr(mut self, npshr: f64) -> Self {
        self.npshr = Some(npshr);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Pump {
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub curve: Vec<PumpCurvePoint>,
}

impl Pump {
    /// Largest flow sampled by the curve, if any point is finite.
    pub fn max_flow(&self) -> Option<f64> {
        self.curve
            .iter()
            .map(|p| p.flow)
            .filter(|f| f.is_finite())
            .reduce(f64::max)
    }
}

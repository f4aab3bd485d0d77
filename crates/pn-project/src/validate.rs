//! Scenario validation logic.

use pn_topology::{TopologyError, validate_topology};

use crate::schema::{EnergyParameters, Fluid, OperatingParameters, Pump, Scenario};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: f64, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    validate_topology(&scenario.topology)?;
    validate_fluid(&scenario.fluid)?;
    validate_parameters(&scenario.parameters)?;
    validate_energy(&scenario.energy)?;
    validate_pump(&scenario.pump)?;
    Ok(())
}

fn validate_fluid(fluid: &Fluid) -> Result<(), ValidationError> {
    if !fluid.rho.is_finite() || fluid.rho <= 0.0 {
        return Err(invalid("fluid.rho", fluid.rho, "density must be positive"));
    }
    if !fluid.nu.is_finite() || fluid.nu < 0.0 {
        return Err(invalid("fluid.nu", fluid.nu, "viscosity must be non-negative"));
    }
    if !fluid.pv_kpa.is_finite() || fluid.pv_kpa < 0.0 {
        return Err(invalid(
            "fluid.pv_kpa",
            fluid.pv_kpa,
            "vapor pressure must be non-negative",
        ));
    }
    Ok(())
}

fn validate_parameters(params: &OperatingParameters) -> Result<(), ValidationError> {
    for (field, value) in [
        ("parameters.static_head_m", params.static_head_m),
        ("parameters.pressure_suction_bar_g", params.pressure_suction_bar_g),
        ("parameters.pressure_discharge_bar_g", params.pressure_discharge_bar_g),
        ("parameters.altitude_m", params.altitude_m),
    ] {
        if !value.is_finite() {
            return Err(invalid(field, value, "must be finite"));
        }
    }
    if !params.atmospheric_pressure_bar.is_finite() || params.atmospheric_pressure_bar <= 0.0 {
        return Err(invalid(
            "parameters.atmospheric_pressure_bar",
            params.atmospheric_pressure_bar,
            "must be positive",
        ));
    }
    Ok(())
}

fn validate_energy(energy: &EnergyParameters) -> Result<(), ValidationError> {
    if !(energy.efficiency_motor > 0.0 && energy.efficiency_motor <= 1.0) {
        return Err(invalid(
            "energy.efficiency_motor",
            energy.efficiency_motor,
            "must be in (0, 1]",
        ));
    }
    if !(0.0..=24.0).contains(&energy.hours_per_day) {
        return Err(invalid(
            "energy.hours_per_day",
            energy.hours_per_day,
            "must be between 0 and 24",
        ));
    }
    if !energy.energy_cost_per_kwh.is_finite() || energy.energy_cost_per_kwh < 0.0 {
        return Err(invalid(
            "energy.energy_cost_per_kwh",
            energy.energy_cost_per_kwh,
            "must be non-negative",
        ));
    }
    Ok(())
}

fn validate_pump(pump: &Pump) -> Result<(), ValidationError> {
    for (idx, point) in pump.curve.iter().enumerate() {
        if !point.flow.is_finite() || point.flow < 0.0 {
            return Err(invalid(
                &format!("pump.curve[{idx}].flow"),
                point.flow,
                "must be finite and non-negative",
            ));
        }
        if !point.head.is_finite() {
            return Err(invalid(
                &format!("pump.curve[{idx}].head"),
                point.head,
                "must be finite",
            ));
        }
        if let Some(npshr) = point.npshr
            && !(npshr.is_finite() && npshr >= 0.0)
        {
            return Err(invalid(
                &format!("pump.curve[{idx}].npshr"),
                npshr,
                "must be finite and non-negative",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PumpCurvePoint;

    #[test]
    fn default_scenario_is_valid() {
        assert!(validate_scenario(&Scenario::new("s")).is_ok());
    }

    #[test]
    fn future_version_is_rejected() {
        let mut s = Scenario::new("s");
        s.version = 99;
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::UnsupportedVersion { version: 99 })
        ));
    }

    #[test]
    fn zero_density_is_rejected() {
        let mut s = Scenario::new("s");
        s.fluid.rho = 0.0;
        let err = validate_scenario(&s).unwrap_err();
        assert!(err.to_string().contains("fluid.rho"));
    }

    #[test]
    fn bad_pump_point_names_its_index() {
        let mut s = Scenario::new("s");
        s.pump.curve = vec![
            PumpCurvePoint::new(0.0, 30.0),
            PumpCurvePoint::new(f64::INFINITY, 10.0),
        ];
        let err = validate_scenario(&s).unwrap_err();
        assert!(err.to_string().contains("pump.curve[1].flow"));
    }
}

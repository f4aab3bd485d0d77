//! Application settings, stored as YAML.

use std::path::Path;
use std::time::Duration;

use pn_layout::{LayoutOptions, RenderMode, SpacingPolicy};
use pn_project::Pump;
use pn_results::CurveRange;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Quiet period before an automatic system-curve fetch.
    pub debounce_ms: u64,
    pub curve_steps: u32,
    /// Curve range upper bound as a multiple of the largest pump flow.
    pub curve_flow_max_factor: f64,
    /// Upper bound used when the pump curve is empty (m³/h).
    pub curve_default_flow_max_m3h: f64,
    pub spacing: SpacingPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            curve_steps: CurveRange::DEFAULT_STEPS,
            curve_flow_max_factor: CurveRange::DEFAULT_FLOW_MAX_FACTOR,
            curve_default_flow_max_m3h: CurveRange::DEFAULT_FLOW_MAX_M3H,
            spacing: SpacingPolicy::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = serde_yaml::from_str(&content)?;
        config.check()?;
        Ok(config)
    }

    /// Load `path` when it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> AppResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).map_err(|e| AppError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn check(&self) -> AppResult<()> {
        if self.curve_steps < 2 {
            return Err(AppError::Config(format!(
                "curve_steps must be at least 2, got {}",
                self.curve_steps
            )));
        }
        if !(self.curve_flow_max_factor.is_finite() && self.curve_flow_max_factor > 0.0) {
            return Err(AppError::Config(format!(
                "curve_flow_max_factor must be positive, got {}",
                self.curve_flow_max_factor
            )));
        }
        if !(self.spacing.min > 0.0 && self.spacing.base >= self.spacing.min) {
            return Err(AppError::Config(format!(
                "spacing needs 0 < min <= base, got min {} base {}",
                self.spacing.min, self.spacing.base
            )));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn curve_range(&self, pump: &Pump) -> CurveRange {
        CurveRange::for_pump(
            pump,
            self.curve_flow_max_factor,
            self.curve_default_flow_max_m3h,
            self.curve_steps,
        )
    }

    pub fn layout_options(&self, mode: RenderMode) -> LayoutOptions {
        LayoutOptions {
            mode,
            spacing: self.spacing,
        }
    }
}

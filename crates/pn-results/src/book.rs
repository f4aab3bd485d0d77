//! Recorded calculation responses, stored as one JSON file.
//!
//! Used to replay a session offline: each response is filed under the
//! fingerprint of the request that produced it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ResultsResult;
use crate::types::{OperatingPointResponse, SystemCurveResponse};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recorded<T> {
    pub fingerprint: String,
    /// RFC 3339 timestamp.
    pub recorded_at: String,
    pub response: T,
}

impl<T> Recorded<T> {
    pub fn now(fingerprint: impl Into<String>, response: T) -> Self {
        Self {
            fingerprint: fingerprint.into(),
            recorded_at: chrono::Utc::now().to_rfc3339(),
            response,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseBook {
    #[serde(default)]
    pub operating_point: Vec<Recorded<OperatingPointResponse>>,
    #[serde(default)]
    pub system_curve: Vec<Recorded<SystemCurveResponse>>,
}

fn lookup<'a, T>(records: &'a [Recorded<T>], fingerprint: &str) -> Option<&'a T> {
    records
        .iter()
        .rev()
        .find(|r| r.fingerprint == fingerprint)
        .map(|r| &r.response)
}

impl ResponseBook {
    pub fn load(path: &Path) -> ResultsResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> ResultsResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn record_operating_point(&mut self, fingerprint: &str, response: OperatingPointResponse) {
        self.operating_point.push(Recorded::now(fingerprint, response));
    }

    pub fn record_system_curve(&mut self, fingerprint: &str, response: SystemCurveResponse) {
        self.system_curve.push(Recorded::now(fingerprint, response));
    }

    /// Latest response recorded for exactly this request.
    pub fn operating_point_for(&self, fingerprint: &str) -> Option<&OperatingPointResponse> {
        lookup(&self.operating_point, fingerprint)
    }

    pub fn system_curve_for(&self, fingerprint: &str) -> Option<&SystemCurveResponse> {
        lookup(&self.system_curve, fingerprint)
    }

    /// Most recent operating point regardless of request.
    pub fn latest_operating_point(&self) -> Option<&OperatingPointResponse> {
        self.operating_point.last().map(|r| &r.response)
    }

    pub fn latest_system_curve(&self) -> Option<&SystemCurveResponse> {
        self.system_curve.last().map(|r| &r.response)
    }
}

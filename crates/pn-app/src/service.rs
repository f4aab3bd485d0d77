//! Calculation service boundary.
//!
//! The hydraulics engine is external; the session only sees this trait. Calls
//! block, so the session runs them on worker threads.

use std::path::Path;

use pn_results::{
    OperatingPointRequest, OperatingPointResponse, ResponseBook, SystemCurveRequest,
    SystemCurveResponse, fingerprint,
};
use tracing::debug;

use crate::error::{AppResult, ServiceError};

pub trait CalculationService: Send + Sync {
    fn operating_point(
        &self,
        request: &OperatingPointRequest,
    ) -> Result<OperatingPointResponse, ServiceError>;

    fn system_curve(&self, request: &SystemCurveRequest)
    -> Result<SystemCurveResponse, ServiceError>;
}

/// Serves responses recorded in a [`ResponseBook`].
///
/// An exact fingerprint match is preferred. Otherwise the most recent recording
/// of that kind is served, so a demo book keeps answering while the user edits.
#[derive(Debug, Clone, Default)]
pub struct ReplayService {
    book: ResponseBook,
}

impl ReplayService {
    pub fn new(book: ResponseBook) -> Self {
        Self { book }
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        Ok(Self::new(ResponseBook::load(path)?))
    }

    pub fn book(&self) -> &ResponseBook {
        &self.book
    }
}

impl CalculationService for ReplayService {
    fn operating_point(
        &self,
        request: &OperatingPointRequest,
    ) -> Result<OperatingPointResponse, ServiceError> {
        let key = fingerprint(request);
        self.book
            .operating_point_for(&key)
            .or_else(|| {
                debug!(fingerprint = %key, "no exact recording; replaying latest operating point");
                self.book.latest_operating_point()
            })
            .cloned()
            .ok_or_else(|| ServiceError::Rejected {
                detail: "no recorded operating point".to_string(),
            })
    }

    fn system_curve(
        &self,
        request: &SystemCurveRequest,
    ) -> Result<SystemCurveResponse, ServiceError> {
        let key = fingerprint(request);
        self.book
            .system_curve_for(&key)
            .or_else(|| {
                debug!(fingerprint = %key, "no exact recording; replaying latest system curve");
                self.book.latest_system_curve()
            })
            .cloned()
            .ok_or_else(|| ServiceError::Rejected {
                detail: "no recorded system curve".to_string(),
            })
    }
}

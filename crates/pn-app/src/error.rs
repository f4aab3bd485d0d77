//! Error types for the pn-app service layer.

use std::path::PathBuf;

use crate::report::CaptureStep;

/// Boxed error raised by capture and assembly implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure at the calculation service boundary.
///
/// These are the only failures the user ever sees during editing; layout and
/// chart merging cannot fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error("Calculation service unreachable: {0}")]
    Transport(String),

    #[error("Calculation rejected: {detail}")]
    Rejected { detail: String },

    #[error("Unreadable calculation response: {0}")]
    Decode(String),
}

/// Report export failure. Export stops at the first failing step.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No operating point has been calculated yet")]
    NoResults,

    #[error("Capture of the {step} failed: {source}")]
    Capture {
        step: CaptureStep,
        #[source]
        source: BoxError,
    },

    #[error("Report assembly failed: {0}")]
    Assembly(#[source] BoxError),
}

/// Application error type shared by the CLI and the GUI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario error: {0}")]
    Project(String),

    #[error("Failed to read {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pn-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<pn_project::ProjectError> for AppError {
    fn from(err: pn_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<pn_topology::TopologyError> for AppError {
    fn from(err: pn_topology::TopologyError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<pn_results::ResultsError> for AppError {
    fn from(err: pn_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

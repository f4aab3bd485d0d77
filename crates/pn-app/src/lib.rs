//! Shared application layer for pumpnet.
//!
//! Provides the editing session used by both the CLI and the GUI: topology
//! edits, calculation requests with supersession and debouncing, derived
//! results/chart/schematic state, scenario load/save, and report export.

pub mod chart_svg;
pub mod config;
pub mod error;
pub mod orchestrate;
pub mod report;
pub mod service;
pub mod session;
pub mod worker;

// Re-export key types for convenience
pub use config::AppConfig;
pub use error::{AppError, AppResult, BoxError, ExportError, ServiceError};
pub use orchestrate::{Debouncer, RequestKind, RequestSequencer, Ticket};
pub use report::{
    CaptureStep, CapturedImage, DirectoryAssembler, DocumentAssembler, PngCapture, ReportSummary,
    SegmentRow, Surface, SurfaceCapture, SvgCapture, export_report,
};
pub use service::{CalculationService, ReplayService};
pub use session::{Applied, Notice, Session};
pub use worker::{CalcWorker, WorkerMessage};

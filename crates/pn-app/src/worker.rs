use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use pn_results::{
    OperatingPointRequest, OperatingPointResponse, SystemCurveRequest, SystemCurveResponse,
};
use tracing::debug;

use crate::error::ServiceError;
use crate::orchestrate::Ticket;
use crate::service::CalculationService;

/// Outcome of one service call, tagged with the ticket it was issued under.
#[derive(Debug, Clone)]
pub enum WorkerMessage {
    OperatingPoint {
        ticket: Ticket,
        result: Result<OperatingPointResponse, ServiceError>,
    },
    SystemCurve {
        ticket: Ticket,
        fingerprint: String,
        result: Result<SystemCurveResponse, ServiceError>,
    },
}

impl WorkerMessage {
    pub fn ticket(&self) -> Ticket {
        match self {
            WorkerMessage::OperatingPoint { ticket, .. }
            | WorkerMessage::SystemCurve { ticket, .. } => *ticket,
        }
    }
}

/// One in-flight service call on its own thread.
pub struct CalcWorker {
    ticket: Ticket,
    handle: JoinHandle<()>,
}

impl CalcWorker {
    pub fn operating_point(
        service: Arc<dyn CalculationService>,
        ticket: Ticket,
        request: OperatingPointRequest,
        tx: Sender<WorkerMessage>,
    ) -> Self {
        let handle = thread::spawn(move || {
            let result = service.operating_point(&request);
            debug!(seq = ticket.seq, ok = result.is_ok(), "operating point returned");
            let _ = tx.send(WorkerMessage::OperatingPoint { ticket, result });
        });
        Self { ticket, handle }
    }

    pub fn system_curve(
        service: Arc<dyn CalculationService>,
        ticket: Ticket,
        request: SystemCurveRequest,
        fingerprint: String,
        tx: Sender<WorkerMessage>,
    ) -> Self {
        let handle = thread::spawn(move || {
            let result = service.system_curve(&request);
            debug!(seq = ticket.seq, ok = result.is_ok(), "system curve returned");
            let _ = tx.send(WorkerMessage::SystemCurve {
                ticket,
                fingerprint,
                result,
            });
        });
        Self { ticket, handle }
    }

    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

//! Request sequencing and debouncing.
//!
//! Every outgoing request gets a ticket with a sequence number. A response is
//! applied only while its ticket is still the latest one issued for its kind;
//! anything older is dropped. Results are always replaced wholesale, so this is
//! enough to keep late responses from regressing what is on screen.

use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    OperatingPoint,
    SystemCurve,
}

impl RequestKind {
    fn slot(self) -> usize {
        match self {
            RequestKind::OperatingPoint => 0,
            RequestKind::SystemCurve => 1,
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::OperatingPoint => f.write_str("operating point"),
            RequestKind::SystemCurve => f.write_str("system curve"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub kind: RequestKind,
    pub seq: u64,
}

#[derive(Debug, Default)]
pub struct RequestSequencer {
    next: u64,
    latest: [Option<u64>; 2],
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a new request; it supersedes every earlier ticket of its kind.
    pub fn issue(&mut self, kind: RequestKind) -> Ticket {
        self.next += 1;
        self.latest[kind.slot()] = Some(self.next);
        Ticket {
            kind,
            seq: self.next,
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest[ticket.kind.slot()] == Some(ticket.seq)
    }

    pub fn latest(&self, kind: RequestKind) -> Option<Ticket> {
        self.latest[kind.slot()].map(|seq| Ticket { kind, seq })
    }

    /// Make every outstanding ticket of `kind` stale without issuing a new one.
    pub fn invalidate(&mut self, kind: RequestKind) {
        self.latest[kind.slot()] = None;
    }
}

/// Trailing-edge debounce driven by explicit instants.
///
/// `schedule` (re)starts the quiet period; `poll` fires once when it has
/// elapsed. Callers pass `now` so tests control time.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

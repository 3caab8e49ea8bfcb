use std::fmt;

use thiserror::Error;
use url::Url;

/// Caller-chosen tag echoed back in every event for a probe.
pub type ProbeId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The request for `probe_id` is about to go on the wire.
    ProbeStarted { probe_id: ProbeId },
    /// Sent exactly once per `ProbeStarted`, including after cancellation.
    ProbeFinished {
        probe_id: ProbeId,
        result: Result<ProbeResponse, ProbeError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub requested_url: Url,
    pub final_url: Url,
    pub status: u16,
    pub redirect_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ProbeError {
    pub kind: FailureKind,
    pub message: String,
}

impl ProbeError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn cancelled() -> Self {
        Self::new(FailureKind::Cancelled, "probe cancelled")
    }

    /// True when the server answered but with a status that does not count as reachable.
    pub fn is_server_error(&self) -> bool {
        matches!(self.kind, FailureKind::HttpStatus(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    Cancelled,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start probe runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

//! Responder error types

use thiserror::Error;

/// Why a request could not be completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Connection refused, DNS failure, unreachable host
    Connect,
    /// The transport gave up waiting
    Timeout,
    /// The body was not the JSON shape the protocol promises
    MalformedBody,
    /// Anything else the HTTP client reported
    Other,
}

/// Responder failure, split the way the transcript reports it
#[derive(Debug, Error)]
pub enum ResponderError {
    /// The responder ran and reported a failure
    #[error("responder returned status {status}: {}", message.as_deref().unwrap_or("no message"))]
    Application {
        status: u16,
        message: Option<String>,
    },

    /// The request never produced a usable response
    #[error("transport failure ({kind:?}): {detail}")]
    Transport { kind: TransportKind, detail: String },
}

impl ResponderError {
    pub fn application(status: u16, message: Option<String>) -> Self {
        Self::Application { status, message }
    }

    pub fn transport(kind: TransportKind, detail: impl Into<String>) -> Self {
        Self::Transport {
            kind,
            detail: detail.into(),
        }
    }

    pub fn connect(detail: impl Into<String>) -> Self {
        Self::transport(TransportKind::Connect, detail)
    }

    #[allow(dead_code)] // Constructor for API completeness
    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::transport(TransportKind::Timeout, detail)
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::transport(TransportKind::MalformedBody, detail)
    }

    #[allow(dead_code)] // State query utility
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn transport_kind(&self) -> Option<TransportKind> {
        match self {
            Self::Transport { kind, .. } => Some(*kind),
            Self::Application { .. } => None,
        }
    }
}

impl From<reqwest::Error> for ResponderError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            TransportKind::Timeout
        } else if e.is_connect() {
            TransportKind::Connect
        } else if e.is_decode() {
            TransportKind::MalformedBody
        } else {
            TransportKind::Other
        };
        Self::transport(kind, e.to_string())
    }
}

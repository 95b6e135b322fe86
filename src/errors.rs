//! Error taxonomy shared by the dispatch protocol
//!
//! Server-side failures are carried as [`DispatchError`] until the dispatcher
//! folds them into a `Failure` envelope; client-side, everything surfaces as
//! a single [`ClientError`] carrying the originating [`ErrorKind`].

use std::fmt;

use thiserror::Error;

/// Discriminant reported in the `error.kind` field of a failure envelope.
///
/// `NotFound`, `Validation` and `Execution` originate on the server;
/// `Transport` and `Protocol` are constructed client-side and never travel
/// on the wire from this server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Execution,
    Transport,
    Protocol,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NotFoundError",
            Self::Validation => "ValidationError",
            Self::Execution => "ExecutionError",
            Self::Transport => "TransportError",
            Self::Protocol => "ProtocolError",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "NotFoundError" => Some(Self::NotFound),
            "ValidationError" => Some(Self::Validation),
            "ExecutionError" => Some(Self::Execution),
            "TransportError" => Some(Self::Transport),
            "ProtocolError" => Some(Self::Protocol),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure produced while resolving or invoking a dispatch target.
///
/// Every variant maps onto exactly one [`ErrorKind`]; the dispatcher converts
/// these into `Failure` envelopes before anything reaches the transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Execution(String),
}

impl DispatchError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Execution(_) => ErrorKind::Execution,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(message) | Self::Validation(message) | Self::Execution(message) => {
                message
            }
        }
    }
}

/// Registration failure. Duplicate names are a startup-time programmer
/// error, so this is only ever seen while building the registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("name already registered: {0}")]
    DuplicateName(String),
}

/// Domain-level fault returned by a tool or resource handler.
///
/// The invoker reports these as `ExecutionError`; handlers never get to pick
/// another kind, since resolution and validation failures are decided before
/// the handler runs.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The single error type visible to gateway callers.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ClientError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ClientError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Protocol, message)
    }
}

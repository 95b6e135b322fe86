//! The response envelope shared by dispatcher and client gateway
//!
//! Wire shape: `{"success": true, "data": <value>}` or
//! `{"success": false, "error": {"kind": <string>, "message": <string>}}`.
//! The discriminant is checked before either branch is read, and payloads
//! carrying both branches (or neither) are rejected outright.

use serde_json::{json, Value};
use thiserror::Error;

use crate::errors::{DispatchError, ErrorKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Success(Value),
    Failure { kind: ErrorKind, message: String },
}

/// Decoding failure for a payload that is not a well-formed envelope.
/// The gateway reports these as `ProtocolError`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("envelope is not a JSON object")]
    NotAnObject,
    #[error("envelope is missing a boolean `success` discriminant")]
    MissingDiscriminant,
    #[error("success envelope is missing `data`")]
    MissingData,
    #[error("failure envelope is missing `error`")]
    MissingError,
    #[error("envelope carries both `data` and `error`")]
    ConflictingBranches,
    #[error("failure envelope `error` is malformed")]
    MalformedError,
    #[error("unknown error kind: {0}")]
    UnknownKind(String),
}

impl Envelope {
    pub fn success(value: Value) -> Self {
        Self::Success(value)
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn into_json(self) -> Value {
        match self {
            Self::Success(value) => json!({
                "success": true,
                "data": value,
            }),
            Self::Failure { kind, message } => json!({
                "success": false,
                "error": {
                    "kind": kind.as_str(),
                    "message": message,
                },
            }),
        }
    }

    pub fn from_json(payload: &Value) -> Result<Self, EnvelopeError> {
        let object = payload.as_object().ok_or(EnvelopeError::NotAnObject)?;
        let success = object
            .get("success")
            .and_then(Value::as_bool)
            .ok_or(EnvelopeError::MissingDiscriminant)?;

        if object.contains_key("data") && object.contains_key("error") {
            return Err(EnvelopeError::ConflictingBranches);
        }

        if success {
            if object.contains_key("error") {
                return Err(EnvelopeError::ConflictingBranches);
            }
            let data = object.get("data").ok_or(EnvelopeError::MissingData)?;
            return Ok(Self::Success(data.clone()));
        }

        if object.contains_key("data") {
            return Err(EnvelopeError::ConflictingBranches);
        }
        let error = object
            .get("error")
            .and_then(Value::as_object)
            .ok_or(EnvelopeError::MissingError)?;
        let kind = error
            .get("kind")
            .and_then(Value::as_str)
            .ok_or(EnvelopeError::MalformedError)?;
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .ok_or(EnvelopeError::MalformedError)?;

        let kind = ErrorKind::from_wire(kind)
            .ok_or_else(|| EnvelopeError::UnknownKind(kind.to_string()))?;

        Ok(Self::Failure {
            kind,
            message: message.to_string(),
        })
    }
}

impl From<DispatchError> for Envelope {
    fn from(err: DispatchError) -> Self {
        Self::Failure {
            kind: err.kind(),
            message: err.message().to_string(),
        }
    }
}

//! Axum handlers for the dispatch endpoints
//!
//! Each request commits to exactly one envelope: resolution and invocation
//! failures travel as structured `Failure` bodies over HTTP 200, so the
//! gateway's single decoding path applies uniformly. Only transport-level
//! faults surface as non-2xx.

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::envelope::Envelope;
use crate::errors::DispatchError;
use crate::invoker::{invoke_resource, invoke_tool};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub server: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        server: env!("CARGO_PKG_NAME"),
    })
}

pub async fn execute_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response {
    let envelope = match decode_parameters(&body) {
        Ok(parameters) => dispatch_tool(&state, &name, &parameters),
        Err(err) => Envelope::from(err),
    };

    audit("tool", &name, &envelope);
    Json(envelope.into_json()).into_response()
}

pub async fn read_resource(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    let envelope = dispatch_resource(&state, &path);

    audit("resource", &path, &envelope);
    Json(envelope.into_json()).into_response()
}

fn dispatch_tool(state: &AppState, name: &str, parameters: &Map<String, Value>) -> Envelope {
    match state.registry.lookup_tool(name) {
        Ok(descriptor) => invoke_tool(descriptor, parameters),
        Err(err) => Envelope::from(err),
    }
}

fn dispatch_resource(state: &AppState, path: &str) -> Envelope {
    match state.registry.lookup_resource(path) {
        Ok(descriptor) => invoke_resource(descriptor),
        Err(err) => Envelope::from(err),
    }
}

/// The tool-execution body must be a flat JSON object of parameters; an
/// empty body counts as no parameters.
fn decode_parameters(body: &Bytes) -> Result<Map<String, Value>, DispatchError> {
    if body.is_empty() {
        return Ok(Map::new());
    }

    let payload: Value = serde_json::from_slice(body)
        .map_err(|_| DispatchError::validation("request body is not valid JSON"))?;

    payload
        .as_object()
        .cloned()
        .ok_or_else(|| DispatchError::validation("request body must be a JSON object"))
}

fn audit(kind: &'static str, target: &str, envelope: &Envelope) {
    info!(
        kind,
        target,
        outcome = if envelope.is_success() { "success" } else { "failure" },
        "dispatch completed"
    );
}

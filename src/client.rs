//! Client gateway for the dispatch protocol
//!
//! Turns local method calls into HTTP requests against tool names and
//! resource paths, and decodes response envelopes back into values or a
//! single [`ClientError`]. Transport faults are never retried here; retry
//! policy, if any, belongs to the caller.

use std::time::Duration;

use serde_json::{json, Value};

use crate::envelope::Envelope;
use crate::errors::ClientError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Caller-facing gateway to a dispatch server.
///
/// Cloning is cheap; clones share the pooled transport, which is released
/// when the last clone drops.
#[derive(Debug, Clone)]
pub struct Gateway {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug)]
pub struct GatewayBuilder {
    base_url: String,
    timeout: Duration,
}

impl GatewayBuilder {
    /// Per-call timeout at the transport boundary. On expiry the call is a
    /// `TransportError` and the server-side effect must be treated as
    /// unknown.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<Gateway, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| ClientError::transport(format!("failed to build http client: {err}")))?;

        Ok(Gateway {
            base_url: self.base_url,
            client,
        })
    }
}

impl Gateway {
    pub fn builder(base_url: impl Into<String>) -> GatewayBuilder {
        GatewayBuilder {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder(base_url).build()
    }

    /// Execute a tool by name with a flat object of parameters.
    pub async fn call_tool(&self, name: &str, params: Value) -> Result<Value, ClientError> {
        let url = format!("{}/api/tools/{name}/execute", self.base_url);
        tracing::debug!(url = %url, tool = %name, "calling tool");

        let response = self
            .client
            .post(&url)
            .json(&params)
            .send()
            .await
            .map_err(map_transport_error)?;

        decode_response(response).await
    }

    /// Read a resource by path (the path may contain slashes).
    pub async fn read_resource(&self, path: &str) -> Result<Value, ClientError> {
        let url = format!("{}/api/resources/{path}", self.base_url);
        tracing::debug!(url = %url, resource = %path, "reading resource");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_transport_error)?;

        decode_response(response).await
    }

    pub async fn add_numbers(&self, a: f64, b: f64) -> Result<Value, ClientError> {
        self.call_tool("add_numbers", json!({"a": a, "b": b})).await
    }

    pub async fn multiply_numbers(&self, a: f64, b: f64) -> Result<Value, ClientError> {
        self.call_tool("multiply_numbers", json!({"a": a, "b": b}))
            .await
    }

    pub async fn calculate_statistics(&self, numbers: &[f64]) -> Result<Value, ClientError> {
        self.call_tool("calculate_statistics", json!({"numbers": numbers}))
            .await
    }

    pub async fn get_user(&self, user_id: u64) -> Result<Value, ClientError> {
        self.call_tool("get_user", json!({"user_id": user_id})).await
    }

    pub async fn list_users(&self) -> Result<Value, ClientError> {
        self.call_tool("list_users", json!({})).await
    }

    pub async fn get_tasks(&self, filter_status: Option<&str>) -> Result<Value, ClientError> {
        let params = match filter_status {
            Some(status) => json!({"filter_status": status}),
            None => json!({}),
        };
        self.call_tool("get_tasks", params).await
    }

    pub async fn create_task(&self, title: &str, assigned_to: u64) -> Result<Value, ClientError> {
        self.call_tool(
            "create_task",
            json!({"title": title, "assigned_to": assigned_to}),
        )
        .await
    }

    pub async fn read_users_resource(&self) -> Result<Value, ClientError> {
        self.read_resource("users/list").await
    }

    pub async fn read_config_resource(&self) -> Result<Value, ClientError> {
        self.read_resource("config").await
    }

    pub async fn read_summary_resource(&self) -> Result<Value, ClientError> {
        self.read_resource("summary").await
    }
}

async fn decode_response(response: reqwest::Response) -> Result<Value, ClientError> {
    let status = response.status();
    let body = response.text().await.map_err(map_transport_error)?;

    // Envelopes, including every Failure, travel as 2xx; anything else did
    // not come from the dispatcher.
    if !status.is_success() {
        return Err(ClientError::transport(format!(
            "unexpected HTTP status {status}"
        )));
    }

    let payload: Value = serde_json::from_str(&body)
        .map_err(|err| ClientError::protocol(format!("response body is not valid JSON: {err}")))?;

    decode_envelope(&payload)
}

fn decode_envelope(payload: &Value) -> Result<Value, ClientError> {
    match Envelope::from_json(payload) {
        Ok(Envelope::Success(value)) => Ok(value),
        Ok(Envelope::Failure { kind, message }) => Err(ClientError::new(kind, message)),
        Err(err) => Err(ClientError::protocol(err.to_string())),
    }
}

fn map_transport_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::transport("request timed out")
    } else {
        ClientError::transport(err.to_string())
    }
}

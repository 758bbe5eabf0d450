//! MCP integration handlers
//!
//! Handlers are organized by functional area. Each one resolves the caller's
//! credential, extracts its parameter struct from the tool arguments, calls the
//! matching [`UpnifyClient`](crate::UpnifyClient) operation and renders the outcome.

pub mod prospects;
pub mod reports;
pub mod sales;
pub mod session;

pub use prospects::*;
pub use reports::*;
pub use sales::*;
pub use session::*;

use super::core::{UpnifyMcpServer, UpnifyToolResult};
use crate::auth::Credential;
use crate::error::{UpnifyError, UpnifyResult, ValidationError};
use crate::operations::OperationOutcome;
use crate::transport::HttpTransport;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

fn argument<'a>(arguments: &'a Value, name: &str) -> Option<&'a str> {
    arguments
        .get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Credential from the call arguments, falling back to the configured default.
pub(crate) fn resolve_credential<T: HttpTransport>(
    server: &UpnifyMcpServer<T>,
    arguments: &Value,
) -> UpnifyResult<Credential> {
    if let Some(token) = argument(arguments, "tkIntegracion") {
        return Ok(Credential::integration_token(token));
    }
    if let (Some(email), Some(password)) =
        (argument(arguments, "email"), arguments.get("password").and_then(Value::as_str))
    {
        return Ok(Credential::email_password(email, password));
    }

    server
        .client
        .config()
        .default_credential
        .clone()
        .ok_or_else(|| {
            UpnifyError::authentication(
                "no credential supplied: pass tkIntegracion (or email and password) or \
                 configure TK_INTEGRACION",
            )
        })
}

/// Deserialize the operation parameters from the tool arguments.
pub(crate) fn parse_arguments<P: DeserializeOwned>(arguments: &Value) -> UpnifyResult<P> {
    let arguments = match arguments {
        Value::Null => json!({}),
        other => other.clone(),
    };
    serde_json::from_value(arguments)
        .map_err(|e| ValidationError::invalid("arguments", e.to_string()).into())
}

/// Credential and parameters for one call.
pub(crate) fn prepare<T: HttpTransport, P: DeserializeOwned>(
    server: &UpnifyMcpServer<T>,
    arguments: &Value,
) -> UpnifyResult<(Credential, P)> {
    let params = parse_arguments(arguments)?;
    let credential = resolve_credential(server, arguments)?;
    Ok((credential, params))
}

/// Render an operation result for the agent.
pub(crate) fn tool_result(tool: &str, result: UpnifyResult<OperationOutcome>) -> UpnifyToolResult {
    match result {
        Ok(outcome) => UpnifyToolResult {
            success: true,
            content: outcome.to_envelope(),
            metadata: Some(json!({ "tool": tool })),
        },
        Err(error) => error_result(tool, &error),
    }
}

pub(crate) fn error_result(tool: &str, error: &UpnifyError) -> UpnifyToolResult {
    let mut result = UpnifyToolResult::failure(error.to_string(), error.error_code());
    if let Some(payload) = error.sent_payload() {
        result.content["payload"] = payload.clone();
    }
    if let Some(metadata) = result.metadata.as_mut() {
        metadata["tool"] = json!(tool);
        if let Some(status) = error.upstream_status() {
            metadata["upstream_status"] = json!(status);
        }
        if let Some(payload) = error.sent_payload() {
            metadata["payload"] = payload.clone();
        }
    }
    result
}

//! Error types for Upnify CRM operations.
//!
//! Every failure the core can produce is one variant of [`UpnifyError`]. Variants carry
//! enough context (operation, upstream status and body, the payload that was sent) to be
//! surfaced verbatim to the caller; nothing is retried or masked.

use crate::operations::Operation;
use serde_json::Value;

/// Main error type for Upnify operations.
#[derive(Debug, thiserror::Error)]
pub enum UpnifyError {
    /// Bad credential, CRM-side rejection, or a login response without a session token
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    /// A resource endpoint answered with a non-2xx status
    #[error("{operation} failed: upstream returned HTTP {status}: {body}")]
    UpstreamRequestFailed {
        operation: Operation,
        status: u16,
        body: String,
        /// What was sent, for diagnosis
        payload: Option<Value>,
    },

    /// Caller-supplied parameters are incomplete or invalid
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The request never produced an HTTP response
    #[error("{operation} failed: transport error: {message}")]
    Transport { operation: Operation, message: String },

    /// A 2xx response whose body could not be interpreted
    #[error("{operation} failed: unexpected response: {message}")]
    MalformedResponse { operation: Operation, message: String },

    /// Invalid or incomplete configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Parameter validation errors.
///
/// Raised before any network traffic when an operation is missing required input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// One or more required fields are absent or blank
    #[error("Missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },

    /// A field is present but unusable
    #[error("Field '{field}' is invalid: {message}")]
    InvalidValue { field: String, message: String },
}

impl UpnifyError {
    /// Create an authentication failure
    pub fn authentication(reason: impl Into<String>) -> Self {
        Self::AuthenticationFailed {
            reason: reason.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(operation: Operation, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            operation,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Stable machine-readable code, used in tool results.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed { .. } => "AUTHENTICATION_FAILED",
            Self::UpstreamRequestFailed { operation, .. }
            | Self::Transport { operation, .. }
            | Self::MalformedResponse { operation, .. } => operation.failure_code(),
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
        }
    }

    /// HTTP status of the upstream failure, if there was one
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::UpstreamRequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Payload sent with a request the CRM rejected, if recorded
    pub fn sent_payload(&self) -> Option<&Value> {
        match self {
            Self::UpstreamRequestFailed { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }
}

impl ValidationError {
    /// Create a missing-fields error
    pub fn missing<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingFields {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Create an invalid-value error
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for Upnify operations
pub type UpnifyResult<T> = Result<T, UpnifyError>;
pub type ValidationResult<T> = Result<T, ValidationError>;

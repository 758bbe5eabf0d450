//! HTTP transport abstraction for CRM requests.
//!
//! Resource operations describe each call as a [`CrmRequest`] (method, base URL, path,
//! headers, query string and an endpoint-specific body encoding) and hand it to an
//! [`HttpTransport`]. The transport only moves bytes: it returns the status code and body
//! text and never interprets either, so status handling stays with the operation that
//! knows what the endpoint means.
//!
//! Two implementations ship with the crate:
//!
//! * [`ReqwestTransport`] - the production client
//! * [`ScriptedTransport`] - replays canned responses and records every request, for
//!   tests and offline development

pub mod http_client;
pub mod scripted;

pub use http_client::ReqwestTransport;
pub use scripted::ScriptedTransport;

use serde_json::Value;
use std::fmt;
use std::future::Future;

/// HTTP methods used by the CRM API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// Body encoding of a request.
///
/// CRM endpoints disagree on encoding, so each operation picks one explicitly.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// `application/x-www-form-urlencoded`, in field order
    Form(Vec<(String, String)>),
}

/// A fully described CRM request.
#[derive(Debug, Clone, PartialEq)]
pub struct CrmRequest {
    method: HttpMethod,
    base_url: String,
    path: String,
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    body: RequestBody,
}

impl CrmRequest {
    /// Create a request with no headers, query or body.
    pub fn new(method: HttpMethod, base_url: impl Into<String>, path: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            method,
            base_url: base_url.trim_end_matches('/').to_string(),
            path: path.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, base_url, path)
    }

    pub fn post(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, base_url, path)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn with_form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Full URL without the query string.
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }

    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn form_field(&self, name: &str) -> Option<&str> {
        match &self.body {
            RequestBody::Form(fields) => fields
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for CrmRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url())
    }
}

/// Raw CRM response: status code and body text.
#[derive(Debug, Clone, PartialEq)]
pub struct CrmResponse {
    status: u16,
    body: String,
}

impl CrmResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Response with a JSON-serialized body.
    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn parse_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// A request that produced no HTTP response (DNS, connect, TLS, body read).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Sends CRM requests.
///
/// Implementations must be shareable across tasks; a single transport serves every
/// credential and operation. Non-2xx statuses are NOT errors at this layer.
pub trait HttpTransport: Send + Sync {
    /// Send one request and return its status and body.
    fn send(
        &self,
        request: CrmRequest,
    ) -> impl Future<Output = Result<CrmResponse, TransportError>> + Send;
}

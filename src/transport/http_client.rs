//! Production transport backed by `reqwest`.

use super::{CrmRequest, CrmResponse, HttpMethod, HttpTransport, RequestBody, TransportError};
use log::trace;

/// `reqwest`-based [`HttpTransport`].
///
/// Cloning is cheap; clones share the connection pool. No timeout is configured here,
/// the client's defaults apply.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (proxies, custom TLS roots, timeouts).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: CrmRequest) -> Result<CrmResponse, TransportError> {
        trace!("Sending {}", request);

        let method = match request.method() {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, request.url());
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query().is_empty() {
            builder = builder.query(request.query());
        }
        builder = match request.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::new(format!("failed to read response body: {e}")))?;

        Ok(CrmResponse::new(status, body))
    }
}

//! In-memory transport that replays scripted responses.
//!
//! Responses are registered per `(method, path)`. Each route holds a queue: responses are
//! consumed in order and the last one keeps answering once the queue is down to one
//! entry. Unscripted routes answer `404`. Every request is recorded so tests can assert
//! on exactly what would have gone over the wire.
//!
//! # Example Usage
//!
//! ```rust
//! use upnify_mcp::transport::{CrmRequest, CrmResponse, HttpMethod, HttpTransport, ScriptedTransport};
//! use serde_json::json;
//!
//! # async fn example() {
//! let transport = ScriptedTransport::new();
//! transport.respond(
//!     HttpMethod::Get,
//!     "/catalogos/fases",
//!     CrmResponse::json(200, &json!([{"tkFase": "PFAS-1", "fase": "Nuevo"}])),
//! );
//!
//! let response = transport
//!     .send(CrmRequest::get("https://api.upnify.com", "/catalogos/fases"))
//!     .await
//!     .unwrap();
//! assert_eq!(response.status(), 200);
//! assert_eq!(transport.request_count(), 1);
//! # }
//! ```

use super::{CrmRequest, CrmResponse, HttpMethod, HttpTransport, TransportError};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
enum Scripted {
    Respond(CrmResponse),
    Fail(String),
}

#[derive(Debug, Default)]
struct ScriptState {
    routes: HashMap<(HttpMethod, String), VecDeque<Scripted>>,
    requests: Vec<CrmRequest>,
}

/// Scripted [`HttpTransport`]. Clones share the same script and request log.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, method: HttpMethod, path: &str, scripted: Scripted) -> &Self {
        self.lock()
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(scripted);
        self
    }

    /// Queue a response for `method path`.
    pub fn respond(&self, method: HttpMethod, path: &str, response: CrmResponse) -> &Self {
        self.push(method, path, Scripted::Respond(response))
    }

    /// Queue a transport failure (no HTTP response at all) for `method path`.
    pub fn fail(&self, method: HttpMethod, path: &str, message: impl Into<String>) -> &Self {
        self.push(method, path, Scripted::Fail(message.into()))
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<CrmRequest> {
        self.lock().requests.clone()
    }

    /// Requests sent to `path`, in order.
    pub fn requests_to(&self, path: &str) -> Vec<CrmRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|request| request.path() == path)
            .cloned()
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// Forget recorded requests; scripted responses are kept.
    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }
}

impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: CrmRequest) -> Result<CrmResponse, TransportError> {
        let mut state = self.lock();
        let key = (request.method(), request.path().to_string());
        let description = request.to_string();
        state.requests.push(request);

        let next = match state.routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match next {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(message)) => Err(TransportError::new(message)),
            None => Ok(CrmResponse::new(
                404,
                format!("no scripted response for {description}"),
            )),
        }
    }
}

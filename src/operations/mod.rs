//! Resource operations against the CRM.
//!
//! [`UpnifyClient`] owns the transport and the [`Authenticator`]. Each submodule adds the
//! operations for one CRM resource as an `impl` block on the client, together with the
//! parameter types and the encoder for that endpoint. Every operation follows the same
//! shape:
//!
//! 1. authenticate the credential (cache hit or live login)
//! 2. validate parameters and inject defaults
//! 3. build the request with the endpoint's own encoding and send it
//! 4. fail with [`UpnifyError::UpstreamRequestFailed`] on a non-2xx status
//! 5. wrap the parsed response into an [`OperationOutcome`]

pub mod opportunities;
pub mod params;
pub mod phases;
pub mod prospects;
pub mod reminders;
pub mod reports;
pub mod search;

pub use opportunities::{NewOpportunity, OpportunityDraft};
pub use phases::Phase;
pub use prospects::NewProspect;
pub use reminders::NewReminder;
pub use reports::{ActivityReportQuery, ConversionReportQuery, PendingPaymentsQuery, SalesReportQuery};
pub use search::{Contact, ContactSearchQuery, ContactSearchResult};

use crate::auth::{AuthSession, Authenticator, Credential};
use crate::config::UpnifyConfig;
use crate::defaults;
use crate::error::{UpnifyError, UpnifyResult};
use crate::session::SessionCache;
use crate::transport::{CrmRequest, CrmResponse, HttpTransport, ReqwestTransport, RequestBody};
use log::{debug, warn};
use serde_json::{Map, Value, json};
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// The business operations the client performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateProspect,
    ListPhases,
    SearchContacts,
    CreateOpportunity,
    SalesReport,
    PendingPayments,
    ActivityReport,
    ConversionReport,
    CreateReminder,
    SessionInfo,
}

impl Operation {
    /// Error code reported when this operation fails upstream.
    pub fn failure_code(&self) -> &'static str {
        match self {
            Self::CreateProspect => "PROSPECT_CREATION_FAILED",
            Self::ListPhases => "PHASE_LOOKUP_FAILED",
            Self::SearchContacts => "CONTACT_SEARCH_FAILED",
            Self::CreateOpportunity => "OPPORTUNITY_CREATION_FAILED",
            Self::SalesReport => "SALES_REPORT_FAILED",
            Self::PendingPayments => "PENDING_PAYMENTS_FAILED",
            Self::ActivityReport => "ACTIVITY_REPORT_FAILED",
            Self::ConversionReport => "CONVERSION_REPORT_FAILED",
            Self::CreateReminder => "REMINDER_CREATION_FAILED",
            Self::SessionInfo => "SESSION_INFO_FAILED",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateProspect => "prospect creation",
            Self::ListPhases => "phase lookup",
            Self::SearchContacts => "contact search",
            Self::CreateOpportunity => "opportunity creation",
            Self::SalesReport => "sales report",
            Self::PendingPayments => "pending payments report",
            Self::ActivityReport => "activity report",
            Self::ConversionReport => "conversion report",
            Self::CreateReminder => "reminder creation",
            Self::SessionInfo => "session info",
        };
        f.write_str(name)
    }
}

/// Successful result of an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationOutcome {
    pub message: String,
    pub data: Value,
    /// Company identifier from the session profile
    pub company_id: Option<String>,
}

impl OperationOutcome {
    pub fn new(message: impl Into<String>, data: Value, session: &AuthSession) -> Self {
        Self {
            message: message.into(),
            data,
            company_id: session.company_id().map(str::to_string),
        }
    }

    /// Render as `{success, message, data, tkEmpresa}`.
    pub fn to_envelope(&self) -> Value {
        json!({
            "success": true,
            "message": self.message,
            "data": self.data,
            "tkEmpresa": self.company_id,
        })
    }
}

/// Authenticated client for the CRM resource endpoints.
pub struct UpnifyClient<T: HttpTransport = ReqwestTransport> {
    transport: Arc<T>,
    auth: Authenticator<T>,
    config: UpnifyConfig,
}

impl UpnifyClient<ReqwestTransport> {
    /// Client backed by `reqwest` with a fresh session cache.
    pub fn new(config: UpnifyConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

impl<T: HttpTransport> UpnifyClient<T> {
    pub fn with_transport(config: UpnifyConfig, transport: T) -> Self {
        Self::with_cache(config, transport, SessionCache::new())
    }

    /// Client sharing an existing session cache.
    pub fn with_cache(config: UpnifyConfig, transport: T, cache: SessionCache) -> Self {
        let transport = Arc::new(transport);
        let auth = Authenticator::new(Arc::clone(&transport), cache, &config);
        Self {
            transport,
            auth,
            config,
        }
    }

    pub fn config(&self) -> &UpnifyConfig {
        &self.config
    }

    pub fn authenticator(&self) -> &Authenticator<T> {
        &self.auth
    }

    pub fn cache(&self) -> &SessionCache {
        self.auth.cache()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Start the background sweep at the configured interval.
    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        self.cache().spawn_sweeper(self.config.sweep_interval)
    }

    /// Authenticate and report who the session belongs to.
    pub async fn session_info(&self, credential: &Credential) -> UpnifyResult<OperationOutcome> {
        let session = self.auth.authenticate(credential).await?;
        let data = json!({
            "authMode": self.auth.mode().to_string(),
            "usuario": session.profile.summary(),
        });
        Ok(OperationOutcome::new("Authenticated with Upnify", data, &session))
    }

    pub(crate) fn get(&self, session: &AuthSession, path: &str) -> CrmRequest {
        self.authorize(CrmRequest::get(&self.config.upnify_base_url, path), session)
    }

    pub(crate) fn post(&self, session: &AuthSession, path: &str) -> CrmRequest {
        self.authorize(CrmRequest::post(&self.config.upnify_base_url, path), session)
    }

    fn authorize(&self, request: CrmRequest, session: &AuthSession) -> CrmRequest {
        request
            .with_header("token", session.token.as_str())
            .with_header("User-Agent", defaults::USER_AGENT)
    }

    /// Send `request`; anything but a 2xx response is an error for `operation`.
    pub(crate) async fn dispatch(
        &self,
        operation: Operation,
        request: CrmRequest,
    ) -> UpnifyResult<CrmResponse> {
        debug!("{}: {}", operation, request);
        let payload = sent_payload(&request);

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| UpnifyError::Transport {
                operation,
                message: e.to_string(),
            })?;

        if !response.is_success() {
            warn!(
                "{} rejected by the CRM with HTTP {}: {}",
                operation,
                response.status(),
                response.body()
            );
            warn!("{} payload sent: {}", operation, payload);
            return Err(UpnifyError::UpstreamRequestFailed {
                operation,
                status: response.status(),
                body: response.body().to_string(),
                payload: Some(payload),
            });
        }

        Ok(response)
    }
}

/// Parse a 2xx body as JSON.
pub(crate) fn parse_json(operation: Operation, response: &CrmResponse) -> UpnifyResult<Value> {
    response
        .parse_json()
        .map_err(|e| UpnifyError::malformed(operation, format!("response is not valid JSON: {e}")))
}

/// What was sent, for error diagnosis. Headers are left out since they carry the token.
fn sent_payload(request: &CrmRequest) -> Value {
    match request.body() {
        RequestBody::Json(value) => value.clone(),
        RequestBody::Form(fields) => pairs_to_object(fields),
        RequestBody::Empty => pairs_to_object(request.query()),
    }
}

fn pairs_to_object(pairs: &[(String, String)]) -> Value {
    let object: Map<String, Value> = pairs
        .iter()
        .map(|(name, value)| (name.clone(), Value::String(value.clone())))
        .collect();
    Value::Object(object)
}

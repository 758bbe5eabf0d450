//! Prospect phase catalog.

use super::{Operation, OperationOutcome, UpnifyClient, parse_json};
use crate::auth::{AuthSession, Credential};
use crate::defaults;
use crate::endpoints;
use crate::error::{UpnifyError, UpnifyResult};
use crate::transport::HttpTransport;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Entity code of prospects in the phase catalog
const PROSPECT_ENTITY: u32 = 0;

/// A prospect classification stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    #[serde(rename = "tkFase")]
    pub token: String,
    #[serde(rename = "fase", default)]
    pub label: String,
}

impl<T: HttpTransport> UpnifyClient<T> {
    /// Fetch the tenant's prospect phases. Never cached.
    pub async fn list_phases(&self, credential: &Credential) -> UpnifyResult<Vec<Phase>> {
        let session = self.auth.authenticate(credential).await?;
        self.fetch_phases(&session).await
    }

    /// Phase catalog wrapped as an operation result.
    pub async fn phase_catalog(&self, credential: &Credential) -> UpnifyResult<OperationOutcome> {
        let session = self.auth.authenticate(credential).await?;
        let phases = self.fetch_phases(&session).await?;
        let data = json!({
            "total": phases.len(),
            "fases": phases,
        });
        Ok(OperationOutcome::new("Phase catalog retrieved", data, &session))
    }

    pub(crate) async fn fetch_phases(&self, session: &AuthSession) -> UpnifyResult<Vec<Phase>> {
        let request = self
            .get(session, endpoints::PHASES)
            .with_query("entidad", PROSPECT_ENTITY);
        let response = self.dispatch(Operation::ListPhases, request).await?;
        let value = parse_json(Operation::ListPhases, &response)?;

        serde_json::from_value(value).map_err(|e| {
            UpnifyError::malformed(
                Operation::ListPhases,
                format!("expected an array of phases: {e}"),
            )
        })
    }

    /// First phase of the catalog, or the built-in default when the catalog is
    /// unavailable or empty. Never fails.
    pub(crate) async fn resolve_default_phase(&self, session: &AuthSession) -> String {
        match self.fetch_phases(session).await {
            Ok(phases) => match phases.into_iter().next() {
                Some(phase) => {
                    debug!("Using first catalog phase '{}'", phase.label);
                    phase.token
                }
                None => {
                    warn!("Phase catalog is empty, using default prospect phase");
                    defaults::PROSPECT_PHASE_TOKEN.to_string()
                }
            },
            Err(e) => {
                warn!("Phase lookup failed, using default prospect phase: {}", e);
                defaults::PROSPECT_PHASE_TOKEN.to_string()
            }
        }
    }
}

//! Credential-to-session exchange with caching.

use super::credential::{AuthMode, Credential};
use super::login::{INTEGRATION_TOKEN_FIELD, LoginResponse, PASSWORD_TOKEN_FIELD};
use crate::config::UpnifyConfig;
use crate::defaults;
use crate::endpoints;
use crate::error::{UpnifyError, UpnifyResult};
use crate::session::{Profile, SessionCache, SessionEntry};
use crate::transport::{CrmRequest, HttpTransport};
use chrono::{TimeDelta, Utc};
use log::{debug, info, warn};
use serde_json::json;
use std::fmt;
use std::sync::Arc;

/// A usable CRM session.
#[derive(Clone, PartialEq)]
pub struct AuthSession {
    /// Session token sent as the `token` header on resource calls
    pub token: String,
    pub profile: Profile,
}

impl AuthSession {
    /// Company identifier echoed in operation results
    pub fn company_id(&self) -> Option<&str> {
        self.profile.company_id()
    }
}

impl From<SessionEntry> for AuthSession {
    fn from(entry: SessionEntry) -> Self {
        Self {
            token: entry.token().to_string(),
            profile: entry.profile().clone(),
        }
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &"***")
            .field("profile", &self.profile)
            .finish()
    }
}

/// Exchanges credentials for CRM sessions, consulting the cache first.
pub struct Authenticator<T: HttpTransport> {
    transport: Arc<T>,
    cache: SessionCache,
    mode: AuthMode,
    upnify_base_url: String,
    salesup_base_url: String,
    session_ttl: TimeDelta,
}

impl<T: HttpTransport> Authenticator<T> {
    pub fn new(transport: Arc<T>, cache: SessionCache, config: &UpnifyConfig) -> Self {
        Self {
            transport,
            cache,
            mode: config.auth_mode,
            upnify_base_url: config.upnify_base_url.clone(),
            salesup_base_url: config.salesup_base_url.clone(),
            session_ttl: config.session_ttl,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    /// Return a live session for `credential`, logging in only on a cache miss.
    ///
    /// A credential whose shape does not match the configured [`AuthMode`] is rejected
    /// before any network traffic.
    pub async fn authenticate(&self, credential: &Credential) -> UpnifyResult<AuthSession> {
        if credential.is_blank() {
            return Err(UpnifyError::authentication("credential is empty"));
        }
        if credential.mode() != self.mode {
            return Err(UpnifyError::authentication(format!(
                "{} credential supplied but the client is configured for {} authentication",
                credential.mode(),
                self.mode
            )));
        }

        let key = credential.cache_key();
        if let Some(entry) = self.cache.get(&key).await {
            debug!("Reusing cached CRM session (expires {})", entry.expires_at());
            return Ok(entry.into());
        }

        let login = self.login(credential).await?;
        let expires_at = match login.expires_at {
            Some(expires_at) => expires_at,
            None => {
                if let Some(raw) = login.profile.expiration() {
                    warn!("Unrecognized session expiration '{}', using default lifetime", raw);
                }
                Utc::now()
                    .checked_add_signed(self.session_ttl)
                    .ok_or_else(|| {
                        UpnifyError::configuration(format!(
                            "session lifetime of {}s is out of range",
                            self.session_ttl.num_seconds()
                        ))
                    })?
            }
        };

        let entry = SessionEntry::new(login.token, expires_at, login.profile);
        self.cache.put(key, entry.clone()).await;

        info!(
            "Opened CRM session via {} login for company {} (expires {})",
            self.mode,
            entry.profile().company_id().unwrap_or("unknown"),
            expires_at
        );
        Ok(entry.into())
    }

    async fn login(&self, credential: &Credential) -> UpnifyResult<LoginResponse> {
        let (request, token_field) = match credential {
            Credential::IntegrationToken(token) => (
                CrmRequest::post(&self.salesup_base_url, endpoints::INTEGRATION_LOGIN)
                    .with_header("token", token.trim())
                    .with_header("User-Agent", defaults::USER_AGENT)
                    .with_json(json!({})),
                INTEGRATION_TOKEN_FIELD,
            ),
            Credential::EmailPassword { email, password } => (
                CrmRequest::post(&self.upnify_base_url, endpoints::PASSWORD_LOGIN)
                    .with_header("User-Agent", defaults::USER_AGENT)
                    .with_json(json!({
                        "usuario": email.trim(),
                        "contrasenia": password,
                    })),
                PASSWORD_TOKEN_FIELD,
            ),
        };

        debug!("Logging in to the CRM: {}", request);

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| UpnifyError::authentication(format!("login request failed: {e}")))?;

        if !response.is_success() {
            return Err(UpnifyError::authentication(format!(
                "login rejected with HTTP {}: {}",
                response.status(),
                response.body()
            )));
        }

        LoginResponse::parse(response.body(), token_field).map_err(UpnifyError::authentication)
    }
}

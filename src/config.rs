//! Runtime configuration.
//!
//! [`UpnifyConfig`] holds the CRM base URLs, session lifetime, sweep cadence, the
//! authentication mode and an optional process-wide credential. It can be built in code
//! with the `with_*` methods or loaded from the environment:
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `UPNIFY_BASE_URL` | Upnify API host | `https://api.upnify.com` |
//! | `SALESUP_BASE_URL` | SalesUp host used for integration logins | `https://api.salesup.com` |
//! | `UPNIFY_SESSION_TTL_SECS` | Session lifetime when the CRM sends no expiry | `7200` |
//! | `UPNIFY_SWEEP_INTERVAL_SECS` | Expired-session sweep cadence | `1800` |
//! | `UPNIFY_AUTH_MODE` | `integration` or `password` | inferred |
//! | `TK_INTEGRACION`, `tkIntegracion`, `TK_INTEGRACION_TOKEN` | integration token (first non-blank wins) | none |
//! | `UPNIFY_EMAIL`, `UPNIFY_PASSWORD` | email/password credential | none |
//!
//! When `UPNIFY_AUTH_MODE` is unset the mode follows whichever credential is present,
//! preferring the integration token.

use crate::auth::{AuthMode, Credential};
use crate::endpoints;
use crate::error::{UpnifyError, UpnifyResult};
use chrono::{TimeDelta, Utc};
use std::time::Duration;

const INTEGRATION_TOKEN_VARS: [&str; 3] = ["TK_INTEGRACION", "tkIntegracion", "TK_INTEGRACION_TOKEN"];

/// Configuration for the CRM client.
#[derive(Debug, Clone)]
pub struct UpnifyConfig {
    /// Host for resource endpoints and password logins
    pub upnify_base_url: String,
    /// Host for integration-token logins
    pub salesup_base_url: String,
    /// Lifetime assigned to sessions whose login response carries no expiry
    pub session_ttl: TimeDelta,
    /// How often expired sessions are purged from memory; must be non-zero
    pub sweep_interval: Duration,
    pub auth_mode: AuthMode,
    /// Credential used when a call does not bring its own
    pub default_credential: Option<Credential>,
}

impl Default for UpnifyConfig {
    fn default() -> Self {
        Self {
            upnify_base_url: endpoints::UPNIFY_BASE_URL.to_string(),
            salesup_base_url: endpoints::SALESUP_BASE_URL.to_string(),
            session_ttl: TimeDelta::hours(2),
            sweep_interval: Duration::from_secs(30 * 60),
            auth_mode: AuthMode::IntegrationToken,
            default_credential: None,
        }
    }
}

impl UpnifyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_upnify_base_url(mut self, url: impl Into<String>) -> Self {
        self.upnify_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_salesup_base_url(mut self, url: impl Into<String>) -> Self {
        self.salesup_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Point both hosts at one base URL (local mocks, proxies).
    pub fn with_base_url(self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.with_upnify_base_url(url.clone()).with_salesup_base_url(url)
    }

    pub fn with_session_ttl(mut self, ttl: TimeDelta) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn with_auth_mode(mut self, mode: AuthMode) -> Self {
        self.auth_mode = mode;
        self
    }

    /// Set the default credential; the auth mode follows the credential's shape.
    pub fn with_default_credential(mut self, credential: Credential) -> Self {
        self.auth_mode = credential.mode();
        self.default_credential = Some(credential);
        self
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> UpnifyResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> UpnifyResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();

        if let Some(url) = var("UPNIFY_BASE_URL") {
            config = config.with_upnify_base_url(url);
        }
        if let Some(url) = var("SALESUP_BASE_URL") {
            config = config.with_salesup_base_url(url);
        }
        if let Some(raw) = var("UPNIFY_SESSION_TTL_SECS") {
            let secs = parse_seconds("UPNIFY_SESSION_TTL_SECS", &raw)?;
            let ttl = i64::try_from(secs)
                .ok()
                .and_then(TimeDelta::try_seconds)
                .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
                .ok_or_else(|| {
                    UpnifyError::configuration(format!(
                        "UPNIFY_SESSION_TTL_SECS is out of range: {raw}"
                    ))
                })?;
            config.session_ttl = ttl;
        }
        if let Some(raw) = var("UPNIFY_SWEEP_INTERVAL_SECS") {
            let secs = parse_seconds("UPNIFY_SWEEP_INTERVAL_SECS", &raw)?;
            config.sweep_interval = Duration::from_secs(secs);
        }

        let integration_token = INTEGRATION_TOKEN_VARS.iter().find_map(|name| var(name));
        let password_pair = var("UPNIFY_EMAIL").zip(var("UPNIFY_PASSWORD"));

        let mode = match var("UPNIFY_AUTH_MODE") {
            Some(raw) => raw.parse::<AuthMode>()?,
            None if integration_token.is_none() && password_pair.is_some() => {
                AuthMode::EmailPassword
            }
            None => AuthMode::IntegrationToken,
        };

        config.auth_mode = mode;
        config.default_credential = match mode {
            AuthMode::IntegrationToken => integration_token.map(Credential::integration_token),
            AuthMode::EmailPassword => {
                password_pair.map(|(email, password)| Credential::email_password(email, password))
            }
        };

        Ok(config)
    }
}

fn parse_seconds(name: &str, raw: &str) -> UpnifyResult<u64> {
    match raw.parse::<u64>() {
        Ok(0) => Err(UpnifyError::configuration(format!(
            "{name} must be greater than zero"
        ))),
        Ok(secs) => Ok(secs),
        Err(_) => Err(UpnifyError::configuration(format!(
            "{name} must be a whole number of seconds, got '{raw}'"
        ))),
    }
}

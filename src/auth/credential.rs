//! Credentials and the cache keys derived from them.

use crate::error::UpnifyError;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Which login exchange an [`Authenticator`](super::Authenticator) performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthMode {
    /// Pre-issued integration token, sent as a header
    #[default]
    IntegrationToken,
    /// Email and password, sent as a JSON body
    EmailPassword,
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntegrationToken => write!(f, "integration"),
            Self::EmailPassword => write!(f, "password"),
        }
    }
}

impl FromStr for AuthMode {
    type Err = UpnifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "integration" | "token" | "tkintegracion" => Ok(Self::IntegrationToken),
            "password" | "email" => Ok(Self::EmailPassword),
            other => Err(UpnifyError::configuration(format!(
                "unknown auth mode '{other}', expected 'integration' or 'password'"
            ))),
        }
    }
}

/// A long-lived credential identifying a CRM user.
///
/// `Debug` output never includes secrets.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    IntegrationToken(String),
    EmailPassword { email: String, password: String },
}

impl Credential {
    pub fn integration_token(token: impl Into<String>) -> Self {
        Self::IntegrationToken(token.into())
    }

    pub fn email_password(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self::EmailPassword {
            email: email.into(),
            password: password.into(),
        }
    }

    /// The auth mode this credential belongs to.
    pub fn mode(&self) -> AuthMode {
        match self {
            Self::IntegrationToken(_) => AuthMode::IntegrationToken,
            Self::EmailPassword { .. } => AuthMode::EmailPassword,
        }
    }

    /// True when any component is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::IntegrationToken(token) => token.trim().is_empty(),
            Self::EmailPassword { email, password } => {
                email.trim().is_empty() || password.is_empty()
            }
        }
    }

    /// Key under which this credential's session is cached.
    ///
    /// Integration tokens are used as-is. Passwords never appear in the key: the email is
    /// combined with a SHA-256 digest of the password.
    pub fn cache_key(&self) -> CacheKey {
        match self {
            Self::IntegrationToken(token) => CacheKey(token.trim().to_string()),
            Self::EmailPassword { email, password } => {
                let digest = Sha256::digest(password.as_bytes());
                CacheKey(format!(
                    "{}:{}",
                    email.trim().to_lowercase(),
                    STANDARD.encode(digest)
                ))
            }
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntegrationToken(_) => f.debug_tuple("IntegrationToken").field(&"***").finish(),
            Self::EmailPassword { email, .. } => f
                .debug_struct("EmailPassword")
                .field("email", email)
                .field("password", &"***")
                .finish(),
        }
    }
}

/// Session cache key derived from a [`Credential`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CacheKey(***)")
    }
}

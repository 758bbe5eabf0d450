//! Authentication against the CRM.
//!
//! The CRM issues short-lived session tokens in exchange for a long-lived credential.
//! [`Authenticator`] performs that exchange and keeps the resulting sessions in a
//! [`SessionCache`](crate::session::SessionCache), so only the first call per credential
//! (and the first call after expiry) pays for a login round trip.
//!
//! Two credential shapes exist, each with its own login endpoint:
//!
//! * **Integration token** (primary) - a pre-issued token sent as the `token` header with
//!   an empty JSON body to the SalesUp host
//! * **Email and password** (alternate) - sent as a JSON body to the Upnify host
//!
//! An authenticator runs in exactly one [`AuthMode`]; credentials of the other shape are
//! rejected, so both kinds never share one cache keyspace.
//!
//! # Example Usage
//!
//! ```rust
//! use upnify_mcp::auth::{Authenticator, Credential};
//! use upnify_mcp::session::SessionCache;
//! use upnify_mcp::transport::{CrmResponse, HttpMethod, ScriptedTransport};
//! use upnify_mcp::UpnifyConfig;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = ScriptedTransport::new();
//! transport.respond(
//!     HttpMethod::Post,
//!     "/integraciones/sesion",
//!     CrmResponse::json(200, &json!([{"token": "SES-1", "tkEmpresa": "EMP-1"}])),
//! );
//!
//! let authenticator = Authenticator::new(
//!     Arc::new(transport.clone()),
//!     SessionCache::new(),
//!     &UpnifyConfig::default(),
//! );
//! let credential = Credential::integration_token("P0-INTEGRATION");
//!
//! let session = authenticator.authenticate(&credential).await?;
//! assert_eq!(session.token, "SES-1");
//!
//! // Second call is served from the cache
//! authenticator.authenticate(&credential).await?;
//! assert_eq!(transport.request_count(), 1);
//! # Ok(())
//! # }
//! ```

pub mod authenticator;
pub mod credential;
pub mod login;

pub use authenticator::{AuthSession, Authenticator};
pub use credential::{AuthMode, CacheKey, Credential};

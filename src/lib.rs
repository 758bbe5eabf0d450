//! Upnify CRM adapter for the Model Context Protocol.
//!
//! Exchanges long-lived CRM credentials for short-lived session tokens, caches those
//! sessions until they expire, and translates typed operation parameters into the
//! CRM's wire formats (JSON bodies, form-urlencoded bodies and query strings).
//!
//! # Core Components
//!
//! - [`UpnifyClient`] - Authenticated resource operations (prospects, opportunities,
//!   reports, reminders, contact search, phase catalog)
//! - [`Authenticator`](auth::Authenticator) - Credential-to-session exchange
//! - [`SessionCache`](session::SessionCache) - Expiry-aware session store with a
//!   background sweeper
//! - [`HttpTransport`](transport::HttpTransport) - Seam between operations and HTTP
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use upnify_mcp::{UpnifyClient, UpnifyConfig};
//! use upnify_mcp::auth::Credential;
//! use upnify_mcp::operations::NewOpportunity;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = UpnifyClient::new(UpnifyConfig::from_env()?);
//! let _sweeper = client.spawn_sweeper();
//!
//! let credential = Credential::integration_token("P0-...");
//! let outcome = client
//!     .create_opportunity(&credential, &NewOpportunity::new("Licencias", "PRO-1", 1000.0, 0.15))
//!     .await?;
//! println!("{}", outcome.to_envelope());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod defaults;
pub mod endpoints;
pub mod error;
/// Model Context Protocol integration for AI agents.
///
/// This module is only available when the `mcp` feature is enabled.
#[cfg(feature = "mcp")]
pub mod mcp_integration;
pub mod operations;
pub mod session;
pub mod transport;

// Re-export commonly used types for convenience
pub use config::UpnifyConfig;
pub use error::{UpnifyError, UpnifyResult, ValidationError};
pub use operations::{Operation, OperationOutcome, UpnifyClient};

#[cfg(feature = "mcp")]
pub use mcp_integration::{McpServerInfo, UpnifyMcpServer, UpnifyToolResult};

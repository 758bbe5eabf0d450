//! MCP (Model Context Protocol) integration for the Upnify CRM
//!
//! Exposes the CRM operations of [`UpnifyClient`](crate::UpnifyClient) as tools that AI
//! agents can discover and call over JSON-RPC 2.0 on stdio.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐    ┌──────────┐
//! │   AI Agent      │───▶│  MCP Protocol    │───▶│  UpnifyClient   │───▶│  CRM API │
//! │   (Client)      │    │  (This Module)   │    │  (Operations)   │    │          │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘    └──────────┘
//!          │                        │                       │
//!          ▼                        ▼                       ▼
//!    Tool Discovery         Argument Extraction      Session Cache
//!    JSON-RPC Framing       Credential Resolution    Wire Encoding
//! ```
//!
//! ## Module Structure
//!
//! - `core` - Server wrapper and result types (McpServerInfo, UpnifyToolResult, UpnifyMcpServer)
//! - `protocol` - Tool discovery, dispatch, JSON-RPC handling and the stdio loop
//! - `tools/` - JSON schema definitions for tool discovery
//! - `handlers/` - Tool execution handlers
//!
//! ## Credentials
//!
//! Every tool accepts an optional `tkIntegracion` argument, or `email` and `password`
//! when the server runs in password mode. Without them the credential configured
//! through the environment is used.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use upnify_mcp::{UpnifyClient, UpnifyConfig, mcp_integration::UpnifyMcpServer};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = UpnifyClient::new(UpnifyConfig::from_env()?);
//!     let mcp_server = UpnifyMcpServer::new(client);
//!
//!     let result = mcp_server
//!         .execute_tool(
//!             "search-upnify-contacts",
//!             json!({"tkIntegracion": "P0-...", "buscar": "Ana"}),
//!         )
//!         .await;
//!
//!     if result.success {
//!         println!("{}", result.content);
//!     }
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod handlers;
pub mod protocol;
pub mod tools;


pub use self::core::{McpServerInfo, UpnifyMcpServer, UpnifyToolResult};

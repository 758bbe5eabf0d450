//! Core MCP integration types
//!
//! The server wrapper and the result type every tool handler produces.

use crate::operations::UpnifyClient;
use crate::transport::{HttpTransport, ReqwestTransport};
use serde_json::{Value, json};

/// Information about the MCP server for AI agent discovery
///
/// # Examples
///
/// ```rust
/// use upnify_mcp::mcp_integration::McpServerInfo;
///
/// let server_info = McpServerInfo {
///     name: "upnify-ventas".to_string(),
///     version: "1.2.0".to_string(),
///     description: "Upnify tools for the sales team".to_string(),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct McpServerInfo {
    /// Name reported in the `initialize` handshake
    pub name: String,
    pub version: String,
    /// Sent to the agent as usage instructions
    pub description: String,
}

impl Default for McpServerInfo {
    fn default() -> Self {
        Self {
            name: "upnify-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Upnify CRM tools: create prospects and opportunities, search \
                          contacts, schedule reminders and read sales, payment, activity \
                          and conversion reports"
                .to_string(),
        }
    }
}

/// Tool execution result for MCP clients
///
/// # Examples
///
/// ```rust
/// use upnify_mcp::mcp_integration::UpnifyToolResult;
/// use serde_json::json;
///
/// let error_result = UpnifyToolResult {
///     success: false,
///     content: json!({"success": false, "error": "Validation error: Missing required fields: buscar"}),
///     metadata: Some(json!({"error_code": "VALIDATION_FAILED"})),
/// };
/// assert!(!error_result.success);
/// ```
#[derive(Debug, Clone)]
pub struct UpnifyToolResult {
    /// Whether the tool execution was successful
    pub success: bool,
    /// Result envelope or error details
    pub content: Value,
    pub metadata: Option<Value>,
}

impl UpnifyToolResult {
    pub fn failure(error: impl Into<String>, error_code: &str) -> Self {
        Self {
            success: false,
            content: json!({
                "success": false,
                "error": error.into(),
                "error_code": error_code,
            }),
            metadata: Some(json!({ "error_code": error_code })),
        }
    }
}

/// MCP server wrapper for Upnify operations
///
/// # Examples
///
/// ```rust,no_run
/// use upnify_mcp::{UpnifyClient, UpnifyConfig, mcp_integration::UpnifyMcpServer};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///     let client = UpnifyClient::new(UpnifyConfig::default());
///     let mcp_server = UpnifyMcpServer::new(client);
///
///     println!("Available tools: {}", mcp_server.get_tools().len());
///     mcp_server.run_stdio().await
/// }
/// ```
pub struct UpnifyMcpServer<T: HttpTransport = ReqwestTransport> {
    pub(crate) client: UpnifyClient<T>,
    pub(crate) server_info: McpServerInfo,
}

impl<T: HttpTransport> UpnifyMcpServer<T> {
    /// Create a new MCP server with default server information
    pub fn new(client: UpnifyClient<T>) -> Self {
        Self::with_info(client, McpServerInfo::default())
    }

    pub fn with_info(client: UpnifyClient<T>, server_info: McpServerInfo) -> Self {
        Self {
            client,
            server_info,
        }
    }

    pub fn server_info(&self) -> &McpServerInfo {
        &self.server_info
    }

    pub fn client(&self) -> &UpnifyClient<T> {
        &self.client
    }
}

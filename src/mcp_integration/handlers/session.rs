//! Session handlers

use super::{error_result, resolve_credential, tool_result};
use crate::mcp_integration::core::{UpnifyMcpServer, UpnifyToolResult};
use crate::transport::HttpTransport;
use serde_json::Value;

/// Handle `upnify-login`: authenticate and describe the session owner.
pub async fn handle_login<T: HttpTransport>(
    server: &UpnifyMcpServer<T>,
    arguments: Value,
) -> UpnifyToolResult {
    const TOOL: &str = "upnify-login";
    match resolve_credential(server, &arguments) {
        Ok(credential) => tool_result(TOOL, server.client.session_info(&credential).await),
        Err(e) => error_result(TOOL, &e),
    }
}

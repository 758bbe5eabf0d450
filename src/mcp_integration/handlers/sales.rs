//! Opportunity and reminder handlers

use super::{error_result, prepare, tool_result};
use crate::mcp_integration::core::{UpnifyMcpServer, UpnifyToolResult};
use crate::operations::{NewOpportunity, NewReminder};
use crate::transport::HttpTransport;
use serde_json::Value;

/// Handle `create-upnify-opportunity`
///
/// # Errors
///
/// Returns an error result if:
/// - `concepto`, `tkProspecto`, `monto` or `comision` is missing or invalid
/// - no credential is available or login fails
/// - the CRM rejects the opportunity (`OPPORTUNITY_CREATION_FAILED`)
pub async fn handle_create_opportunity<T: HttpTransport>(
    server: &UpnifyMcpServer<T>,
    arguments: Value,
) -> UpnifyToolResult {
    const TOOL: &str = "create-upnify-opportunity";
    let (credential, opportunity) = match prepare::<T, NewOpportunity>(server, &arguments) {
        Ok(prepared) => prepared,
        Err(e) => return error_result(TOOL, &e),
    };
    tool_result(
        TOOL,
        server.client.create_opportunity(&credential, &opportunity).await,
    )
}

/// Handle `create-upnify-reminder`
pub async fn handle_create_reminder<T: HttpTransport>(
    server: &UpnifyMcpServer<T>,
    arguments: Value,
) -> UpnifyToolResult {
    const TOOL: &str = "create-upnify-reminder";
    let (credential, reminder) = match prepare::<T, NewReminder>(server, &arguments) {
        Ok(prepared) => prepared,
        Err(e) => return error_result(TOOL, &e),
    };
    tool_result(TOOL, server.client.create_reminder(&credential, &reminder).await)
}

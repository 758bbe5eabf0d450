//! Prospect, phase and contact search handlers

use super::{error_result, prepare, resolve_credential, tool_result};
use crate::mcp_integration::core::{UpnifyMcpServer, UpnifyToolResult};
use crate::operations::{ContactSearchQuery, NewProspect};
use crate::transport::HttpTransport;
use serde_json::Value;

/// Handle `create-upnify-prospect`
///
/// # Errors
///
/// Returns an error result if:
/// - `nombre` or `correo` is missing (`VALIDATION_FAILED`)
/// - no credential is available or login fails (`AUTHENTICATION_FAILED`)
/// - the CRM rejects the prospect (`PROSPECT_CREATION_FAILED`)
pub async fn handle_create_prospect<T: HttpTransport>(
    server: &UpnifyMcpServer<T>,
    arguments: Value,
) -> UpnifyToolResult {
    const TOOL: &str = "create-upnify-prospect";
    let (credential, prospect) = match prepare::<T, NewProspect>(server, &arguments) {
        Ok(prepared) => prepared,
        Err(e) => return error_result(TOOL, &e),
    };
    tool_result(TOOL, server.client.create_prospect(&credential, &prospect).await)
}

/// Handle `get-upnify-phases`
pub async fn handle_get_phases<T: HttpTransport>(
    server: &UpnifyMcpServer<T>,
    arguments: Value,
) -> UpnifyToolResult {
    const TOOL: &str = "get-upnify-phases";
    match resolve_credential(server, &arguments) {
        Ok(credential) => tool_result(TOOL, server.client.phase_catalog(&credential).await),
        Err(e) => error_result(TOOL, &e),
    }
}

/// Handle `search-upnify-contacts`
pub async fn handle_search_contacts<T: HttpTransport>(
    server: &UpnifyMcpServer<T>,
    arguments: Value,
) -> UpnifyToolResult {
    const TOOL: &str = "search-upnify-contacts";
    let (credential, query) = match prepare::<T, ContactSearchQuery>(server, &arguments) {
        Ok(prepared) => prepared,
        Err(e) => return error_result(TOOL, &e),
    };
    tool_result(TOOL, server.client.search_contacts(&credential, &query).await)
}

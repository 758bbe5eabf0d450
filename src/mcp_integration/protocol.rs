//! MCP protocol layer for tool discovery and dispatch
//!
//! Implements the subset of MCP the server needs over JSON-RPC 2.0: the `initialize`
//! handshake, `ping`, `tools/list` and `tools/call`. Messages are newline-delimited
//! JSON on stdin/stdout; logging goes to stderr so it never corrupts the stream.

use super::core::{UpnifyMcpServer, UpnifyToolResult};
use super::handlers::{prospects, reports, sales, session};
use super::tools::{self, CREDENTIAL_ARGUMENTS};
use crate::transport::HttpTransport;
use log::{debug, info, warn};
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use uuid::Uuid;

/// MCP revision assumed when the client does not name one
pub const PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

fn rpc_result(id: Value, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

fn rpc_error(id: Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message }
    })
}

/// Copy of the arguments with credential values masked, for logging.
fn redacted(arguments: &Value) -> Value {
    let mut copy = arguments.clone();
    if let Some(object) = copy.as_object_mut() {
        for name in CREDENTIAL_ARGUMENTS {
            if let Some(value) = object.get_mut(name) {
                *value = json!("***");
            }
        }
    }
    copy
}

impl<T: HttpTransport> UpnifyMcpServer<T> {
    /// Get the list of available MCP tools as JSON
    ///
    /// # Examples
    ///
    /// ```rust
    /// use upnify_mcp::{UpnifyClient, UpnifyConfig, mcp_integration::UpnifyMcpServer};
    /// use upnify_mcp::transport::ScriptedTransport;
    ///
    /// let client = UpnifyClient::with_transport(UpnifyConfig::default(), ScriptedTransport::new());
    /// let mcp_server = UpnifyMcpServer::new(client);
    /// assert_eq!(mcp_server.get_tools().len(), 10);
    /// ```
    pub fn get_tools(&self) -> Vec<Value> {
        vec![
            tools::login_tool(),
            tools::create_prospect_tool(),
            tools::get_phases_tool(),
            tools::search_contacts_tool(),
            tools::create_opportunity_tool(),
            tools::sales_report_tool(),
            tools::pending_payments_tool(),
            tools::activity_report_tool(),
            tools::conversion_report_tool(),
            tools::create_reminder_tool(),
        ]
    }

    /// Execute a tool by name with arguments
    ///
    /// Routes the call to the handler for `tool_name`. Failures never escape as errors;
    /// they are rendered into an unsuccessful [`UpnifyToolResult`].
    pub async fn execute_tool(&self, tool_name: &str, arguments: Value) -> UpnifyToolResult {
        let request_id = Uuid::new_v4();
        debug!(
            "[{}] Executing MCP tool: {} with args: {}",
            request_id,
            tool_name,
            redacted(&arguments)
        );

        let mut result = match tool_name {
            "upnify-login" => session::handle_login(self, arguments).await,

            // Prospects and contacts
            "create-upnify-prospect" => prospects::handle_create_prospect(self, arguments).await,
            "get-upnify-phases" => prospects::handle_get_phases(self, arguments).await,
            "search-upnify-contacts" => prospects::handle_search_contacts(self, arguments).await,

            // Opportunities and agenda
            "create-upnify-opportunity" => sales::handle_create_opportunity(self, arguments).await,
            "create-upnify-reminder" => sales::handle_create_reminder(self, arguments).await,

            // Reports
            "get-upnify-sales-report" => reports::handle_sales_report(self, arguments).await,
            "get-upnify-pending-payments" => reports::handle_pending_payments(self, arguments).await,
            "get-upnify-activity-report" => reports::handle_activity_report(self, arguments).await,
            "get-upnify-conversion-report" => {
                reports::handle_conversion_report(self, arguments).await
            }

            _ => UpnifyToolResult {
                success: false,
                content: json!({
                    "success": false,
                    "error": format!("Unknown tool: {tool_name}"),
                    "error_code": "UNKNOWN_TOOL",
                    "tool_name": tool_name
                }),
                metadata: None,
            },
        };

        if !result.success {
            warn!("[{}] Tool {} failed: {}", request_id, tool_name, result.content["error"]);
        }
        let metadata = result.metadata.get_or_insert_with(|| json!({}));
        metadata["request_id"] = json!(request_id.to_string());
        result
    }

    /// Handle one JSON-RPC message.
    ///
    /// Returns the response to write back, or `None` for notifications.
    pub async fn handle_message(&self, message: Value) -> Option<Value> {
        let id = message.get("id").cloned();
        let Some(method) = message.get("method").and_then(Value::as_str) else {
            return id.map(|id| rpc_error(id, INVALID_REQUEST, "Invalid Request"));
        };

        let Some(id) = id else {
            debug!("Notification received: {}", method);
            return None;
        };
        let params = message.get("params").cloned().unwrap_or(Value::Null);

        let response = match method {
            "initialize" => {
                let version = params
                    .get("protocolVersion")
                    .and_then(Value::as_str)
                    .unwrap_or(PROTOCOL_VERSION);
                info!("MCP client connected (protocol {})", version);
                rpc_result(
                    id,
                    json!({
                        "protocolVersion": version,
                        "capabilities": { "tools": {} },
                        "serverInfo": {
                            "name": self.server_info.name,
                            "version": self.server_info.version
                        },
                        "instructions": self.server_info.description
                    }),
                )
            }
            "ping" => rpc_result(id, json!({})),
            "tools/list" => rpc_result(id, json!({ "tools": self.get_tools() })),
            "tools/call" => {
                let Some(name) = params.get("name").and_then(Value::as_str) else {
                    return Some(rpc_error(id, INVALID_PARAMS, "tools/call requires a tool name"));
                };
                let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));
                let result = self.execute_tool(name, arguments).await;
                let text = serde_json::to_string_pretty(&result.content)
                    .unwrap_or_else(|_| result.content.to_string());
                rpc_result(
                    id,
                    json!({
                        "content": [{ "type": "text", "text": text }],
                        "isError": !result.success
                    }),
                )
            }
            other => rpc_error(id, METHOD_NOT_FOUND, &format!("Method not found: {other}")),
        };
        Some(response)
    }

    /// Handle one line of input; unparseable JSON gets a parse error response.
    pub async fn handle_line(&self, line: &str) -> Option<Value> {
        match serde_json::from_str::<Value>(line) {
            Ok(message) => self.handle_message(message).await,
            Err(e) => {
                warn!("Discarding unparseable message: {}", e);
                Some(rpc_error(Value::Null, PARSE_ERROR, "Parse error"))
            }
        }
    }

    /// Run the MCP server using stdio communication
    ///
    /// Reads newline-delimited JSON-RPC messages from stdin until it closes.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use upnify_mcp::{UpnifyClient, UpnifyConfig, mcp_integration::UpnifyMcpServer};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    /// let mcp_server = UpnifyMcpServer::new(UpnifyClient::new(UpnifyConfig::from_env()?));
    /// mcp_server.run_stdio().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_stdio(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("Upnify MCP server ready for stdio communication");
        info!(
            "Available tools: {:?}",
            self.get_tools()
                .iter()
                .filter_map(|t| t.get("name").and_then(Value::as_str))
                .collect::<Vec<_>>()
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(&line).await {
                let mut payload = serde_json::to_vec(&response)?;
                payload.push(b'\n');
                stdout.write_all(&payload).await?;
                stdout.flush().await?;
            }
        }

        info!("stdin closed, shutting down");
        Ok(())
    }
}

//! Upnify MCP stdio server
//!
//! Exposes the Upnify CRM operations as MCP tools over newline-delimited JSON-RPC on
//! stdin/stdout. Configuration comes from the environment (see [`UpnifyConfig::from_env`]);
//! logs go to stderr and honour `RUST_LOG`.
//!
//! ## Usage
//!
//! ```bash
//! TK_INTEGRACION=P07-... cargo run --bin upnify-mcp
//! ```
//!
//! ### Initialize the server:
//! ```json
//! {"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test-client","version":"1.0.0"}}}
//! ```
//!
//! ### Search contacts:
//! ```json
//! {"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"search-upnify-contacts","arguments":{"buscar":"Ana"}}}
//! ```

use log::{error, info};
use upnify_mcp::{UpnifyClient, UpnifyConfig, UpnifyMcpServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = match UpnifyConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Starting Upnify MCP server ({} auth, default credential {})",
        config.auth_mode,
        if config.default_credential.is_some() {
            "configured"
        } else {
            "not configured"
        }
    );

    let client = UpnifyClient::new(config);
    let sweeper = client.spawn_sweeper();

    let result = UpnifyMcpServer::new(client).run_stdio().await;
    sweeper.abort();
    result
}

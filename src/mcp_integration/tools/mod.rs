//! MCP tool schema definitions
//!
//! Tool schemas are organized by functional area:
//! - [`session_schemas`] - Login and session introspection
//! - [`prospect_schemas`] - Prospect creation, phase catalog and contact search
//! - [`sales_schemas`] - Opportunities and reminders
//! - [`report_schemas`] - Sales, pending payment, activity and conversion reports
//!
//! Each schema defines the tool name, a description for the agent and a JSON Schema for
//! the arguments. Credential arguments are appended by [`tool`] so every tool accepts
//! them the same way.

pub mod prospect_schemas;
pub mod report_schemas;
pub mod sales_schemas;
pub mod session_schemas;

pub use prospect_schemas::*;
pub use report_schemas::*;
pub use sales_schemas::*;
pub use session_schemas::*;

use serde_json::{Map, Value, json};

/// Argument names that carry the caller's credential
pub const CREDENTIAL_ARGUMENTS: [&str; 3] = ["tkIntegracion", "email", "password"];

fn credential_properties() -> Value {
    json!({
        "tkIntegracion": {
            "type": "string",
            "description": "Upnify integration token. Optional when the server was started with TK_INTEGRACION"
        },
        "email": {
            "type": "string",
            "description": "Upnify user email (password mode only)"
        },
        "password": {
            "type": "string",
            "description": "Upnify user password (password mode only)"
        }
    })
}

/// Assemble a tool declaration, adding the credential arguments to `properties`.
pub fn tool(name: &str, description: &str, properties: Value, required: &[&str]) -> Value {
    let mut merged = match properties {
        Value::Object(properties) => properties,
        _ => Map::new(),
    };
    if let Value::Object(credentials) = credential_properties() {
        merged.extend(credentials);
    }

    json!({
        "name": name,
        "description": description,
        "inputSchema": {
            "type": "object",
            "properties": merged,
            "required": required,
        }
    })
}

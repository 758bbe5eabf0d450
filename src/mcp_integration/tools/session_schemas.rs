//! Session tool schema definitions

use super::tool;
use serde_json::{Value, json};

/// Schema definition for the login tool
///
/// Opens (or reuses) a CRM session and reports who it belongs to.
pub fn login_tool() -> Value {
    tool(
        "upnify-login",
        "Authenticate with Upnify and show the user and company the session belongs to",
        json!({}),
        &[],
    )
}

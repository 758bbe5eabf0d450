//! Opportunity and reminder tool schema definitions

use super::tool;
use serde_json::{Value, json};

/// Schema definition for opportunity creation
///
/// The commission amount and estimated close date are derived when omitted.
pub fn create_opportunity_tool() -> Value {
    tool(
        "create-upnify-opportunity",
        "Create a sales opportunity for an existing prospect. The commission amount is \
         calculated as monto * comision and the estimated close date defaults to 30 days \
         from today",
        json!({
            "concepto": {
                "type": "string",
                "description": "What is being sold"
            },
            "tkProspecto": {
                "type": "string",
                "description": "Prospect token, as returned by search-upnify-contacts"
            },
            "monto": {
                "type": "number",
                "description": "Deal amount",
                "minimum": 0
            },
            "comision": {
                "type": "number",
                "description": "Commission rate as a decimal (0.15 = 15%)",
                "minimum": 0,
                "maximum": 1
            },
            "comisionMonto": {
                "type": "number",
                "description": "Commission amount, overrides the calculated value"
            },
            "cierreEstimado": {
                "type": "string",
                "description": "Estimated close date (YYYY-MM-DD)"
            }
        }),
        &["concepto", "tkProspecto", "monto", "comision"],
    )
}

/// Schema definition for reminder creation
pub fn create_reminder_tool() -> Value {
    tool(
        "create-upnify-reminder",
        "Schedule a reminder in the Upnify agenda",
        json!({
            "asunto": {
                "type": "string",
                "description": "Subject"
            },
            "descripcion": {
                "type": "string",
                "description": "Details"
            },
            "fechaInicio": {
                "type": "string",
                "description": "Start date and time (YYYY-MM-DD HH:MM)"
            },
            "tkProspecto": {
                "type": "string",
                "description": "Prospect to attach the reminder to"
            },
            "tkOportunidad": {
                "type": "string",
                "description": "Opportunity to attach the reminder to"
            }
        }),
        &["asunto", "descripcion", "fechaInicio"],
    )
}

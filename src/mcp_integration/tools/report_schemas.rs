//! Report tool schema definitions
//!
//! Option descriptions are generated from the label tables so the agent sees the same
//! codes the results are labelled with.

use super::tool;
use crate::defaults::labels;
use chrono::{Datelike, Utc};
use serde_json::{Value, json};

fn code_parameter(description: &str, table: &[(u32, &str)], default: u32) -> Value {
    let options = table
        .iter()
        .map(|(code, label)| format!("{code} = {label}"))
        .collect::<Vec<_>>()
        .join(", ");
    let codes: Vec<u32> = table.iter().map(|(code, _)| *code).collect();

    json!({
        "type": "integer",
        "description": format!("{description}: {options}"),
        "enum": codes,
        "default": default
    })
}

fn flag_parameter(description: &str) -> Value {
    json!({
        "type": "integer",
        "description": description,
        "enum": [0, 1],
        "default": 0
    })
}

pub fn sales_report_tool() -> Value {
    tool(
        "get-upnify-sales-report",
        "Get the closed sales report grouped and bucketed by period",
        json!({
            "agrupacion": code_parameter("Group by", labels::SALES_GROUPING, 17),
            "periodicidad": code_parameter("Periodicity", labels::PERIODICITY, 6),
            "anio": {
                "type": "integer",
                "description": "Year, defaults to the current year",
                "default": Utc::now().year()
            },
            "impuestos": flag_parameter("Taxes: 0 = exclude, 1 = include")
        }),
        &["agrupacion", "periodicidad"],
    )
}

pub fn pending_payments_tool() -> Value {
    tool(
        "get-upnify-pending-payments",
        "Get outstanding client payments",
        json!({
            "agrupacion": code_parameter("Group by", labels::SALES_GROUPING, 1),
            "periodicidad": code_parameter("Periodicity", labels::PERIODICITY, 4)
        }),
        &["agrupacion", "periodicidad"],
    )
}

pub fn activity_report_tool() -> Value {
    tool(
        "get-upnify-activity-report",
        "Get the activity report for a period",
        json!({
            "agrupacion": code_parameter("Group by", labels::ACTIVITY_GROUPING, 2),
            "periodo": code_parameter("Period", labels::PERIOD, 17)
        }),
        &["agrupacion", "periodo"],
    )
}

pub fn conversion_report_tool() -> Value {
    tool(
        "get-upnify-conversion-report",
        "Get the prospect-to-client conversion report for a period",
        json!({
            "agrupacion": code_parameter("Group by", labels::CONVERSION_GROUPING, 2),
            "periodo": code_parameter("Period", labels::PERIOD, 5),
            "situacion": flag_parameter("Situation: 0 = include discarded, 1 = exclude discarded")
        }),
        &["agrupacion", "periodo", "situacion"],
    )
}

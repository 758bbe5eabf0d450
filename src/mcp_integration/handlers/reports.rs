//! Report handlers

use super::{error_result, prepare, tool_result};
use crate::mcp_integration::core::{UpnifyMcpServer, UpnifyToolResult};
use crate::operations::{
    ActivityReportQuery, ConversionReportQuery, PendingPaymentsQuery, SalesReportQuery,
};
use crate::transport::HttpTransport;
use serde_json::Value;

pub async fn handle_sales_report<T: HttpTransport>(
    server: &UpnifyMcpServer<T>,
    arguments: Value,
) -> UpnifyToolResult {
    const TOOL: &str = "get-upnify-sales-report";
    match prepare::<T, SalesReportQuery>(server, &arguments) {
        Ok((credential, query)) => {
            tool_result(TOOL, server.client.sales_report(&credential, &query).await)
        }
        Err(e) => error_result(TOOL, &e),
    }
}

pub async fn handle_pending_payments<T: HttpTransport>(
    server: &UpnifyMcpServer<T>,
    arguments: Value,
) -> UpnifyToolResult {
    const TOOL: &str = "get-upnify-pending-payments";
    match prepare::<T, PendingPaymentsQuery>(server, &arguments) {
        Ok((credential, query)) => {
            tool_result(TOOL, server.client.pending_payments(&credential, &query).await)
        }
        Err(e) => error_result(TOOL, &e),
    }
}

pub async fn handle_activity_report<T: HttpTransport>(
    server: &UpnifyMcpServer<T>,
    arguments: Value,
) -> UpnifyToolResult {
    const TOOL: &str = "get-upnify-activity-report";
    match prepare::<T, ActivityReportQuery>(server, &arguments) {
        Ok((credential, query)) => {
            tool_result(TOOL, server.client.activity_report(&credential, &query).await)
        }
        Err(e) => error_result(TOOL, &e),
    }
}

pub async fn handle_conversion_report<T: HttpTransport>(
    server: &UpnifyMcpServer<T>,
    arguments: Value,
) -> UpnifyToolResult {
    const TOOL: &str = "get-upnify-conversion-report";
    match prepare::<T, ConversionReportQuery>(server, &arguments) {
        Ok((credential, query)) => {
            tool_result(TOOL, server.client.conversion_report(&credential, &query).await)
        }
        Err(e) => error_result(TOOL, &e),
    }
}

//! A scripted agent session through the JSON-RPC surface.

use crate::common::{fixtures, scripted_client};
use serde_json::{Value, json};
use upnify_mcp::auth::Credential;
use upnify_mcp::endpoints;
use upnify_mcp::transport::{CrmResponse, HttpMethod, ScriptedTransport};
use upnify_mcp::{UpnifyConfig, UpnifyMcpServer};

fn server_with_default_credential() -> (UpnifyMcpServer<ScriptedTransport>, ScriptedTransport) {
    let config = UpnifyConfig::new()
        .with_default_credential(Credential::integration_token(fixtures::INTEGRATION_TOKEN));
    let (client, transport) = scripted_client(config);
    (UpnifyMcpServer::new(client), transport)
}

/// Parse the text content of a `tools/call` response
fn tool_content(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"]
        .as_str()
        .expect("tools/call response should carry text content");
    serde_json::from_str(text).expect("tool content should be JSON")
}

async fn call(server: &UpnifyMcpServer<ScriptedTransport>, id: i64, name: &str, arguments: Value) -> Value {
    let line = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })
    .to_string();
    server.handle_line(&line).await.expect("requests always get a response")
}

#[tokio::test]
async fn test_agent_session_search_then_create_opportunity() {
    let (server, transport) = server_with_default_credential();
    transport
        .respond(
            HttpMethod::Get,
            endpoints::SEARCH,
            CrmResponse::json(200, &fixtures::search_response()),
        )
        .respond(
            HttpMethod::Post,
            endpoints::OPPORTUNITIES,
            CrmResponse::json(200, &json!({"tkOportunidad": "OPO-1"})),
        );

    let init = server
        .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test-client","version":"1.0.0"}}}"#)
        .await
        .unwrap();
    assert_eq!(init["result"]["capabilities"], json!({"tools": {}}));
    assert!(
        server
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await
            .is_none()
    );

    let search = call(&server, 2, "search-upnify-contacts", json!({"buscar": "Ana"})).await;
    let found = tool_content(&search);
    assert_eq!(found["success"], true);
    let prospect = found["data"]["contactos"][0]["tkProspecto"].as_str().unwrap().to_string();

    let created = call(
        &server,
        3,
        "create-upnify-opportunity",
        json!({
            "concepto": "Licencias",
            "tkProspecto": prospect,
            "monto": 5000,
            "comision": "0.2"
        }),
    )
    .await;
    assert_eq!(created["id"], 3);
    assert_eq!(created["result"]["isError"], false);
    let content = tool_content(&created);
    assert_eq!(content["data"]["detalles"]["comisionMonto"], 1000.0);
    assert_eq!(content["tkEmpresa"], fixtures::COMPANY_ID);

    assert_eq!(transport.requests_to(endpoints::INTEGRATION_LOGIN).len(), 1);
    assert_eq!(
        transport.requests_to(endpoints::OPPORTUNITIES)[0].form_field("tkProspecto"),
        Some("PRO-ANA")
    );
}

#[tokio::test]
async fn test_failed_tool_is_reported_in_band() {
    let (server, transport) = server_with_default_credential();
    transport.respond(
        HttpMethod::Post,
        endpoints::PROSPECTS,
        CrmResponse::new(422, "correo duplicado"),
    );

    let response = call(
        &server,
        5,
        "create-upnify-prospect",
        json!({"nombre": "Ana", "correo": "ana@acme.mx", "tkFase": "PFAS-NUEVO"}),
    )
    .await;

    assert!(response.get("error").is_none());
    assert_eq!(response["result"]["isError"], true);
    let content = tool_content(&response);
    assert_eq!(content["error_code"], "PROSPECT_CREATION_FAILED");
    assert!(content["error"].as_str().unwrap().contains("correo duplicado"));
    assert_eq!(content["payload"]["nombre"], "Ana");
    assert_eq!(content["payload"]["correo"], "ana@acme.mx");
    assert!(!content["payload"].to_string().contains(fixtures::SESSION_TOKEN));
}

#[tokio::test]
async fn test_call_credential_overrides_default() {
    let (server, transport) = server_with_default_credential();

    let response = call(&server, 6, "upnify-login", json!({"tkIntegracion": "P07-CALLER"})).await;

    assert_eq!(response["result"]["isError"], false);
    let login = &transport.requests_to(endpoints::INTEGRATION_LOGIN)[0];
    assert_eq!(login.header("token"), Some("P07-CALLER"));
}

#[tokio::test]
async fn test_report_tool_schemas_describe_codes() {
    let (server, _) = server_with_default_credential();

    let tools = server.get_tools();
    let sales = tools
        .iter()
        .find(|tool| tool["name"] == "get-upnify-sales-report")
        .unwrap();

    let required = sales["inputSchema"]["required"].as_array().unwrap();
    assert!(required.contains(&json!("agrupacion")));
    assert!(required.contains(&json!("periodicidad")));
    let description = sales["inputSchema"]["properties"]["agrupacion"]["description"]
        .as_str()
        .unwrap();
    assert!(description.contains("17"));
}

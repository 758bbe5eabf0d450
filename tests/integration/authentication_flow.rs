//! Login, session reuse and expiry through the public client API.

use crate::common::{fixtures, scripted_client};
use crate::{assert_error_code, assert_error_message_contains};
use chrono::Utc;
use serde_json::json;
use std::time::Duration;
use upnify_mcp::auth::AuthMode;
use upnify_mcp::endpoints;
use upnify_mcp::operations::ContactSearchQuery;
use upnify_mcp::session::SessionCache;
use upnify_mcp::transport::{CrmResponse, HttpMethod, ScriptedTransport};
use upnify_mcp::{UpnifyClient, UpnifyConfig};

#[tokio::test]
async fn test_session_reused_across_operations() {
    let (client, transport) = scripted_client(UpnifyConfig::default());
    transport.respond(
        HttpMethod::Get,
        endpoints::SEARCH,
        CrmResponse::json(200, &fixtures::search_response()),
    );
    let credential = fixtures::integration_credential();

    client.session_info(&credential).await.unwrap();
    client
        .search_contacts(&credential, &ContactSearchQuery::new("Ana"))
        .await
        .unwrap();
    client
        .search_contacts(&credential, &ContactSearchQuery::new("Luis"))
        .await
        .unwrap();

    assert_eq!(transport.requests_to(endpoints::INTEGRATION_LOGIN).len(), 1);
    for search in transport.requests_to(endpoints::SEARCH) {
        assert_eq!(search.header("token"), Some(fixtures::SESSION_TOKEN));
        assert_eq!(search.base_url(), endpoints::UPNIFY_BASE_URL);
    }
}

#[tokio::test]
async fn test_clients_sharing_a_cache_share_sessions() {
    let cache = SessionCache::new();
    let transport = crate::common::scripted_transport();
    let first = UpnifyClient::with_cache(UpnifyConfig::default(), transport.clone(), cache.clone());
    let second = UpnifyClient::with_cache(UpnifyConfig::default(), transport.clone(), cache.clone());

    first
        .session_info(&fixtures::integration_credential())
        .await
        .unwrap();
    second
        .session_info(&fixtures::integration_credential())
        .await
        .unwrap();

    assert_eq!(transport.request_count(), 1);
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn test_distinct_credentials_get_distinct_sessions() {
    let (client, transport) = scripted_client(UpnifyConfig::default());

    client
        .session_info(&fixtures::integration_credential())
        .await
        .unwrap();
    client
        .session_info(&upnify_mcp::auth::Credential::integration_token("P07-OTHER"))
        .await
        .unwrap();

    let logins = transport.requests_to(endpoints::INTEGRATION_LOGIN);
    assert_eq!(logins.len(), 2);
    assert_eq!(logins[1].header("token"), Some("P07-OTHER"));
    assert_eq!(client.cache().len().await, 2);
}

#[tokio::test]
async fn test_concurrent_calls_all_authenticate() {
    let (client, transport) = scripted_client(UpnifyConfig::default());
    let credential = fixtures::integration_credential();

    let results =
        futures::future::join_all((0..5).map(|_| client.session_info(&credential))).await;

    for result in results {
        let outcome = result.unwrap();
        assert_eq!(outcome.company_id.as_deref(), Some(fixtures::COMPANY_ID));
    }
    let logins = transport.requests_to(endpoints::INTEGRATION_LOGIN).len();
    assert!((1..=5).contains(&logins));
    assert_eq!(client.cache().len().await, 1);
}

#[tokio::test]
async fn test_expired_session_triggers_new_login_and_sweep() {
    let transport = ScriptedTransport::new();
    transport
        .respond(
            HttpMethod::Post,
            endpoints::INTEGRATION_LOGIN,
            CrmResponse::json(200, &fixtures::expired_login("SES-OLD")),
        )
        .respond(
            HttpMethod::Post,
            endpoints::INTEGRATION_LOGIN,
            CrmResponse::json(200, &fixtures::integration_login()),
        );
    let client = UpnifyClient::with_transport(UpnifyConfig::default(), transport.clone());
    let credential = fixtures::integration_credential();

    client.session_info(&credential).await.unwrap();
    assert_eq!(client.cache().sweep(Utc::now()).await, 1);
    assert!(client.cache().is_empty().await);

    client.session_info(&credential).await.unwrap();
    assert_eq!(transport.requests_to(endpoints::INTEGRATION_LOGIN).len(), 2);

    let cached = client
        .cache()
        .get(&credential.cache_key())
        .await
        .unwrap();
    assert_eq!(cached.token(), fixtures::SESSION_TOKEN);
}

#[tokio::test]
async fn test_configured_ttl_applies_without_expiry() {
    let config = UpnifyConfig::new().with_session_ttl(chrono::TimeDelta::minutes(5));
    let (client, _) = scripted_client(config);
    let credential = fixtures::integration_credential();

    client.session_info(&credential).await.unwrap();

    let entry = client.cache().get(&credential.cache_key()).await.unwrap();
    let remaining = entry.expires_at() - Utc::now();
    assert!(remaining <= chrono::TimeDelta::minutes(5));
    assert!(remaining > chrono::TimeDelta::minutes(4));
}

#[tokio::test]
async fn test_background_sweeper_purges_expired_sessions() {
    let transport = ScriptedTransport::new();
    transport.respond(
        HttpMethod::Post,
        endpoints::INTEGRATION_LOGIN,
        CrmResponse::json(200, &fixtures::expired_login("SES-OLD")),
    );
    let config = UpnifyConfig::new().with_sweep_interval(Duration::from_millis(10));
    let client = UpnifyClient::with_transport(config, transport);

    client
        .session_info(&fixtures::integration_credential())
        .await
        .unwrap();
    assert_eq!(client.cache().len().await, 1);

    let sweeper = client.spawn_sweeper();
    tokio::time::sleep(Duration::from_millis(100)).await;
    sweeper.abort();

    assert!(client.cache().is_empty().await);
}

#[tokio::test]
async fn test_password_login_flow() {
    let config = UpnifyConfig::new().with_auth_mode(AuthMode::EmailPassword);
    let (client, transport) = scripted_client(config);

    let outcome = client
        .session_info(&fixtures::password_credential())
        .await
        .unwrap();

    assert_eq!(outcome.data["authMode"], AuthMode::EmailPassword.to_string());
    assert_eq!(outcome.data["usuario"]["nombre"], "Luis");
    assert_eq!(outcome.data["usuario"]["email"], "ventas@acme.mx");

    let login = &transport.requests_to(endpoints::PASSWORD_LOGIN)[0];
    assert_eq!(login.base_url(), endpoints::UPNIFY_BASE_URL);
    assert_eq!(
        login.json_body(),
        Some(&json!({"usuario": "ventas@acme.mx", "contrasenia": "clave-secreta"}))
    );
    assert!(transport.requests_to(endpoints::INTEGRATION_LOGIN).is_empty());
}

#[tokio::test]
async fn test_credential_mode_mismatch_is_rejected_offline() {
    let (client, transport) = scripted_client(UpnifyConfig::default());

    let result = client.session_info(&fixtures::password_credential()).await;

    assert_error_code!(result, "AUTHENTICATION_FAILED");
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_rejected_login_surfaces_upstream_body() {
    let transport = ScriptedTransport::new();
    transport.respond(
        HttpMethod::Post,
        endpoints::INTEGRATION_LOGIN,
        CrmResponse::new(401, "token de integración inválido"),
    );
    let client = UpnifyClient::with_transport(UpnifyConfig::default(), transport.clone());

    let result = client
        .search_contacts(&fixtures::integration_credential(), &ContactSearchQuery::new("Ana"))
        .await;

    assert_error_message_contains!(result, "token de integración inválido");
    assert!(transport.requests_to(endpoints::SEARCH).is_empty());
    assert!(client.cache().is_empty().await);
}

#[tokio::test]
async fn test_login_without_session_token_fails() {
    let transport = ScriptedTransport::new();
    transport.respond(
        HttpMethod::Post,
        endpoints::INTEGRATION_LOGIN,
        CrmResponse::json(200, &json!([{"tkEmpresa": "EMP-1"}])),
    );
    let client = UpnifyClient::with_transport(UpnifyConfig::default(), transport);

    let result = client.session_info(&fixtures::integration_credential()).await;

    assert_error_code!(result, "AUTHENTICATION_FAILED");
}

#[tokio::test]
async fn test_login_transport_failure_is_authentication_failure() {
    let transport = ScriptedTransport::new();
    transport.fail(
        HttpMethod::Post,
        endpoints::INTEGRATION_LOGIN,
        "connection refused",
    );
    let client = UpnifyClient::with_transport(UpnifyConfig::default(), transport);

    let result = client.session_info(&fixtures::integration_credential()).await;

    assert_error_message_contains!(result, "connection refused");
}

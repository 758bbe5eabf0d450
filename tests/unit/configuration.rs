//! Configuration loaded from variables and its effect on outgoing requests.

use crate::common::{fixtures, scripted_client};
use std::collections::HashMap;
use upnify_mcp::auth::{AuthMode, Credential};
use upnify_mcp::endpoints;
use upnify_mcp::{UpnifyConfig, UpnifyError};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn test_integration_token_preferred_when_both_present() {
    let config = UpnifyConfig::from_lookup(lookup(&[
        ("TK_INTEGRACION_TOKEN", "P07-ENV"),
        ("UPNIFY_EMAIL", "ventas@acme.mx"),
        ("UPNIFY_PASSWORD", "clave"),
    ]))
    .unwrap();

    assert_eq!(config.auth_mode, AuthMode::IntegrationToken);
    assert_eq!(
        config.default_credential,
        Some(Credential::integration_token("P07-ENV"))
    );
}

#[test]
fn test_email_without_password_is_no_credential() {
    let config = UpnifyConfig::from_lookup(lookup(&[("UPNIFY_EMAIL", "ventas@acme.mx")])).unwrap();

    assert_eq!(config.auth_mode, AuthMode::IntegrationToken);
    assert!(config.default_credential.is_none());
}

#[test]
fn test_negative_ttl_is_rejected() {
    let result = UpnifyConfig::from_lookup(lookup(&[("UPNIFY_SESSION_TTL_SECS", "-5")]));
    assert!(matches!(result, Err(UpnifyError::Configuration { .. })));
}

#[test]
fn test_default_credential_sets_mode() {
    let config = UpnifyConfig::new().with_default_credential(fixtures::password_credential());
    assert_eq!(config.auth_mode, AuthMode::EmailPassword);
}

#[test]
fn test_default_credential_debug_is_redacted() {
    let config = UpnifyConfig::new().with_default_credential(fixtures::password_credential());
    let rendered = format!("{:?}", config);

    assert!(rendered.contains("ventas@acme.mx"));
    assert!(!rendered.contains("clave-secreta"));
}

#[tokio::test]
async fn test_base_urls_route_requests() {
    let config = UpnifyConfig::new()
        .with_salesup_base_url("http://salesup.local/")
        .with_upnify_base_url("http://upnify.local");
    let (client, transport) = scripted_client(config);

    let _unscripted = client
        .search_contacts(
            &fixtures::integration_credential(),
            &upnify_mcp::operations::ContactSearchQuery::new("Ana"),
        )
        .await;

    let login = &transport.requests_to(endpoints::INTEGRATION_LOGIN)[0];
    assert_eq!(login.base_url(), "http://salesup.local");
    let search = &transport.requests_to(endpoints::SEARCH)[0];
    assert_eq!(search.base_url(), "http://upnify.local");
    assert_eq!(search.url(), format!("http://upnify.local{}", endpoints::SEARCH));
}

//! Every CRM operation end to end against a scripted CRM.

use crate::assert_error_code;
use crate::common::{fixtures, scripted_client};
use chrono::{Datelike, Utc};
use serde_json::{Value, json};
use upnify_mcp::defaults;
use upnify_mcp::endpoints;
use upnify_mcp::operations::{
    ActivityReportQuery, ContactSearchQuery, ConversionReportQuery, NewOpportunity, NewProspect,
    NewReminder, PendingPaymentsQuery, SalesReportQuery,
};
use upnify_mcp::transport::{CrmResponse, HttpMethod};
use upnify_mcp::{UpnifyConfig, UpnifyError};

#[tokio::test]
async fn test_create_prospect_uses_first_catalog_phase() {
    let (client, transport) = scripted_client(UpnifyConfig::default());
    transport
        .respond(
            HttpMethod::Get,
            endpoints::PHASES,
            CrmResponse::json(200, &fixtures::phase_catalog()),
        )
        .respond(
            HttpMethod::Post,
            endpoints::PROSPECTS,
            CrmResponse::new(200, "PRO-NEW-1"),
        );

    let prospect = NewProspect::new("Carla", "carla@nueva.mx").with_last_name("Méndez");
    let outcome = client
        .create_prospect(&fixtures::integration_credential(), &prospect)
        .await
        .unwrap();

    assert_eq!(outcome.message, "Prospect created");
    assert_eq!(outcome.data["response"], "PRO-NEW-1");
    assert_eq!(outcome.data["tkFase"], "PFAS-NUEVO");
    assert_eq!(outcome.company_id.as_deref(), Some(fixtures::COMPANY_ID));

    let phases = &transport.requests_to(endpoints::PHASES)[0];
    assert_eq!(phases.query_param("entidad"), Some("0"));

    let sent = transport.requests_to(endpoints::PROSPECTS)[0].clone();
    let body = sent.json_body().unwrap();
    assert_eq!(body["nombre"], "Carla");
    assert_eq!(body["apellidos"], "Méndez");
    assert_eq!(body["tkFase"], "PFAS-NUEVO");
    assert_eq!(body["sexo"], defaults::GENDER);
    assert_eq!(body["idPais"], defaults::COUNTRY);
    assert_eq!(body["movilLadaPais"], defaults::PHONE_PREFIX);
    assert_eq!(sent.header("token"), Some(fixtures::SESSION_TOKEN));
}

#[tokio::test]
async fn test_create_prospect_with_explicit_phase_skips_catalog() {
    let (client, transport) = scripted_client(UpnifyConfig::default());
    transport.respond(
        HttpMethod::Post,
        endpoints::PROSPECTS,
        CrmResponse::new(200, "ok"),
    );

    let prospect = NewProspect::new("Carla", "carla@nueva.mx").with_phase("PFAS-CUSTOM");
    let outcome = client
        .create_prospect(&fixtures::integration_credential(), &prospect)
        .await
        .unwrap();

    assert_eq!(outcome.data["tkFase"], "PFAS-CUSTOM");
    assert!(transport.requests_to(endpoints::PHASES).is_empty());
}

#[tokio::test]
async fn test_create_prospect_survives_phase_catalog_outage() {
    let (client, transport) = scripted_client(UpnifyConfig::default());
    transport
        .fail(HttpMethod::Get, endpoints::PHASES, "timeout")
        .respond(
            HttpMethod::Post,
            endpoints::PROSPECTS,
            CrmResponse::new(200, "ok"),
        );

    let outcome = client
        .create_prospect(
            &fixtures::integration_credential(),
            &NewProspect::new("Carla", "carla@nueva.mx"),
        )
        .await
        .unwrap();

    assert_eq!(outcome.data["tkFase"], defaults::PROSPECT_PHASE_TOKEN);
}

#[tokio::test]
async fn test_create_prospect_validates_before_login() {
    let (client, transport) = scripted_client(UpnifyConfig::default());

    let result = client
        .create_prospect(&fixtures::integration_credential(), &NewProspect::default())
        .await;

    assert_error_code!(result, "VALIDATION_FAILED");
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_phase_catalog() {
    let (client, transport) = scripted_client(UpnifyConfig::default());
    transport.respond(
        HttpMethod::Get,
        endpoints::PHASES,
        CrmResponse::json(200, &fixtures::phase_catalog()),
    );

    let phases = client
        .list_phases(&fixtures::integration_credential())
        .await
        .unwrap();
    assert_eq!(phases.len(), 3);
    assert_eq!(phases[1].label, "Contactado");

    let outcome = client
        .phase_catalog(&fixtures::integration_credential())
        .await
        .unwrap();
    assert_eq!(outcome.data["total"], 3);
    assert_eq!(outcome.data["fases"][2]["tkFase"], "PFAS-CALIFICADO");
}

#[tokio::test]
async fn test_search_contacts_normalizes_records() {
    let (client, transport) = scripted_client(UpnifyConfig::default());
    transport.respond(
        HttpMethod::Get,
        endpoints::SEARCH,
        CrmResponse::json(200, &fixtures::search_response()),
    );

    let outcome = client
        .search_contacts(
            &fixtures::integration_credential(),
            &ContactSearchQuery::new("Ana").with_limit(500),
        )
        .await
        .unwrap();

    assert_eq!(outcome.data["termino"], "Ana");
    assert_eq!(outcome.data["total"], 2);
    assert_eq!(outcome.data["resumen"], json!({"prospectos": 1, "clientes": 1}));
    assert_eq!(outcome.data["contactos"][0]["id"], "prospectos-PRO-ANA");
    assert_eq!(outcome.data["contactos"][0]["movil"], "5511112222");
    assert_eq!(outcome.data["contactos"][1]["empresa"], "");

    let sent = &transport.requests_to(endpoints::SEARCH)[0];
    assert_eq!(sent.query_param("buscar"), Some("Ana"));
    assert_eq!(sent.query_param("cantidadRegistros"), Some("100"));
    assert_eq!(sent.query_param("secciones"), Some(defaults::SEARCH_SECTIONS));
}

#[tokio::test]
async fn test_search_contacts_rejects_non_json_body() {
    let (client, transport) = scripted_client(UpnifyConfig::default());
    transport.respond(
        HttpMethod::Get,
        endpoints::SEARCH,
        CrmResponse::new(200, "<html>mantenimiento</html>"),
    );

    let result = client
        .search_contacts(&fixtures::integration_credential(), &ContactSearchQuery::new("Ana"))
        .await;

    assert!(matches!(result, Err(UpnifyError::MalformedResponse { .. })));
}

#[tokio::test]
async fn test_create_opportunity_posts_form() {
    let (client, transport) = scripted_client(UpnifyConfig::default());
    transport.respond(
        HttpMethod::Post,
        endpoints::OPPORTUNITIES,
        CrmResponse::json(200, &json!({"tkOportunidad": "OPO-9"})),
    );

    let opportunity = NewOpportunity {
        estimated_close: Some("2031-03-15".to_string()),
        ..NewOpportunity::new("Renovación anual", "PRO-ANA", 20000.0, 0.1)
    };
    let outcome = client
        .create_opportunity(&fixtures::integration_credential(), &opportunity)
        .await
        .unwrap();

    assert_eq!(outcome.data["oportunidad"]["tkOportunidad"], "OPO-9");
    assert_eq!(outcome.data["detalles"]["comisionMonto"], 2000.0);
    assert_eq!(outcome.data["detalles"]["cierreEstimado"], "2031-03-15");

    let sent = &transport.requests_to(endpoints::OPPORTUNITIES)[0];
    assert_eq!(sent.form_field("concepto"), Some("Renovación anual"));
    assert_eq!(sent.form_field("monto"), Some("20000"));
    assert_eq!(sent.form_field("comision"), Some("0.1"));
    assert_eq!(sent.form_field("comisionMonto"), Some("2000"));
    assert_eq!(sent.form_field("cierreEstimado"), Some("2031-03-15"));
    assert_eq!(sent.form_field("tkFase"), Some(defaults::OPPORTUNITY_PHASE_TOKEN));
    assert_eq!(sent.form_field("tkMoneda"), Some(defaults::CURRENCY_TOKEN));
    assert_eq!(sent.form_field("tipoCambio"), Some("1"));
}

#[tokio::test]
async fn test_opportunity_rejection_carries_sent_payload() {
    let (client, transport) = scripted_client(UpnifyConfig::default());
    transport.respond(
        HttpMethod::Post,
        endpoints::OPPORTUNITIES,
        CrmResponse::new(500, "prospecto no encontrado"),
    );

    let result = client
        .create_opportunity(
            &fixtures::integration_credential(),
            &NewOpportunity::new("Licencias", "PRO-MISSING", 1000.0, 0.15),
        )
        .await;

    match result {
        Err(UpnifyError::UpstreamRequestFailed {
            status,
            body,
            payload: Some(payload),
            ..
        }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "prospecto no encontrado");
            assert_eq!(payload["tkProspecto"], "PRO-MISSING");
            assert_eq!(payload["comisionMonto"], "150");
        }
        other => panic!("expected an upstream failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_sales_report_defaults() {
    let (client, transport) = scripted_client(UpnifyConfig::default());
    transport.respond(
        HttpMethod::Get,
        endpoints::SALES_REPORT,
        CrmResponse::json(200, &fixtures::report_rows()),
    );

    let outcome = client
        .sales_report(&fixtures::integration_credential(), &SalesReportQuery::new(1, 4))
        .await
        .unwrap();

    let year = Utc::now().year();
    assert_eq!(outcome.message, "Sales report retrieved");
    assert_eq!(outcome.data["parametros"]["agrupacion"], "1 (By executive)");
    assert_eq!(outcome.data["parametros"]["periodicidad"], "4 (Monthly)");
    assert_eq!(outcome.data["parametros"]["anio"], year);
    assert_eq!(outcome.data["parametros"]["impuestos"], "Exclude");
    assert_eq!(outcome.data["datos"], fixtures::report_rows());

    let sent = &transport.requests_to(endpoints::SALES_REPORT)[0];
    assert_eq!(sent.query_param("anio"), Some(year.to_string().as_str()));
    assert_eq!(sent.query_param("impuestos"), Some("0"));
}

#[tokio::test]
async fn test_pending_payments_counts_rows() {
    let (client, transport) = scripted_client(UpnifyConfig::default());
    transport.respond(
        HttpMethod::Get,
        endpoints::PENDING_PAYMENTS_REPORT,
        CrmResponse::json(200, &fixtures::report_rows()),
    );

    let outcome = client
        .pending_payments(
            &fixtures::integration_credential(),
            &PendingPaymentsQuery::new(2, 1),
        )
        .await
        .unwrap();

    assert_eq!(outcome.data["total"], 2);
    assert_eq!(outcome.data["parametros"]["periodicidad"], "1 (Semiannual)");
}

#[tokio::test]
async fn test_activity_report_unknown_code_is_labelled() {
    let (client, transport) = scripted_client(UpnifyConfig::default());
    transport.respond(
        HttpMethod::Get,
        endpoints::ACTIVITY_REPORT,
        CrmResponse::json(200, &json!([])),
    );

    let outcome = client
        .activity_report(
            &fixtures::integration_credential(),
            &ActivityReportQuery::new(1, 99),
        )
        .await
        .unwrap();

    assert_eq!(outcome.data["parametros"]["periodo"], "99 (Unknown)");
    let sent = &transport.requests_to(endpoints::ACTIVITY_REPORT)[0];
    assert_eq!(sent.query_param("periodo"), Some("99"));
}

#[tokio::test]
async fn test_conversion_report_situation_flag() {
    let (client, transport) = scripted_client(UpnifyConfig::default());
    transport.respond(
        HttpMethod::Get,
        endpoints::CONVERSION_REPORT,
        CrmResponse::json(200, &fixtures::report_rows()),
    );

    let outcome = client
        .conversion_report(
            &fixtures::integration_credential(),
            &ConversionReportQuery::new(3, 5, true),
        )
        .await
        .unwrap();

    assert_eq!(outcome.data["parametros"]["agrupacion"], "3 (By origin)");
    assert_eq!(outcome.data["parametros"]["situacion"], "Exclude discarded");
    let sent = &transport.requests_to(endpoints::CONVERSION_REPORT)[0];
    assert_eq!(sent.query_param("situacion"), Some("1"));
}

#[tokio::test]
async fn test_report_transport_failure() {
    let (client, transport) = scripted_client(UpnifyConfig::default());
    transport.fail(HttpMethod::Get, endpoints::ACTIVITY_REPORT, "connection reset");

    let result = client
        .activity_report(
            &fixtures::integration_credential(),
            &ActivityReportQuery::new(1, 1),
        )
        .await;

    assert_error_code!(result, "ACTIVITY_REPORT_FAILED");
}

#[tokio::test]
async fn test_create_reminder_attached_to_prospect() {
    let (client, transport) = scripted_client(UpnifyConfig::default());
    transport.respond(
        HttpMethod::Post,
        endpoints::REMINDERS,
        CrmResponse::json(200, &json!({"tkPendiente": "PEN-7"})),
    );

    let reminder = NewReminder {
        prospect_token: Some("PRO-ANA".to_string()),
        ..NewReminder::new("Llamar", "Seguimiento de cotización", "2031-03-16 10:00")
    };
    let outcome = client
        .create_reminder(&fixtures::integration_credential(), &reminder)
        .await
        .unwrap();

    assert_eq!(outcome.message, "Reminder scheduled");
    assert_eq!(outcome.data["tkPendiente"], "PEN-7");

    let body: Value = transport.requests_to(endpoints::REMINDERS)[0]
        .json_body()
        .cloned()
        .unwrap();
    assert_eq!(body["tkProspecto"], "PRO-ANA");
    assert_eq!(body["tkOportunidad"], "");
    assert_eq!(body["fechaInicio"], "2031-03-16 10:00");
    assert_eq!(body["recurrencia"], "1");
}

#[tokio::test]
async fn test_create_reminder_reports_every_missing_field() {
    let (client, _) = scripted_client(UpnifyConfig::default());

    let result = client
        .create_reminder(&fixtures::integration_credential(), &NewReminder::default())
        .await;

    match result {
        Err(UpnifyError::Validation(error)) => {
            let message = error.to_string();
            assert!(message.contains("asunto"));
            assert!(message.contains("descripcion"));
            assert!(message.contains("fechaInicio"));
        }
        other => panic!("expected a validation error, got {:?}", other),
    }
}

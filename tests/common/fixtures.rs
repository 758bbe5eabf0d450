//! CRM response fixtures.
//!
//! Shapes follow what the Upnify API returns: logins and catalogs are arrays, search
//! returns `[[counts], [records]]`.

use serde_json::{Value, json};
use upnify_mcp::auth::Credential;

pub const INTEGRATION_TOKEN: &str = "P07-TEST-INTEGRATION";
pub const SESSION_TOKEN: &str = "SES-INT-1";
pub const PASSWORD_SESSION_TOKEN: &str = "SES-PW-1";
pub const COMPANY_ID: &str = "EMP-ACME";

pub fn integration_credential() -> Credential {
    Credential::integration_token(INTEGRATION_TOKEN)
}

pub fn password_credential() -> Credential {
    Credential::email_password("ventas@acme.mx", "clave-secreta")
}

/// Integration login without an expiry, so the configured TTL applies
pub fn integration_login() -> Value {
    json!([{
        "token": SESSION_TOKEN,
        "tkEmpresa": COMPANY_ID,
        "nombre": "Ana",
        "apellidos": "Ruiz",
        "correo": "ana@acme.mx",
        "empresa": "Acme",
        "puesto": "Gerente comercial"
    }])
}

pub fn password_login() -> Value {
    json!([{
        "tkSesion": PASSWORD_SESSION_TOKEN,
        "tkEmpresa": COMPANY_ID,
        "nombre": "Luis",
        "email": "ventas@acme.mx"
    }])
}

/// Login whose session already expired
pub fn expired_login(token: &str) -> Value {
    json!([{
        "token": token,
        "tkEmpresa": COMPANY_ID,
        "expiracion": "2020-01-01T00:00:00Z"
    }])
}

pub fn phase_catalog() -> Value {
    json!([
        {"tkFase": "PFAS-NUEVO", "fase": "Nuevo"},
        {"tkFase": "PFAS-CONTACTADO", "fase": "Contactado"},
        {"tkFase": "PFAS-CALIFICADO", "fase": "Calificado"}
    ])
}

pub fn search_response() -> Value {
    json!([
        [{"prospectos": 1, "clientes": 1}],
        [
            {
                "seccion": "prospectos",
                "tkProspecto": "PRO-ANA",
                "contacto": "Ana Ruiz",
                "correo": "ana.ruiz@cliente.mx",
                "empresa": "Cliente SA",
                "movil": "5511112222"
            },
            {
                "seccion": "clientes",
                "tkProspecto": "PRO-ANAHI",
                "contacto": "Anahí Soto",
                "correo": "anahi@otro.mx"
            }
        ]
    ])
}

pub fn report_rows() -> Value {
    json!([
        {"ejecutivo": "Ana Ruiz", "total": 125000.5},
        {"ejecutivo": "Luis Paz", "total": 98000}
    ])
}

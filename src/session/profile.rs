//! User and company metadata returned by the CRM at login.

use serde::Serialize;
use serde_json::{Map, Value, json};

/// Opaque user/company record from the login response.
///
/// Kept as the raw JSON object; only the company identifier (`tkEmpresa`) feeds
/// operation results, the remaining accessors exist for display.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Profile(Map<String, Value>);

impl Profile {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    fn text(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Tenant-scoping company identifier
    pub fn company_id(&self) -> Option<&str> {
        self.text("tkEmpresa")
    }

    pub fn first_name(&self) -> Option<&str> {
        self.text("nombre")
    }

    pub fn last_name(&self) -> Option<&str> {
        self.text("apellidos")
    }

    pub fn email(&self) -> Option<&str> {
        self.text("email").or_else(|| self.text("correo"))
    }

    pub fn company_name(&self) -> Option<&str> {
        self.text("empresa")
    }

    pub fn job_title(&self) -> Option<&str> {
        self.text("puesto")
    }

    /// Raw `expiracion` value as sent by the CRM
    pub fn expiration(&self) -> Option<&str> {
        self.text("expiracion")
    }

    /// Display summary used by the session-info operation.
    pub fn summary(&self) -> Value {
        json!({
            "nombre": self.first_name(),
            "apellidos": self.last_name(),
            "email": self.email(),
            "empresa": self.company_name(),
            "puesto": self.job_title(),
            "expiracion": self.expiration(),
            "tkEmpresa": self.company_id(),
        })
    }
}

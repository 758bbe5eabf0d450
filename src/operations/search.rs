//! Contact search across prospects and clients.
//!
//! The search endpoint answers with a two-element array: element 0 is a one-element
//! array holding per-section counts, element 1 the flat list of matching records from
//! every section. Only prospect and client records are kept.

use super::params::{self, is_blank};
use super::{Operation, OperationOutcome, UpnifyClient, parse_json};
use crate::auth::Credential;
use crate::defaults;
use crate::endpoints;
use crate::error::{UpnifyResult, ValidationError, ValidationResult};
use crate::transport::HttpTransport;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

const KEPT_SECTIONS: [&str; 2] = ["prospectos", "clientes"];

/// Free-text contact search.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContactSearchQuery {
    #[serde(rename = "buscar", default, deserialize_with = "params::optional_text")]
    pub term: Option<String>,
    /// Defaults to 10, clamped to 1..=100
    #[serde(rename = "cantidadRegistros", default, deserialize_with = "params::optional_integer")]
    pub limit: Option<i64>,
}

impl ContactSearchQuery {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: Some(term.into()),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if is_blank(&self.term) {
            return Err(ValidationError::missing(["buscar"]));
        }
        Ok(())
    }

    pub fn effective_limit(&self) -> u32 {
        match self.limit {
            Some(limit) => limit.clamp(1, i64::from(defaults::SEARCH_LIMIT_MAX)) as u32,
            None => defaults::SEARCH_LIMIT,
        }
    }
}

/// One prospect or client record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub seccion: String,
    #[serde(rename = "tkProspecto")]
    pub prospect_token: String,
    pub contacto: Option<String>,
    pub correo: Option<String>,
    pub telefono: Option<String>,
    pub movil: Option<String>,
    pub ejecutivo: Option<String>,
    #[serde(rename = "ejecutivoIniciales")]
    pub ejecutivo_iniciales: Option<String>,
    pub empresa: String,
    /// `<seccion>-<tkProspecto>`
    pub id: String,
}

impl Contact {
    fn from_record(record: &Map<String, Value>) -> Option<Self> {
        let seccion = text(record, "seccion")?;
        if !KEPT_SECTIONS.contains(&seccion.as_str()) {
            return None;
        }
        let prospect_token = text(record, "tkProspecto").unwrap_or_default();
        Some(Self {
            id: format!("{seccion}-{prospect_token}"),
            contacto: text(record, "contacto"),
            correo: text(record, "correo"),
            telefono: text(record, "telefono"),
            movil: text(record, "movil"),
            ejecutivo: text(record, "ejecutivo"),
            ejecutivo_iniciales: text(record, "ejecutivoIniciales"),
            empresa: text(record, "empresa").unwrap_or_default(),
            seccion,
            prospect_token,
        })
    }
}

fn text(record: &Map<String, Value>, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

/// Per-section counts reported by the CRM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchSummary {
    pub prospectos: u64,
    pub clientes: u64,
}

impl SearchSummary {
    fn from_counts(counts: &Value) -> Self {
        let count = |names: [&str; 2]| {
            names
                .iter()
                .find_map(|name| counts.get(*name).and_then(Value::as_u64))
                .unwrap_or(0)
        };
        Self {
            prospectos: count(["prospectos", "prospects"]),
            clientes: count(["clientes", "clients"]),
        }
    }
}

/// Normalized search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactSearchResult {
    #[serde(rename = "termino")]
    pub term: String,
    pub total: usize,
    #[serde(rename = "resumen")]
    pub summary: SearchSummary,
    #[serde(rename = "contactos")]
    pub contacts: Vec<Contact>,
    /// Guidance for picking a contact
    #[serde(rename = "mensaje")]
    pub hint: String,
}

impl ContactSearchResult {
    /// Interpret a raw search response. Anything but an array of at least two elements
    /// is an empty result.
    pub fn from_response(term: &str, response: &Value) -> Self {
        let (summary, contacts) = match response.as_array() {
            Some(parts) if parts.len() >= 2 => {
                let summary = parts[0]
                    .get(0)
                    .map(SearchSummary::from_counts)
                    .unwrap_or_default();
                let contacts = parts[1]
                    .as_array()
                    .map(|records| {
                        records
                            .iter()
                            .filter_map(Value::as_object)
                            .filter_map(Contact::from_record)
                            .collect()
                    })
                    .unwrap_or_default();
                (summary, contacts)
            }
            _ => (SearchSummary::default(), Vec::new()),
        };

        Self {
            term: term.to_string(),
            total: contacts.len(),
            hint: hint(contacts.len()),
            summary,
            contacts,
        }
    }
}

fn hint(found: usize) -> String {
    match found {
        0 => "No contacts found".to_string(),
        1 => "Found 1 exact match".to_string(),
        n => format!(
            "Found {n} contacts. To create an opportunity, specify the tkProspecto of the desired contact."
        ),
    }
}

impl<T: HttpTransport> UpnifyClient<T> {
    /// Search prospects and clients by free text.
    pub async fn search_contacts(
        &self,
        credential: &Credential,
        query: &ContactSearchQuery,
    ) -> UpnifyResult<OperationOutcome> {
        query.validate()?;
        let session = self.auth.authenticate(credential).await?;
        let term = query.term.as_deref().unwrap_or_default();

        let request = self
            .get(&session, endpoints::SEARCH)
            .with_query("buscar", term)
            .with_query("cantidadRegistros", query.effective_limit())
            .with_query("secciones", defaults::SEARCH_SECTIONS);
        let response = self.dispatch(Operation::SearchContacts, request).await?;
        let value = parse_json(Operation::SearchContacts, &response)?;

        let result = ContactSearchResult::from_response(term, &value);
        let message = if result.contacts.is_empty() {
            "Search completed with no results"
        } else {
            "Search completed"
        };
        Ok(OperationOutcome::new(message, json!(result), &session))
    }
}

//! Prospect creation.
//!
//! The prospect endpoint takes a JSON body in which every field is a string and unused
//! fields are sent as `""`. Caller input covers a subset; the rest is filled from
//! [`defaults`] or left blank.

use super::params::{self, is_blank};
use super::{Operation, OperationOutcome, UpnifyClient};
use crate::auth::Credential;
use crate::defaults;
use crate::endpoints;
use crate::error::{UpnifyResult, ValidationError, ValidationResult};
use crate::transport::HttpTransport;
use log::info;
use serde::Deserialize;
use serde_json::{Value, json};

/// Caller-supplied prospect fields. Only name and email are required.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewProspect {
    #[serde(rename = "nombre", default, deserialize_with = "params::optional_text")]
    pub first_name: Option<String>,
    #[serde(rename = "correo", default, deserialize_with = "params::optional_text")]
    pub email: Option<String>,
    #[serde(rename = "apellidos", default, deserialize_with = "params::optional_text")]
    pub last_name: Option<String>,
    /// `H` or `M`
    #[serde(rename = "sexo", default, deserialize_with = "params::optional_text")]
    pub gender: Option<String>,
    #[serde(rename = "telefono", default, deserialize_with = "params::optional_text")]
    pub phone: Option<String>,
    #[serde(rename = "movil", default, deserialize_with = "params::optional_text")]
    pub mobile: Option<String>,
    #[serde(rename = "puesto", default, deserialize_with = "params::optional_text")]
    pub job_title: Option<String>,
    #[serde(rename = "empresa", default, deserialize_with = "params::optional_text")]
    pub company: Option<String>,
    #[serde(rename = "ciudad", default, deserialize_with = "params::optional_text")]
    pub city: Option<String>,
    /// ISO country code
    #[serde(rename = "idPais", default, deserialize_with = "params::optional_text")]
    pub country: Option<String>,
    #[serde(rename = "calle", default, deserialize_with = "params::optional_text")]
    pub street: Option<String>,
    #[serde(rename = "colonia", default, deserialize_with = "params::optional_text")]
    pub neighborhood: Option<String>,
    #[serde(rename = "codigoPostal", default, deserialize_with = "params::optional_text")]
    pub postal_code: Option<String>,
    /// Explicit phase; when absent the tenant's first catalog phase is used
    #[serde(rename = "tkFase", default, deserialize_with = "params::optional_text")]
    pub phase_token: Option<String>,
}

impl NewProspect {
    pub fn new(first_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            first_name: Some(first_name.into()),
            email: Some(email.into()),
            ..Self::default()
        }
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn with_phase(mut self, phase_token: impl Into<String>) -> Self {
        self.phase_token = Some(phase_token.into());
        self
    }

    pub fn validate(&self) -> ValidationResult<()> {
        let mut missing = Vec::new();
        if is_blank(&self.first_name) {
            missing.push("nombre");
        }
        if is_blank(&self.email) {
            missing.push("correo");
        }
        if !missing.is_empty() {
            return Err(ValidationError::missing(missing));
        }

        if matches!(self.gender.as_deref(), Some(gender) if gender != "H" && gender != "M") {
            return Err(ValidationError::invalid("sexo", "expected 'H' or 'M'"));
        }
        Ok(())
    }
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Wire body for the prospect endpoint.
pub fn prospect_payload(prospect: &NewProspect, phase_token: &str) -> Value {
    json!({
        "choice_empresa": "",
        "search_terms": "",
        "empresa": text(&prospect.company),
        "tkEmpresa": "",
        "cp": {
            "estatus": "",
            "validador": "",
            "division": "",
            "tipo": "",
            "gasto": "",
            "periodo": "",
            "tipoDeServicio": "",
            "testFecha": ""
        },
        "nombre": text(&prospect.first_name),
        "apellidos": text(&prospect.last_name),
        "titulo": "",
        "sexo": prospect.gender.as_deref().unwrap_or(defaults::GENDER),
        "correo": text(&prospect.email),
        "url": "",
        "telefono2LadaPais": defaults::PHONE_PREFIX,
        "telefono2": text(&prospect.phone),
        "movilLadaPais": defaults::PHONE_PREFIX,
        "movil": text(&prospect.mobile),
        "puesto": text(&prospect.job_title),
        "calle": text(&prospect.street),
        "colonia": text(&prospect.neighborhood),
        "idPais": prospect.country.as_deref().unwrap_or(defaults::COUNTRY),
        "idEstado": "",
        "idMunicipio": "",
        "ciudad": text(&prospect.city),
        "codigoPostal": text(&prospect.postal_code),
        "tkFase": phase_token,
        "tkOrigen": "",
        "facebook": "",
        "twitter": "",
        "skype": "",
        "linkedIn": "",
        "googlePlus": "",
        "etiquetas": "",
        "tkEtiquetas": ""
    })
}

impl<T: HttpTransport> UpnifyClient<T> {
    /// Create a prospect. The response body is returned as text.
    pub async fn create_prospect(
        &self,
        credential: &Credential,
        prospect: &NewProspect,
    ) -> UpnifyResult<OperationOutcome> {
        prospect.validate()?;
        let session = self.auth.authenticate(credential).await?;

        let phase_token = match prospect.phase_token.as_deref() {
            Some(token) => token.to_string(),
            None => self.resolve_default_phase(&session).await,
        };

        let request = self
            .post(&session, endpoints::PROSPECTS)
            .with_json(prospect_payload(prospect, &phase_token));
        let response = self.dispatch(Operation::CreateProspect, request).await?;

        info!("Created prospect in phase {}", phase_token);
        let data = json!({
            "response": response.body(),
            "tkFase": phase_token,
        });
        Ok(OperationOutcome::new("Prospect created", data, &session))
    }
}

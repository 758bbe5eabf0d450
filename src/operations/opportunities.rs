//! Opportunity creation.
//!
//! Opportunities are posted form-urlencoded. The commission amount and estimated close
//! date are derived unless the caller supplies them; the classification tokens default
//! to the tenant constants in [`defaults`].

use super::params::{self, is_blank};
use super::{Operation, OperationOutcome, UpnifyClient, parse_json};
use crate::auth::Credential;
use crate::defaults;
use crate::endpoints;
use crate::error::{UpnifyResult, ValidationError, ValidationResult};
use crate::transport::HttpTransport;
use chrono::{NaiveDate, TimeDelta, Utc};
use log::info;
use serde::Deserialize;
use serde_json::{Value, json};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Caller-supplied opportunity fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewOpportunity {
    #[serde(rename = "concepto", default, deserialize_with = "params::optional_text")]
    pub concept: Option<String>,
    /// Prospect the deal belongs to
    #[serde(rename = "tkProspecto", default, deserialize_with = "params::optional_text")]
    pub prospect_token: Option<String>,
    #[serde(rename = "monto", default, deserialize_with = "params::optional_number")]
    pub amount: Option<f64>,
    /// Commission as a fraction of the amount (0.15 = 15%)
    #[serde(rename = "comision", default, deserialize_with = "params::optional_number")]
    pub commission_rate: Option<f64>,
    /// Overrides `amount * commission_rate`
    #[serde(rename = "comisionMonto", default, deserialize_with = "params::optional_number")]
    pub commission_amount: Option<f64>,
    /// `YYYY-MM-DD`; defaults to today + 30 days
    #[serde(rename = "cierreEstimado", default, deserialize_with = "params::optional_text")]
    pub estimated_close: Option<String>,
    #[serde(rename = "tkFase", default, deserialize_with = "params::optional_text")]
    pub phase_token: Option<String>,
    #[serde(rename = "tkLinea", default, deserialize_with = "params::optional_text")]
    pub line_token: Option<String>,
    #[serde(rename = "tkMoneda", default, deserialize_with = "params::optional_text")]
    pub currency_token: Option<String>,
    #[serde(rename = "tkCerteza", default, deserialize_with = "params::optional_text")]
    pub certainty_token: Option<String>,
}

/// An opportunity with every field resolved, ready to encode.
#[derive(Debug, Clone, PartialEq)]
pub struct OpportunityDraft {
    pub concept: String,
    pub prospect_token: String,
    pub amount: f64,
    pub commission_rate: f64,
    pub commission_amount: f64,
    pub estimated_close: NaiveDate,
    pub phase_token: String,
    pub line_token: String,
    pub currency_token: String,
    pub certainty_token: String,
}

impl NewOpportunity {
    pub fn new(
        concept: impl Into<String>,
        prospect_token: impl Into<String>,
        amount: f64,
        commission_rate: f64,
    ) -> Self {
        Self {
            concept: Some(concept.into()),
            prospect_token: Some(prospect_token.into()),
            amount: Some(amount),
            commission_rate: Some(commission_rate),
            ..Self::default()
        }
    }

    /// Validate and fill in derived values relative to `today`.
    pub fn resolve(&self, today: NaiveDate) -> ValidationResult<OpportunityDraft> {
        let mut missing = Vec::new();
        if is_blank(&self.concept) {
            missing.push("concepto");
        }
        if is_blank(&self.prospect_token) {
            missing.push("tkProspecto");
        }
        if self.amount.is_none() {
            missing.push("monto");
        }
        if self.commission_rate.is_none() {
            missing.push("comision");
        }
        let (Some(concept), Some(prospect_token), Some(amount), Some(commission_rate), true) = (
            self.concept.as_deref(),
            self.prospect_token.as_deref(),
            self.amount,
            self.commission_rate,
            missing.is_empty(),
        ) else {
            return Err(ValidationError::missing(missing));
        };

        if amount < 0.0 {
            return Err(ValidationError::invalid("monto", "must not be negative"));
        }
        if !(0.0..=1.0).contains(&commission_rate) {
            return Err(ValidationError::invalid(
                "comision",
                "must be a fraction between 0 and 1 (0.15 = 15%)",
            ));
        }

        let estimated_close = match self.estimated_close.as_deref() {
            Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map_err(|_| ValidationError::invalid("cierreEstimado", "expected YYYY-MM-DD"))?,
            None => today + TimeDelta::days(defaults::ESTIMATED_CLOSE_DAYS),
        };

        let token = |value: &Option<String>, fallback: &str| {
            value.clone().unwrap_or_else(|| fallback.to_string())
        };

        Ok(OpportunityDraft {
            concept: concept.to_string(),
            prospect_token: prospect_token.to_string(),
            amount,
            commission_rate,
            commission_amount: self
                .commission_amount
                .unwrap_or(amount * commission_rate),
            estimated_close,
            phase_token: token(&self.phase_token, defaults::OPPORTUNITY_PHASE_TOKEN),
            line_token: token(&self.line_token, defaults::PRODUCT_LINE_TOKEN),
            currency_token: token(&self.currency_token, defaults::CURRENCY_TOKEN),
            certainty_token: token(&self.certainty_token, defaults::CERTAINTY_TOKEN),
        })
    }
}

impl OpportunityDraft {
    pub fn estimated_close_text(&self) -> String {
        self.estimated_close.format(DATE_FORMAT).to_string()
    }

    /// Form fields in the order the CRM's own client sends them.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        [
            ("cp.fechaDeEntrega", String::new()),
            ("concepto", self.concept.clone()),
            ("tkFase", self.phase_token.clone()),
            ("tkLinea", self.line_token.clone()),
            ("tkMoneda", self.currency_token.clone()),
            ("monto", self.amount.to_string()),
            ("tipoCambio", "1".to_string()),
            ("comision", self.commission_rate.to_string()),
            ("comisionMonto", self.commission_amount.to_string()),
            ("cierreEstimado", self.estimated_close_text()),
            ("tkCerteza", self.certainty_token.clone()),
            ("cantidad", String::new()),
            ("tkProspecto", self.prospect_token.clone()),
            ("cp", json!({"fechaDeEntrega": ""}).to_string()),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
    }

    /// Summary echoed back to the caller.
    pub fn details(&self) -> Value {
        json!({
            "concepto": self.concept,
            "monto": self.amount,
            "comision": self.commission_rate,
            "comisionMonto": self.commission_amount,
            "tkProspecto": self.prospect_token,
            "cierreEstimado": self.estimated_close_text(),
        })
    }
}

impl<T: HttpTransport> UpnifyClient<T> {
    /// Create an opportunity tied to an existing prospect.
    pub async fn create_opportunity(
        &self,
        credential: &Credential,
        opportunity: &NewOpportunity,
    ) -> UpnifyResult<OperationOutcome> {
        let draft = opportunity.resolve(Utc::now().date_naive())?;
        let session = self.auth.authenticate(credential).await?;

        let request = self
            .post(&session, endpoints::OPPORTUNITIES)
            .with_form(draft.form_fields());
        let response = self.dispatch(Operation::CreateOpportunity, request).await?;
        let created = parse_json(Operation::CreateOpportunity, &response)?;

        info!(
            "Created opportunity for prospect {} closing {}",
            draft.prospect_token,
            draft.estimated_close_text()
        );
        let data = json!({
            "oportunidad": created,
            "detalles": draft.details(),
        });
        Ok(OperationOutcome::new("Opportunity created", data, &session))
    }
}

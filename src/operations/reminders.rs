//! Calendar reminders.

use super::params::{self, is_blank};
use super::{Operation, OperationOutcome, UpnifyClient, parse_json};
use crate::auth::Credential;
use crate::endpoints;
use crate::error::{UpnifyResult, ValidationError, ValidationResult};
use crate::transport::HttpTransport;
use serde::Deserialize;
use serde_json::{Value, json};

/// A one-off reminder, optionally attached to a prospect or opportunity.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewReminder {
    #[serde(rename = "asunto", default, deserialize_with = "params::optional_text")]
    pub subject: Option<String>,
    #[serde(rename = "descripcion", default, deserialize_with = "params::optional_text")]
    pub description: Option<String>,
    /// Start date/time as understood by the CRM agenda (`YYYY-MM-DD HH:MM`)
    #[serde(rename = "fechaInicio", default, deserialize_with = "params::optional_text")]
    pub starts_at: Option<String>,
    #[serde(rename = "tkProspecto", default, deserialize_with = "params::optional_text")]
    pub prospect_token: Option<String>,
    #[serde(rename = "tkOportunidad", default, deserialize_with = "params::optional_text")]
    pub opportunity_token: Option<String>,
}

impl NewReminder {
    pub fn new(
        subject: impl Into<String>,
        description: impl Into<String>,
        starts_at: impl Into<String>,
    ) -> Self {
        Self {
            subject: Some(subject.into()),
            description: Some(description.into()),
            starts_at: Some(starts_at.into()),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        let missing: Vec<&str> = [
            ("asunto", &self.subject),
            ("descripcion", &self.description),
            ("fechaInicio", &self.starts_at),
        ]
        .into_iter()
        .filter(|(_, value)| is_blank(value))
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::missing(missing))
        }
    }
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Wire body for the reminder endpoint: a non-recurring pending task.
pub fn reminder_payload(reminder: &NewReminder) -> Value {
    json!({
        "key": "tkCarpeta",
        "tipoCarpeta": "1",
        "tkOportunidad": text(&reminder.opportunity_token),
        "asunto": text(&reminder.subject),
        "gmt": "10",
        "tkProspecto": text(&reminder.prospect_token),
        "search_terms": "",
        "descripcion": text(&reminder.description),
        "idTipoPendiente": "1",
        "frecuencia": "",
        "recurrencia": "1",
        "terminar": "0",
        "diasMes": "1",
        "diasRecurrencia": "",
        "fechaInicio": text(&reminder.starts_at)
    })
}

impl<T: HttpTransport> UpnifyClient<T> {
    pub async fn create_reminder(
        &self,
        credential: &Credential,
        reminder: &NewReminder,
    ) -> UpnifyResult<OperationOutcome> {
        reminder.validate()?;
        let session = self.auth.authenticate(credential).await?;

        let request = self
            .post(&session, endpoints::REMINDERS)
            .with_json(reminder_payload(reminder));
        let response = self.dispatch(Operation::CreateReminder, request).await?;
        let created = parse_json(Operation::CreateReminder, &response)?;

        Ok(OperationOutcome::new("Reminder scheduled", created, &session))
    }
}

//! Report reads.
//!
//! All four reports are GET requests with integer query parameters. Results echo the
//! parameters back with readable labels next to the CRM data.

use super::params;
use super::{Operation, OperationOutcome, UpnifyClient, parse_json};
use crate::auth::Credential;
use crate::defaults::labels::{self, describe};
use crate::endpoints;
use crate::error::{UpnifyResult, ValidationError, ValidationResult};
use crate::transport::HttpTransport;
use chrono::{Datelike, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

/// Sales closed, grouped and bucketed by periodicity within one year.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SalesReportQuery {
    #[serde(rename = "agrupacion", default, deserialize_with = "params::optional_integer")]
    pub grouping: Option<u32>,
    #[serde(rename = "periodicidad", default, deserialize_with = "params::optional_integer")]
    pub periodicity: Option<u32>,
    /// Defaults to the current year
    #[serde(rename = "anio", default, deserialize_with = "params::optional_integer")]
    pub year: Option<i32>,
    /// 1 includes taxes, 0 (default) excludes them
    #[serde(rename = "impuestos", default, deserialize_with = "params::optional_integer")]
    pub taxes: Option<u32>,
}

/// Outstanding client payments.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PendingPaymentsQuery {
    #[serde(rename = "agrupacion", default, deserialize_with = "params::optional_integer")]
    pub grouping: Option<u32>,
    #[serde(rename = "periodicidad", default, deserialize_with = "params::optional_integer")]
    pub periodicity: Option<u32>,
}

/// Activities logged within a period.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ActivityReportQuery {
    #[serde(rename = "agrupacion", default, deserialize_with = "params::optional_integer")]
    pub grouping: Option<u32>,
    #[serde(rename = "periodo", default, deserialize_with = "params::optional_integer")]
    pub period: Option<u32>,
}

/// Prospect-to-client conversions within a period.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConversionReportQuery {
    #[serde(rename = "agrupacion", default, deserialize_with = "params::optional_integer")]
    pub grouping: Option<u32>,
    #[serde(rename = "periodo", default, deserialize_with = "params::optional_integer")]
    pub period: Option<u32>,
    /// 0 includes discarded records, 1 excludes them
    #[serde(rename = "situacion", default, deserialize_with = "params::optional_integer")]
    pub situation: Option<u32>,
}

/// A validated report call.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    operation: Operation,
    path: &'static str,
    query: Vec<(&'static str, String)>,
    parameters: Value,
    message: &'static str,
}

impl ReportRequest {
    pub fn query(&self) -> &[(&'static str, String)] {
        &self.query
    }

    /// Parameters with readable labels
    pub fn parameters(&self) -> &Value {
        &self.parameters
    }
}

/// Collects required fields, reporting every missing one at once.
#[derive(Default)]
struct Required(Vec<&'static str>);

impl Required {
    fn take<N: Default>(&mut self, field: &'static str, value: Option<N>) -> N {
        value.unwrap_or_else(|| {
            self.0.push(field);
            N::default()
        })
    }

    fn check(self) -> ValidationResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::missing(self.0))
        }
    }
}

fn flag(field: &str, value: u32) -> ValidationResult<u32> {
    match value {
        0 | 1 => Ok(value),
        _ => Err(ValidationError::invalid(field, "expected 0 or 1")),
    }
}

impl SalesReportQuery {
    pub fn new(grouping: u32, periodicity: u32) -> Self {
        Self {
            grouping: Some(grouping),
            periodicity: Some(periodicity),
            ..Self::default()
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_taxes(mut self, include: bool) -> Self {
        self.taxes = Some(u32::from(include));
        self
    }

    pub fn resolve(&self, current_year: i32) -> ValidationResult<ReportRequest> {
        let mut required = Required::default();
        let grouping = required.take("agrupacion", self.grouping);
        let periodicity = required.take("periodicidad", self.periodicity);
        required.check()?;

        let year = self.year.unwrap_or(current_year);
        let taxes = flag("impuestos", self.taxes.unwrap_or(0))?;

        Ok(ReportRequest {
            operation: Operation::SalesReport,
            path: endpoints::SALES_REPORT,
            query: vec![
                ("agrupacion", grouping.to_string()),
                ("periodicidad", periodicity.to_string()),
                ("anio", year.to_string()),
                ("impuestos", taxes.to_string()),
            ],
            parameters: json!({
                "agrupacion": describe(grouping, labels::SALES_GROUPING),
                "periodicidad": describe(periodicity, labels::PERIODICITY),
                "anio": year,
                "impuestos": if taxes == 1 { "Include" } else { "Exclude" },
            }),
            message: "Sales report retrieved",
        })
    }
}

impl PendingPaymentsQuery {
    pub fn new(grouping: u32, periodicity: u32) -> Self {
        Self {
            grouping: Some(grouping),
            periodicity: Some(periodicity),
        }
    }

    pub fn resolve(&self) -> ValidationResult<ReportRequest> {
        let mut required = Required::default();
        let grouping = required.take("agrupacion", self.grouping);
        let periodicity = required.take("periodicidad", self.periodicity);
        required.check()?;

        Ok(ReportRequest {
            operation: Operation::PendingPayments,
            path: endpoints::PENDING_PAYMENTS_REPORT,
            query: vec![
                ("agrupacion", grouping.to_string()),
                ("periodicidad", periodicity.to_string()),
            ],
            parameters: json!({
                "agrupacion": describe(grouping, labels::SALES_GROUPING),
                "periodicidad": describe(periodicity, labels::PERIODICITY),
            }),
            message: "Pending payments retrieved",
        })
    }
}

impl ActivityReportQuery {
    pub fn new(grouping: u32, period: u32) -> Self {
        Self {
            grouping: Some(grouping),
            period: Some(period),
        }
    }

    pub fn resolve(&self) -> ValidationResult<ReportRequest> {
        let mut required = Required::default();
        let grouping = required.take("agrupacion", self.grouping);
        let period = required.take("periodo", self.period);
        required.check()?;

        Ok(ReportRequest {
            operation: Operation::ActivityReport,
            path: endpoints::ACTIVITY_REPORT,
            query: vec![
                ("agrupacion", grouping.to_string()),
                ("periodo", period.to_string()),
            ],
            parameters: json!({
                "agrupacion": describe(grouping, labels::ACTIVITY_GROUPING),
                "periodo": describe(period, labels::PERIOD),
            }),
            message: "Activity report retrieved",
        })
    }
}

impl ConversionReportQuery {
    pub fn new(grouping: u32, period: u32, exclude_discarded: bool) -> Self {
        Self {
            grouping: Some(grouping),
            period: Some(period),
            situation: Some(u32::from(exclude_discarded)),
        }
    }

    pub fn resolve(&self) -> ValidationResult<ReportRequest> {
        let mut required = Required::default();
        let grouping = required.take("agrupacion", self.grouping);
        let period = required.take("periodo", self.period);
        let situation = required.take("situacion", self.situation);
        required.check()?;
        let situation = flag("situacion", situation)?;

        Ok(ReportRequest {
            operation: Operation::ConversionReport,
            path: endpoints::CONVERSION_REPORT,
            query: vec![
                ("agrupacion", grouping.to_string()),
                ("periodo", period.to_string()),
                ("situacion", situation.to_string()),
            ],
            parameters: json!({
                "agrupacion": describe(grouping, labels::CONVERSION_GROUPING),
                "periodo": describe(period, labels::PERIOD),
                "situacion": if situation == 1 { "Exclude discarded" } else { "Include discarded" },
            }),
            message: "Conversion report retrieved",
        })
    }
}

impl<T: HttpTransport> UpnifyClient<T> {
    pub async fn sales_report(
        &self,
        credential: &Credential,
        query: &SalesReportQuery,
    ) -> UpnifyResult<OperationOutcome> {
        let report = query.resolve(Utc::now().year())?;
        self.run_report(credential, report).await
    }

    /// Pending payments; `total` counts the returned rows.
    pub async fn pending_payments(
        &self,
        credential: &Credential,
        query: &PendingPaymentsQuery,
    ) -> UpnifyResult<OperationOutcome> {
        let mut outcome = self.run_report(credential, query.resolve()?).await?;
        let total = outcome.data["datos"].as_array().map_or(0, Vec::len);
        outcome.data["total"] = json!(total);
        Ok(outcome)
    }

    pub async fn activity_report(
        &self,
        credential: &Credential,
        query: &ActivityReportQuery,
    ) -> UpnifyResult<OperationOutcome> {
        self.run_report(credential, query.resolve()?).await
    }

    pub async fn conversion_report(
        &self,
        credential: &Credential,
        query: &ConversionReportQuery,
    ) -> UpnifyResult<OperationOutcome> {
        self.run_report(credential, query.resolve()?).await
    }

    async fn run_report(
        &self,
        credential: &Credential,
        report: ReportRequest,
    ) -> UpnifyResult<OperationOutcome> {
        let session = self.auth.authenticate(credential).await?;

        let request = report
            .query
            .iter()
            .fold(self.get(&session, report.path), |request, (name, value)| {
                request.with_query(*name, value)
            });
        let response = self.dispatch(report.operation, request).await?;
        let rows = parse_json(report.operation, &response)?;

        let data = json!({
            "parametros": report.parameters,
            "datos": rows,
        });
        Ok(OperationOutcome::new(report.message, data, &session))
    }
}

//! Login response parsing.
//!
//! Both login endpoints answer with a JSON array whose first element describes the
//! session: a token field (`token` for integration logins, `tkSesion` for password
//! logins), an optional `expiracion`, and user/company metadata.

use crate::session::Profile;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// Token field of an integration-token login response
pub const INTEGRATION_TOKEN_FIELD: &str = "token";
/// Token field of a password login response
pub const PASSWORD_TOKEN_FIELD: &str = "tkSesion";

/// A successfully parsed login response.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    /// Expiry reported by the CRM, when present and parseable
    pub expires_at: Option<DateTime<Utc>>,
    /// Remaining fields of the session record (the token itself is removed)
    pub profile: Profile,
}

impl LoginResponse {
    /// Parse a login response body, reading the session token from `token_field`.
    ///
    /// The error is a human-readable reason suitable for an authentication failure.
    pub fn parse(body: &str, token_field: &str) -> Result<Self, String> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| format!("login response is not valid JSON: {e}"))?;

        let Value::Array(records) = value else {
            return Err("login response is not a JSON array".to_string());
        };

        let first = records
            .into_iter()
            .next()
            .ok_or_else(|| "login returned no session: credential was not recognized".to_string())?;

        let Value::Object(mut fields) = first else {
            return Err("login response record is not a JSON object".to_string());
        };

        let token = match fields.remove(token_field) {
            Some(Value::String(token)) if !token.trim().is_empty() => token,
            _ => return Err(format!("login response has no '{token_field}' session token")),
        };

        let expires_at = fields.get("expiracion").and_then(parse_expiration);

        Ok(Self {
            token,
            expires_at,
            profile: Profile::new(fields),
        })
    }
}

/// Interpret an `expiracion` value.
///
/// Accepts RFC 3339 strings, naive `YYYY-MM-DD HH:MM:SS` timestamps (read as UTC), and
/// numeric epochs in seconds or milliseconds.
pub fn parse_expiration(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => parse_expiration_text(raw.trim()),
        Value::Number(number) => number.as_i64().and_then(from_epoch),
        _ => None,
    }
}

fn parse_expiration_text(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    raw.parse::<i64>().ok().and_then(from_epoch)
}

fn from_epoch(epoch: i64) -> Option<DateTime<Utc>> {
    if epoch > 1_000_000_000_000 {
        DateTime::from_timestamp_millis(epoch)
    } else {
        DateTime::from_timestamp(epoch, 0)
    }
}

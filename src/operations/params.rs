//! Lenient field deserializers for operation parameters.
//!
//! Tool callers routinely send numbers as strings (`"1000"`) and phone numbers as
//! numbers. These helpers accept either form; blank strings count as absent.

use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Loose {
    fn into_text(self) -> String {
        match self {
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Text(value) => value,
        }
    }
}

fn to_f64<E: de::Error>(loose: Loose) -> Result<Option<f64>, E> {
    let value = match loose {
        Loose::Integer(value) => value as f64,
        Loose::Float(value) => value,
        Loose::Text(text) if text.trim().is_empty() => return Ok(None),
        Loose::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| E::custom(format!("expected a number, got '{text}'")))?,
    };
    if value.is_finite() {
        Ok(Some(value))
    } else {
        Err(E::custom("number must be finite"))
    }
}

fn to_integer<E: de::Error, N: TryFrom<i64>>(loose: Loose) -> Result<Option<N>, E> {
    let value = match loose {
        Loose::Integer(value) => value,
        Loose::Float(value) if value.fract() == 0.0 => value as i64,
        Loose::Float(value) => {
            return Err(E::custom(format!("expected a whole number, got {value}")));
        }
        Loose::Text(text) if text.trim().is_empty() => return Ok(None),
        Loose::Text(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| E::custom(format!("expected a whole number, got '{text}'")))?,
    };
    N::try_from(value)
        .map(Some)
        .map_err(|_| E::custom(format!("{value} is out of range")))
}

/// Required number, from a JSON number or numeric string.
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    to_f64(Loose::deserialize(deserializer)?)?.ok_or_else(|| de::Error::custom("number is blank"))
}

/// Optional number; `null` and blank strings are `None`.
pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose>::deserialize(deserializer)? {
        Some(loose) => to_f64(loose),
        None => Ok(None),
    }
}

/// Required whole number.
pub fn integer<'de, D, N>(deserializer: D) -> Result<N, D::Error>
where
    D: Deserializer<'de>,
    N: TryFrom<i64>,
{
    to_integer(Loose::deserialize(deserializer)?)?
        .ok_or_else(|| de::Error::custom("whole number is blank"))
}

/// Optional whole number; `null` and blank strings are `None`.
pub fn optional_integer<'de, D, N>(deserializer: D) -> Result<Option<N>, D::Error>
where
    D: Deserializer<'de>,
    N: TryFrom<i64>,
{
    match Option::<Loose>::deserialize(deserializer)? {
        Some(loose) => to_integer(loose),
        None => Ok(None),
    }
}

/// Optional text that may arrive as a number; blank is `None`.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Loose>::deserialize(deserializer)?
        .map(Loose::into_text)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty()))
}

/// True when an optional text field is absent or blank.
pub(crate) fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|text| text.trim().is_empty())
}

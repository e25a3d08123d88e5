use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Numeric field as it arrives from the data feed: a JSON number or a decimal string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    /// Returns the value as `f64`, or `None` when it is not a finite number.
    ///
    /// Strings go through `Decimal` so inputs like `"182.630000"` are parsed
    /// exactly before the final conversion.
    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => value.is_finite().then_some(*value),
            Self::Text(text) => Decimal::from_str(text.trim())
                .ok()
                .and_then(|value| value.to_f64())
                .filter(|value| value.is_finite()),
        }
    }

    /// Returns the value as a non-negative integer count.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        match self {
            Self::Number(value) => {
                (value.is_finite()
                    && *value >= 0.0
                    && value.fract() == 0.0
                    && *value <= u64::MAX as f64)
                    .then_some(*value as u64)
            }
            Self::Text(text) => {
                let value = Decimal::from_str(text.trim()).ok()?;
                if value.is_sign_negative() || !value.fract().is_zero() {
                    return None;
                }
                value.to_u64()
            }
        }
    }
}

/// Parses a bar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// Timestamps keep their calendar day in the offset they were written with.
pub fn parse_bar_date(raw: &str) -> ChartResult<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.date_naive());
    }
    Err(ChartError::InvalidDate(raw.to_owned()))
}

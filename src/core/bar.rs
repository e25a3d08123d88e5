use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::primitives::{RawNumber, parse_bar_date};
use crate::error::{ChartError, ChartResult};

/// One trading period.
///
/// Numeric fields are `None` when the feed delivered a missing or non-numeric
/// value. Indicators reading such a field treat the bar as a gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

impl Bar {
    /// Builds a fully populated bar.
    ///
    /// Invariants:
    /// - prices are finite and > 0
    /// - `low <= min(open, close)` and `max(open, close) <= high`
    pub fn new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> ChartResult<Self> {
        for (field, value) in [("open", open), ("high", high), ("low", low), ("close", close)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "bar {date}: `{field}` must be finite and > 0"
                )));
            }
        }
        if low > open.min(close) || high < open.max(close) {
            return Err(ChartError::InvalidData(format!(
                "bar {date}: open/close must lie within [low, high]"
            )));
        }
        Ok(Self {
            date,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: Some(volume),
        })
    }

    /// Converts a feed record into a bar.
    ///
    /// An unparseable date is a hard error since the time index cannot be
    /// built without it. Bad numeric fields are logged and kept as `None`.
    pub fn from_raw(raw: &RawBar) -> ChartResult<Self> {
        let date = parse_bar_date(&raw.date)?;
        let price = |field: &'static str, value: &Option<RawNumber>| -> Option<f64> {
            let parsed = value.as_ref().and_then(RawNumber::to_f64).filter(|v| *v > 0.0);
            if parsed.is_none() {
                warn!(%date, field, "malformed bar field");
            }
            parsed
        };
        let open = price("open", &raw.open);
        let high = price("high", &raw.high);
        let low = price("low", &raw.low);
        let close = price("close", &raw.close);
        let volume = raw.volume.as_ref().and_then(RawNumber::to_u64);
        if volume.is_none() {
            warn!(%date, field = "volume", "malformed bar field");
        }

        let bar = Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        };
        if !bar.is_consistent() {
            warn!(%date, "bar open/close outside [low, high]");
        }
        Ok(bar)
    }

    /// Returns `false` when all four prices are present but violate the
    /// low/high envelope.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        match self.ohlc() {
            Some((open, high, low, close)) => {
                low <= open.min(close) && open.max(close) <= high
            }
            None => true,
        }
    }

    /// Returns `(open, high, low, close)` when every price is present.
    #[must_use]
    pub fn ohlc(&self) -> Option<(f64, f64, f64, f64)> {
        Some((self.open?, self.high?, self.low?, self.close?))
    }

    #[must_use]
    pub fn field(&self, field: PriceField) -> Option<f64> {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
            PriceField::Volume => self.volume.map(|v| v as f64),
        }
    }
}

/// Raw bar fields readable by indicators and pane domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

/// Bar record as delivered by the data feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: String,
    #[serde(default)]
    pub open: Option<RawNumber>,
    #[serde(default)]
    pub high: Option<RawNumber>,
    #[serde(default)]
    pub low: Option<RawNumber>,
    #[serde(default)]
    pub close: Option<RawNumber>,
    #[serde(default)]
    pub volume: Option<RawNumber>,
}

/// Parses a JSON array of feed records into bars.
pub fn bars_from_json_str(input: &str) -> ChartResult<Vec<Bar>> {
    let raw: Vec<RawBar> = serde_json::from_str(input)
        .map_err(|e| ChartError::InvalidData(format!("failed to parse bar json: {e}")))?;
    raw.iter().map(Bar::from_raw).collect()
}

/// Rejects bar sequences whose dates are not strictly ascending.
pub fn ensure_ascending(bars: &[Bar]) -> ChartResult<()> {
    for (index, pair) in bars.windows(2).enumerate() {
        if pair[1].date <= pair[0].date {
            return Err(ChartError::UnsortedInput {
                index: index + 1,
                previous: pair[0].date,
                current: pair[1].date,
            });
        }
    }
    Ok(())
}

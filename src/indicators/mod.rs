//! Batch indicator pipeline.
//!
//! [`apply`] turns an ordered bar sequence into a new sequence of
//! [`EnrichedBar`]s, one per input bar, each carrying every requested
//! indicator under its output name. Indicators are causal streaming
//! recurrences ([`StreamingIndicator`]) fed one sample per bar; a missing
//! sample restarts the recurrence, so values only resume after a full clean
//! warm-up window.

mod atr;
mod ema;
mod rsi;
mod sma;

pub use atr::{Atr, RangeSample};
pub use ema::Ema;
pub use rsi::{Rsi, relative_strength_index};
pub use sma::Sma;

use std::collections::HashSet;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Bar, PriceField, ensure_ascending};
use crate::error::{ChartError, ChartResult};

/// Indicator output at one bar.
///
/// `Unavailable` marks warm-up positions and gaps; it is never folded into a
/// numeric default so renderers can leave a hole instead of drawing zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorValue {
    Available(f64),
    Unavailable,
}

impl IndicatorValue {
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Available(value) => Some(value),
            Self::Unavailable => None,
        }
    }

    #[must_use]
    pub fn is_available(self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl From<Option<f64>> for IndicatorValue {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(value) if value.is_finite() => Self::Available(value),
            _ => Self::Unavailable,
        }
    }
}

/// Causal recurrence consuming one sample per bar.
pub trait StreamingIndicator {
    type Input;

    /// Consumes the sample for the next bar. `None` is a gap.
    fn update(&mut self, sample: Option<Self::Input>) -> IndicatorValue;

    /// Drops all accumulated state, as if no bar had been seen.
    fn reset(&mut self);
}

/// Feeds `samples` through `indicator` and collects one output per sample.
pub fn run<I, S>(mut indicator: I, samples: S) -> Vec<IndicatorValue>
where
    I: StreamingIndicator,
    S: IntoIterator<Item = Option<I::Input>>,
{
    samples
        .into_iter()
        .map(|sample| indicator.update(sample))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
    Atr,
}

impl IndicatorKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Sma => "SMA",
            Self::Ema => "EMA",
            Self::Rsi => "RSI",
            Self::Atr => "ATR",
        }
    }
}

/// Series an indicator (or a pane domain) reads from each bar.
///
/// Serialized as a bare field name (`"close"`) or `{"indicator": "ema12"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceField {
    Price(PriceField),
    Indicator { indicator: String },
}

impl Default for SourceField {
    fn default() -> Self {
        Self::Price(PriceField::Close)
    }
}

impl SourceField {
    #[must_use]
    pub fn indicator(name: impl Into<String>) -> Self {
        Self::Indicator {
            indicator: name.into(),
        }
    }
}

/// Immutable configuration of one derived series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub id: u32,
    pub kind: IndicatorKind,
    pub window: usize,
    /// Ignored by ATR, which always reads high/low/close.
    #[serde(default)]
    pub source: SourceField,
    pub output: String,
}

impl IndicatorSpec {
    #[must_use]
    pub fn new(id: u32, kind: IndicatorKind, window: usize, output: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            window,
            source: SourceField::default(),
            output: output.into(),
        }
    }

    #[must_use]
    pub fn sma(id: u32, window: usize, output: impl Into<String>) -> Self {
        Self::new(id, IndicatorKind::Sma, window, output)
    }

    #[must_use]
    pub fn ema(id: u32, window: usize, output: impl Into<String>) -> Self {
        Self::new(id, IndicatorKind::Ema, window, output)
    }

    #[must_use]
    pub fn rsi(id: u32, window: usize, output: impl Into<String>) -> Self {
        Self::new(id, IndicatorKind::Rsi, window, output)
    }

    #[must_use]
    pub fn atr(id: u32, window: usize, output: impl Into<String>) -> Self {
        Self::new(id, IndicatorKind::Atr, window, output)
    }

    #[must_use]
    pub fn with_source(mut self, source: SourceField) -> Self {
        self.source = source;
        self
    }

    /// Short label such as `RSI (14)` used by tooltips.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({})", self.kind.label(), self.window)
    }
}

/// Bar plus the indicator values computed for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedBar {
    pub bar: Bar,
    pub values: IndexMap<String, IndicatorValue>,
}

impl EnrichedBar {
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.bar.date
    }

    /// Indicator value, or `None` when unavailable or never computed.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(|value| value.value())
    }

    #[must_use]
    pub fn indicator(&self, name: &str) -> Option<IndicatorValue> {
        self.values.get(name).copied()
    }

    #[must_use]
    pub fn source(&self, source: &SourceField) -> Option<f64> {
        match source {
            SourceField::Price(field) => self.bar.field(*field),
            SourceField::Indicator { indicator } => self.value(indicator),
        }
    }
}

/// Runs `specs` in order over `bars` and returns the enriched sequence.
///
/// The input is not modified. Later specs may read outputs of earlier ones
/// through [`SourceField::Indicator`].
///
/// Returns an error for precondition violations only: dates not strictly
/// ascending, zero windows, duplicate ids or outputs, and sources naming an
/// indicator that is not produced earlier. Short datasets and malformed bars
/// yield `Unavailable` values instead.
pub fn apply(bars: &[Bar], specs: &[IndicatorSpec]) -> ChartResult<Vec<EnrichedBar>> {
    ensure_ascending(bars)?;
    validate_specs(specs)?;

    let mut enriched: Vec<EnrichedBar> = bars
        .iter()
        .map(|bar| EnrichedBar {
            bar: *bar,
            values: IndexMap::with_capacity(specs.len()),
        })
        .collect();

    for spec in specs {
        if spec.window > bars.len() {
            debug!(
                id = spec.id,
                output = %spec.output,
                window = spec.window,
                bars = bars.len(),
                "insufficient data, indicator unavailable"
            );
        }
        let outputs = evaluate(spec, &enriched);
        for (bar, value) in enriched.iter_mut().zip(outputs) {
            bar.values.insert(spec.output.clone(), value);
        }
    }

    debug!(
        bars = enriched.len(),
        indicators = specs.len(),
        "indicator pipeline applied"
    );
    Ok(enriched)
}

fn evaluate(spec: &IndicatorSpec, bars: &[EnrichedBar]) -> Vec<IndicatorValue> {
    let source = |bar: &EnrichedBar| bar.source(&spec.source);
    match spec.kind {
        IndicatorKind::Sma => run(Sma::new(spec.window), bars.iter().map(source)),
        IndicatorKind::Ema => run(Ema::new(spec.window), bars.iter().map(source)),
        IndicatorKind::Rsi => run(Rsi::new(spec.window), bars.iter().map(source)),
        IndicatorKind::Atr => run(
            Atr::new(spec.window),
            bars.iter().map(|bar| RangeSample::from_bar(&bar.bar)),
        ),
    }
}

/// Checks windows, id/output uniqueness and that chained sources are
/// produced by an earlier indicator.
pub fn validate_specs(specs: &[IndicatorSpec]) -> ChartResult<()> {
    let mut ids = HashSet::with_capacity(specs.len());
    let mut outputs: HashSet<&str> = HashSet::with_capacity(specs.len());

    for spec in specs {
        if spec.window == 0 {
            return Err(ChartError::InvalidWindow {
                id: spec.id,
                window: spec.window,
            });
        }
        if spec.output.is_empty() {
            return Err(ChartError::InvalidConfig(format!(
                "indicator {} has an empty output name",
                spec.id
            )));
        }
        if !ids.insert(spec.id) {
            return Err(ChartError::DuplicateIndicator(format!("id {}", spec.id)));
        }
        if spec.kind != IndicatorKind::Atr {
            if let SourceField::Indicator { indicator } = &spec.source {
                if !outputs.contains(indicator.as_str()) {
                    return Err(ChartError::UnknownIndicatorSource {
                        id: spec.id,
                        source_name: indicator.clone(),
                    });
                }
            }
        }
        if !outputs.insert(spec.output.as_str()) {
            return Err(ChartError::DuplicateIndicator(format!(
                "output `{}`",
                spec.output
            )));
        }
    }
    Ok(())
}

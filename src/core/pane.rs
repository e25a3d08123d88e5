use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::indicators::SourceField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaneId(u32);

impl PaneId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Vertical placement of a pane inside the plot area.
///
/// Offsets are in pixels relative to the plot top (`FromTop`) or the plot
/// bottom (`FromBottom`, i.e. `origin = total_height - offset`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaneOrigin {
    /// Directly below the previous pane.
    #[default]
    Stacked,
    FromTop(f64),
    FromBottom(f64),
}

/// Value read from each visible bar when a pane autoscales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainSource {
    /// Bar high and bar low.
    HighLow,
    Source(SourceField),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomainPolicy {
    Fixed { min: f64, max: f64 },
    Dynamic { sources: Vec<DomainSource> },
}

/// Fractions of the data span added above (`top`) and below (`bottom`) a
/// dynamic domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PanePadding {
    pub top: f64,
    pub bottom: f64,
}

impl PanePadding {
    #[must_use]
    pub const fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeriesSpec {
    Candlestick,
    Line { source: SourceField, label: String },
}

impl SeriesSpec {
    #[must_use]
    pub fn line(source: SourceField, label: impl Into<String>) -> Self {
        Self::Line {
            source,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueAxisTicks {
    /// Roughly `n` "nice" ticks over the domain.
    Count(usize),
    /// Exactly these values, when inside the domain.
    Values(Vec<f64>),
}

impl Default for ValueAxisTicks {
    fn default() -> Self {
        Self::Count(5)
    }
}

/// Declarative description of one pane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaneSpec {
    pub id: PaneId,
    pub height_px: f64,
    #[serde(default)]
    pub origin: PaneOrigin,
    pub domain: DomainPolicy,
    #[serde(default)]
    pub padding: PanePadding,
    #[serde(default)]
    pub series: Vec<SeriesSpec>,
    #[serde(default)]
    pub ticks: ValueAxisTicks,
    /// Dashed horizontal guides, e.g. 30/50/70 on an oscillator.
    #[serde(default)]
    pub reference_levels: Vec<f64>,
}

impl PaneSpec {
    #[must_use]
    pub fn new(id: PaneId, height_px: f64, domain: DomainPolicy) -> Self {
        Self {
            id,
            height_px,
            origin: PaneOrigin::Stacked,
            domain,
            padding: PanePadding::default(),
            series: Vec::new(),
            ticks: ValueAxisTicks::default(),
            reference_levels: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_origin(mut self, origin: PaneOrigin) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: PanePadding) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_series(mut self, series: SeriesSpec) -> Self {
        self.series.push(series);
        self
    }

    #[must_use]
    pub fn with_ticks(mut self, ticks: ValueAxisTicks) -> Self {
        self.ticks = ticks;
        self
    }

    #[must_use]
    pub fn with_reference_levels(mut self, levels: Vec<f64>) -> Self {
        self.reference_levels = levels;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        let id = self.id.raw();
        if !self.height_px.is_finite() || self.height_px <= 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "pane {id}: height must be finite and > 0"
            )));
        }
        match self.origin {
            PaneOrigin::Stacked => {}
            PaneOrigin::FromTop(offset) | PaneOrigin::FromBottom(offset) => {
                if !offset.is_finite() || offset < 0.0 {
                    return Err(ChartError::InvalidConfig(format!(
                        "pane {id}: origin offset must be finite and >= 0"
                    )));
                }
            }
        }
        match &self.domain {
            DomainPolicy::Fixed { min, max } => {
                if !min.is_finite() || !max.is_finite() || min >= max {
                    return Err(ChartError::InvalidConfig(format!(
                        "pane {id}: fixed domain requires finite min < max"
                    )));
                }
            }
            DomainPolicy::Dynamic { sources } => {
                if sources.is_empty() {
                    return Err(ChartError::InvalidConfig(format!(
                        "pane {id}: dynamic domain needs at least one source"
                    )));
                }
            }
        }
        let padding_ok = |fraction: f64| fraction.is_finite() && (0.0..1.0).contains(&fraction);
        if !padding_ok(self.padding.top) || !padding_ok(self.padding.bottom) {
            return Err(ChartError::InvalidConfig(format!(
                "pane {id}: padding fractions must be in [0, 1)"
            )));
        }
        match &self.ticks {
            ValueAxisTicks::Count(0) => {
                return Err(ChartError::InvalidConfig(format!(
                    "pane {id}: tick count must be > 0"
                )));
            }
            ValueAxisTicks::Values(values) if values.iter().any(|v| !v.is_finite()) => {
                return Err(ChartError::InvalidConfig(format!(
                    "pane {id}: tick values must be finite"
                )));
            }
            _ => {}
        }
        if self.reference_levels.iter().any(|level| !level.is_finite()) {
            return Err(ChartError::InvalidConfig(format!(
                "pane {id}: reference levels must be finite"
            )));
        }
        Ok(())
    }
}

/// Validates every pane and rejects duplicate ids.
pub fn validate_panes(panes: &[PaneSpec]) -> ChartResult<()> {
    let mut seen = HashSet::with_capacity(panes.len());
    for pane in panes {
        pane.validate()?;
        if !seen.insert(pane.id) {
            return Err(ChartError::DuplicatePane(pane.id));
        }
    }
    Ok(())
}

use serde::{Deserialize, Serialize};

use crate::core::{
    ChartMargins, DEFAULT_EXTENT_BARS, DomainPolicy, DomainSource, PaneId, PaneOrigin,
    PanePadding, PaneSpec, PlotArea, PriceField, SeriesSpec, TimeRangeFilter, ValueAxisTicks,
    Viewport, validate_panes,
};
use crate::error::{ChartError, ChartResult};
use crate::indicators::{IndicatorSpec, SourceField, validate_specs};
use crate::interaction::WheelBehavior;
use crate::render::RenderStyle;

pub const PRICE_PANE_ID: PaneId = PaneId::new(0);
pub const RSI_PANE_ID: PaneId = PaneId::new(1);
pub const ATR_PANE_ID: PaneId = PaneId::new(2);

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load chart setup
/// without inventing their own ad-hoc format. Omitted fields fall back to the
/// price/RSI/ATR dashboard layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub margins: ChartMargins,
    #[serde(default = "default_panes")]
    pub panes: Vec<PaneSpec>,
    #[serde(default = "default_indicators")]
    pub indicators: Vec<IndicatorSpec>,
    #[serde(default = "default_extent_bars")]
    pub default_extent_bars: usize,
    #[serde(default)]
    pub time_range_filter: TimeRangeFilter,
    #[serde(default)]
    pub wheel: WheelBehavior,
    #[serde(default)]
    pub style: RenderStyle,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::new(Viewport::new(800, 600))
    }
}

impl ChartConfig {
    /// Dashboard defaults for the given viewport.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            margins: ChartMargins::default(),
            panes: default_panes(),
            indicators: default_indicators(),
            default_extent_bars: default_extent_bars(),
            time_range_filter: TimeRangeFilter::default(),
            wheel: WheelBehavior::default(),
            style: RenderStyle::default(),
        }
    }

    #[must_use]
    pub fn with_margins(mut self, margins: ChartMargins) -> Self {
        self.margins = margins;
        self
    }

    #[must_use]
    pub fn with_panes(mut self, panes: Vec<PaneSpec>) -> Self {
        self.panes = panes;
        self
    }

    #[must_use]
    pub fn with_indicators(mut self, indicators: Vec<IndicatorSpec>) -> Self {
        self.indicators = indicators;
        self
    }

    #[must_use]
    pub fn with_default_extent_bars(mut self, bars: usize) -> Self {
        self.default_extent_bars = bars;
        self
    }

    #[must_use]
    pub fn with_time_range_filter(mut self, filter: TimeRangeFilter) -> Self {
        self.time_range_filter = filter;
        self
    }

    #[must_use]
    pub fn with_wheel(mut self, wheel: WheelBehavior) -> Self {
        self.wheel = wheel;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    /// Checks every section and returns the plot area it implies.
    pub fn validate(&self) -> ChartResult<PlotArea> {
        let viewport = self.viewport.validate()?;
        let margins = self.margins.validate()?;
        let plot = PlotArea::from_viewport(viewport, margins)?;
        if self.default_extent_bars == 0 {
            return Err(ChartError::InvalidConfig(
                "default_extent_bars must be >= 1".to_owned(),
            ));
        }
        validate_panes(&self.panes)?;
        validate_specs(&self.indicators)?;
        self.wheel.validate()?;
        Ok(plot)
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse config: {e}")))
    }
}

fn default_extent_bars() -> usize {
    DEFAULT_EXTENT_BARS
}

/// ATR(14), RSI(14), SMA(50) of volume, EMA(12) and EMA(26) of close.
#[must_use]
pub fn default_indicators() -> Vec<IndicatorSpec> {
    vec![
        IndicatorSpec::atr(0, 14, "atr14"),
        IndicatorSpec::rsi(1, 14, "rsi14"),
        IndicatorSpec::sma(2, 50, "sma_volume50")
            .with_source(SourceField::Price(PriceField::Volume)),
        IndicatorSpec::ema(3, 12, "ema12"),
        IndicatorSpec::ema(4, 26, "ema26"),
    ]
}

/// Price pane on top, then RSI and ATR panes anchored to the plot bottom.
#[must_use]
pub fn default_panes() -> Vec<PaneSpec> {
    let price = PaneSpec::new(
        PRICE_PANE_ID,
        300.0,
        DomainPolicy::Dynamic {
            sources: vec![
                DomainSource::HighLow,
                DomainSource::Source(SourceField::indicator("ema26")),
                DomainSource::Source(SourceField::indicator("ema12")),
            ],
        },
    )
    .with_origin(PaneOrigin::FromTop(0.0))
    .with_padding(PanePadding::new(0.04, 0.08))
    .with_series(SeriesSpec::Candlestick)
    .with_series(SeriesSpec::line(SourceField::indicator("ema26"), "EMA (26)"))
    .with_series(SeriesSpec::line(SourceField::indicator("ema12"), "EMA (12)"))
    .with_ticks(ValueAxisTicks::Count(5));

    let rsi = PaneSpec::new(
        RSI_PANE_ID,
        125.0,
        DomainPolicy::Fixed {
            min: 0.0,
            max: 100.0,
        },
    )
    .with_origin(PaneOrigin::FromBottom(250.0))
    .with_series(SeriesSpec::line(SourceField::indicator("rsi14"), "RSI (14)"))
    .with_ticks(ValueAxisTicks::Values(vec![30.0, 50.0, 70.0]))
    .with_reference_levels(vec![30.0, 50.0, 70.0]);

    let atr = PaneSpec::new(
        ATR_PANE_ID,
        125.0,
        DomainPolicy::Dynamic {
            sources: vec![DomainSource::Source(SourceField::indicator("atr14"))],
        },
    )
    .with_origin(PaneOrigin::FromBottom(125.0))
    .with_padding(PanePadding::new(0.1, 0.1))
    .with_series(SeriesSpec::line(SourceField::indicator("atr14"), "ATR (14)"))
    .with_ticks(ValueAxisTicks::Count(2));

    vec![price, rsi, atr]
}

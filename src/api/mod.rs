//! Engine facade wiring the pipeline, scales, layout, interaction and
//! rendering together.

mod data_controller;
mod engine_accessors;
mod engine_config;
mod engine_init;
mod interaction_controller;
mod render_coordinator;
mod time_scale_controller;

pub use engine_config::{
    ATR_PANE_ID, ChartConfig, PRICE_PANE_ID, RSI_PANE_ID, default_indicators, default_panes,
};

use crate::core::{Bar, PaneLayout, PlotArea, TimeRangeFilter, TimeScale};
use crate::indicators::EnrichedBar;
use crate::interaction::{InteractionController, ScrollBlocker};
use crate::render::Renderer;

/// Multi-pane OHLCV chart bound to a render backend and a host scroll hook.
///
/// Every dataset or filter change re-runs the whole indicator pipeline and
/// rebuilds the time scale and layout; extent changes and resizes only
/// recompute the layout.
pub struct ChartEngine<R: Renderer, B: ScrollBlocker> {
    renderer: R,
    config: ChartConfig,
    plot: PlotArea,
    source_bars: Vec<Bar>,
    filter: TimeRangeFilter,
    bars: Vec<EnrichedBar>,
    time_scale: TimeScale,
    layout: PaneLayout,
    interaction: InteractionController<B>,
}

use tracing::debug;

use crate::core::{PaneLayout, TimeScale};
use crate::error::ChartResult;
use crate::interaction::{InteractionController, ScrollBlocker};
use crate::render::Renderer;

use super::{ChartConfig, ChartEngine};

impl<R: Renderer, B: ScrollBlocker> ChartEngine<R, B> {
    /// Creates an engine with an empty dataset.
    pub fn new(renderer: R, blocker: B, config: ChartConfig) -> ChartResult<Self> {
        let plot = config.validate()?;
        let time_scale = TimeScale::build(
            Vec::new(),
            (plot.left, plot.right()),
            config.default_extent_bars,
        )?;
        let layout = PaneLayout::compute(&config.panes, plot.top, plot.height, &[], None)?;
        let interaction = InteractionController::new(blocker, config.wheel);

        debug!(
            width = config.viewport.width,
            height = config.viewport.height,
            panes = config.panes.len(),
            indicators = config.indicators.len(),
            "chart engine created"
        );
        Ok(Self {
            renderer,
            filter: config.time_range_filter,
            config,
            plot,
            source_bars: Vec::new(),
            bars: Vec::new(),
            time_scale,
            layout,
            interaction,
        })
    }
}

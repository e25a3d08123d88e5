use crate::core::{Bar, PaneLayout, PlotArea, TimeRangeFilter, TimeScale, Viewport};
use crate::indicators::EnrichedBar;
use crate::interaction::{HoverState, ScrollBlocker};
use crate::render::Renderer;

use super::{ChartConfig, ChartEngine};

impl<R: Renderer, B: ScrollBlocker> ChartEngine<R, B> {
    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    #[must_use]
    pub fn plot_area(&self) -> PlotArea {
        self.plot
    }

    /// Bars as loaded, before the time range filter.
    #[must_use]
    pub fn source_bars(&self) -> &[Bar] {
        &self.source_bars
    }

    /// Filtered bars with their indicator values.
    #[must_use]
    pub fn bars(&self) -> &[EnrichedBar] {
        &self.bars
    }

    #[must_use]
    pub fn time_range_filter(&self) -> TimeRangeFilter {
        self.filter
    }

    #[must_use]
    pub fn time_scale(&self) -> &TimeScale {
        &self.time_scale
    }

    #[must_use]
    pub fn layout(&self) -> &PaneLayout {
        &self.layout
    }

    #[must_use]
    pub fn hover(&self) -> Option<&HoverState> {
        self.interaction.hover()
    }

    #[must_use]
    pub fn is_scroll_locked(&self) -> bool {
        self.interaction.is_scroll_locked()
    }

    #[must_use]
    pub fn scroll_blocker(&self) -> &B {
        self.interaction.blocker()
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

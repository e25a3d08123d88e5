use tracing::debug;

use crate::core::{Extent, PaneLayout, PlotArea, Viewport};
use crate::error::ChartResult;
use crate::interaction::ScrollBlocker;
use crate::render::Renderer;

use super::ChartEngine;

impl<R: Renderer, B: ScrollBlocker> ChartEngine<R, B> {
    /// Updates viewport dimensions; the visible extent is kept.
    pub fn resize(&mut self, viewport: Viewport) -> ChartResult<()> {
        let result = self.apply_viewport(viewport);
        self.release_on_error(result)
    }

    fn apply_viewport(&mut self, viewport: Viewport) -> ChartResult<()> {
        let viewport = viewport.validate()?;
        let plot = PlotArea::from_viewport(viewport, self.config.margins)?;
        let layout = PaneLayout::compute(
            &self.config.panes,
            plot.top,
            plot.height,
            &self.bars,
            self.time_scale.extent(),
        )?;
        self.time_scale.set_pixel_range((plot.left, plot.right()))?;

        self.config.viewport = viewport;
        self.plot = plot;
        self.layout = layout;
        self.interaction.refresh(&self.time_scale, &self.layout);
        debug!(width = viewport.width, height = viewport.height, "viewport resized");
        Ok(())
    }

    /// Shows bars `start..=end`, clamped into the dataset.
    pub fn set_extent(&mut self, start: usize, end: usize) -> ChartResult<Option<Extent>> {
        let extent = self.time_scale.set_extent(start, end);
        let result = self.relayout().map(|()| extent);
        self.release_on_error(result)
    }

    /// Restores the default extent anchored at the latest bar.
    pub fn reset_extent(&mut self) -> ChartResult<Option<Extent>> {
        let extent = self.time_scale.reset_extent();
        let result = self.relayout().map(|()| extent);
        self.release_on_error(result)
    }

    /// Recomputes pane geometry and domains, then re-resolves the hover.
    pub(super) fn relayout(&mut self) -> ChartResult<()> {
        self.layout = PaneLayout::compute(
            &self.config.panes,
            self.plot.top,
            self.plot.height,
            &self.bars,
            self.time_scale.extent(),
        )?;
        self.interaction.refresh(&self.time_scale, &self.layout);
        Ok(())
    }
}

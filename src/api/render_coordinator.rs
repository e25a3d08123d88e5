use tracing::trace;

use crate::error::ChartResult;
use crate::interaction::ScrollBlocker;
use crate::render::{RenderFrame, Renderer, SceneInput, render_scene};

use super::ChartEngine;

impl<R: Renderer, B: ScrollBlocker> ChartEngine<R, B> {
    /// Builds the frame for the current state without drawing it.
    #[must_use]
    pub fn frame(&self) -> RenderFrame {
        render_scene(&SceneInput {
            viewport: self.config.viewport,
            plot: self.plot,
            bars: &self.bars,
            time_scale: &self.time_scale,
            panes: &self.config.panes,
            layout: &self.layout,
            hover: self.interaction.hover(),
            style: &self.config.style,
        })
    }

    /// Builds the current frame and hands it to the backend.
    ///
    /// A backend failure restores page scrolling before the error is returned.
    pub fn render(&mut self) -> ChartResult<()> {
        let frame = self.frame();
        trace!(commands = frame.len(), "render frame");
        let result = self.renderer.render(&frame);
        self.release_on_error(result)
    }
}

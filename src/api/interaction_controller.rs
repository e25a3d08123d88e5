use crate::core::Extent;
use crate::error::ChartResult;
use crate::interaction::{HoverState, ScrollBlocker};
use crate::render::Renderer;

use super::ChartEngine;

impl<R: Renderer, B: ScrollBlocker> ChartEngine<R, B> {
    pub fn pointer_enter(&mut self) {
        self.interaction.on_pointer_enter();
    }

    /// Moves the crosshair to the bar nearest to `x`, in viewport pixels.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> &HoverState {
        self.interaction
            .on_pointer_move(x, y, &self.time_scale, &self.layout)
    }

    pub fn pointer_leave(&mut self) {
        self.interaction.on_pointer_leave();
    }

    /// Zooms (vertical delta) or pans (horizontal delta) while hovered.
    pub fn wheel(&mut self, delta_x: f64, delta_y: f64) -> ChartResult<Option<Extent>> {
        let result = self
            .interaction
            .on_wheel(delta_x, delta_y, &mut self.time_scale);
        let result = match result {
            Ok(Some(extent)) => self.relayout().map(|()| Some(extent)),
            other => other,
        };
        self.release_on_error(result)
    }
}

mod format;
mod frame;
mod null_renderer;
mod primitives;
mod scene;
mod style;
mod ticks;

pub use format::{
    DATE_FORMAT, UNAVAILABLE_LABEL, format_date, format_optional, format_value, tooltip_lines,
};
pub use frame::{DrawCommand, Primitive, RenderFrame, RenderLayer};
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, LinePrimitive, LineStrokeStyle, PathPrimitive, RectPrimitive, TextHAlign,
    TextPrimitive,
};
pub use scene::{SceneInput, render_scene};
pub use style::RenderStyle;
pub use ticks::{TIME_LABEL_MIN_SPACING_PX, nice_ticks, time_tick_indices, value_ticks};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from chart domain and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}

use serde::{Deserialize, Serialize};

use crate::render::{Color, LineStrokeStyle};

/// Colors and metrics for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub candle_up_color: Color,
    pub candle_down_color: Color,
    /// Body width as a fraction of the bar slot.
    pub candle_body_ratio: f64,
    pub wick_width: f64,
    /// Line series colors, cycled by series position within a pane.
    pub line_palette: [Color; 4],
    pub line_width: f64,
    pub reference_line_color: Color,
    pub reference_line_style: LineStrokeStyle,
    pub axis_line_color: Color,
    pub axis_label_color: Color,
    pub axis_font_size_px: f64,
    pub axis_tick_length_px: f64,
    pub time_label_min_spacing_px: f64,
    pub crosshair_line_color: Color,
    pub crosshair_line_style: LineStrokeStyle,
    pub crosshair_label_box_color: Color,
    pub crosshair_label_text_color: Color,
    pub tooltip_box_color: Color,
    pub tooltip_border_color: Color,
    pub tooltip_text_color: Color,
    pub tooltip_font_size_px: f64,
    pub tooltip_padding_px: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            candle_up_color: Color::rgb(0.06, 0.62, 0.35),
            candle_down_color: Color::rgb(0.86, 0.22, 0.19),
            candle_body_ratio: 0.8,
            wick_width: 1.0,
            line_palette: [
                Color::rgb(0.16, 0.38, 1.0),
                Color::rgb(0.98, 0.55, 0.0),
                Color::rgb(0.55, 0.27, 0.68),
                Color::rgb(0.0, 0.6, 0.6),
            ],
            line_width: 1.5,
            reference_line_color: Color::rgb(0.55, 0.58, 0.62),
            reference_line_style: LineStrokeStyle::Dashed { dash: 4.0, gap: 4.0 },
            axis_line_color: Color::rgb(0.82, 0.84, 0.88),
            axis_label_color: Color::rgb(0.10, 0.12, 0.16),
            axis_font_size_px: 11.0,
            axis_tick_length_px: 4.0,
            time_label_min_spacing_px: super::ticks::TIME_LABEL_MIN_SPACING_PX,
            crosshair_line_color: Color::rgb(0.30, 0.35, 0.44),
            crosshair_line_style: LineStrokeStyle::Dashed { dash: 3.0, gap: 3.0 },
            crosshair_label_box_color: Color::rgb(0.94, 0.96, 0.99),
            crosshair_label_text_color: Color::rgb(0.10, 0.12, 0.16),
            tooltip_box_color: Color::rgba(1.0, 1.0, 1.0, 0.9),
            tooltip_border_color: Color::rgb(0.82, 0.84, 0.88),
            tooltip_text_color: Color::rgb(0.10, 0.12, 0.16),
            tooltip_font_size_px: 11.0,
            tooltip_padding_px: 5.0,
        }
    }
}

impl RenderStyle {
    #[must_use]
    pub fn series_color(&self, position: usize) -> Color {
        self.line_palette[position % self.line_palette.len()]
    }
}

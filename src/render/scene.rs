use tracing::trace;

use crate::core::{
    Extent, PaneGeometry, PaneLayout, PaneSpec, PlotArea, SeriesSpec, TimeScale, Viewport,
};
use crate::indicators::{EnrichedBar, SourceField};
use crate::interaction::HoverState;
use crate::render::format::{format_date, format_value, tooltip_lines};
use crate::render::ticks::{time_tick_indices, value_ticks};
use crate::render::{
    Color, LinePrimitive, PathPrimitive, Primitive, RectPrimitive, RenderFrame, RenderLayer,
    RenderStyle, TextHAlign, TextPrimitive,
};

const CHAR_WIDTH_RATIO: f64 = 0.6;
const TOOLTIP_LINE_HEIGHT_RATIO: f64 = 1.4;
const TOOLTIP_OFFSET_PX: f64 = 8.0;

/// Everything one frame is derived from.
#[derive(Debug, Clone, Copy)]
pub struct SceneInput<'a> {
    pub viewport: Viewport,
    pub plot: PlotArea,
    pub bars: &'a [EnrichedBar],
    pub time_scale: &'a TimeScale,
    pub panes: &'a [PaneSpec],
    pub layout: &'a PaneLayout,
    pub hover: Option<&'a HoverState>,
    pub style: &'a RenderStyle,
}

/// Builds the draw commands for one frame.
///
/// Pure function of `input`. Commands are grouped by [`RenderLayer`] in
/// paint order; within a layer panes appear in configuration order. An empty
/// dataset produces an empty frame.
#[must_use]
pub fn render_scene(input: &SceneInput<'_>) -> RenderFrame {
    let mut scene = Scene {
        input,
        frame: RenderFrame::new(input.viewport),
    };
    let Some(extent) = input.time_scale.extent() else {
        return scene.frame;
    };
    if input.bars.is_empty() {
        return scene.frame;
    }

    let panes: Vec<(&PaneSpec, PaneGeometry)> = input
        .panes
        .iter()
        .filter_map(|spec| input.layout.get(spec.id).map(|geometry| (spec, *geometry)))
        .collect();

    for (spec, geometry) in &panes {
        scene.reference_levels(spec, *geometry);
    }
    for (spec, geometry) in &panes {
        scene.series(spec, *geometry, extent);
    }
    for (spec, geometry) in &panes {
        scene.value_axis(spec, *geometry);
    }
    if let Some(lowest) = input.layout.lowest() {
        scene.time_axis(*lowest, extent);
    }
    if let Some(hover) = input.hover {
        scene.crosshair(hover, &panes);
        scene.tooltip(hover, &panes);
    }

    trace!(commands = scene.frame.len(), "scene built");
    scene.frame
}

struct Scene<'a, 'b> {
    input: &'b SceneInput<'a>,
    frame: RenderFrame,
}

impl Scene<'_, '_> {
    fn style(&self) -> &RenderStyle {
        self.input.style
    }

    fn line(&mut self, geometry: PaneGeometry, layer: RenderLayer, line: LinePrimitive) {
        self.frame
            .push(geometry.pane_id, layer, Primitive::Line(line));
    }

    fn label_box(
        &mut self,
        geometry: PaneGeometry,
        text: String,
        anchor: (f64, f64),
        h_align: TextHAlign,
    ) {
        let style = *self.style();
        let font = style.axis_font_size_px;
        let padding = style.tooltip_padding_px;
        let width = text_width(&text, font) + 2.0 * padding;
        let height = font + 2.0 * padding;
        let (x, y) = anchor;
        let left = match h_align {
            TextHAlign::Left => x,
            TextHAlign::Center => x - width / 2.0,
            TextHAlign::Right => x - width,
        };
        let rect = RectPrimitive::new(left, y, width, height, style.crosshair_label_box_color)
            .with_border(style.axis_line_color);
        self.frame
            .push(geometry.pane_id, RenderLayer::Crosshair, Primitive::Rect(rect));
        let text = TextPrimitive::new(
            text,
            left + padding,
            y + padding + font,
            font,
            style.crosshair_label_text_color,
            TextHAlign::Left,
        );
        self.frame
            .push(geometry.pane_id, RenderLayer::Crosshair, Primitive::Text(text));
    }

    fn reference_levels(&mut self, spec: &PaneSpec, geometry: PaneGeometry) {
        let Some(domain) = geometry.y_domain else {
            return;
        };
        let plot = self.input.plot;
        let style = *self.style();
        for level in &spec.reference_levels {
            if !domain.contains(*level) {
                continue;
            }
            let Some(y) = geometry.value_to_y(*level) else {
                continue;
            };
            let line = LinePrimitive::new(
                plot.left,
                y,
                plot.right(),
                y,
                1.0,
                style.reference_line_color,
            )
            .with_stroke_style(style.reference_line_style);
            self.line(geometry, RenderLayer::Reference, line);
        }
    }

    fn series(&mut self, spec: &PaneSpec, geometry: PaneGeometry, extent: Extent) {
        if geometry.y_domain.is_none() {
            return;
        }
        let mut line_position = 0;
        for series in &spec.series {
            match series {
                SeriesSpec::Candlestick => self.candles(geometry, extent),
                SeriesSpec::Line { source, .. } => {
                    let color = self.style().series_color(line_position);
                    self.polyline(geometry, extent, source, color);
                    line_position += 1;
                }
            }
        }
    }

    fn candles(&mut self, geometry: PaneGeometry, extent: Extent) {
        let style = *self.style();
        let time_scale = self.input.time_scale;
        let slot = time_scale.slot_width().unwrap_or(1.0);
        let body_width = (slot * style.candle_body_ratio).max(1.0);

        for index in extent.indices() {
            let Some(bar) = self.input.bars.get(index) else {
                break;
            };
            let Some((open, high, low, close)) = bar.bar.ohlc() else {
                continue;
            };
            let (Some(x), Some(y_open), Some(y_high), Some(y_low), Some(y_close)) = (
                time_scale.pixel_of(index),
                geometry.value_to_y(open),
                geometry.value_to_y(high),
                geometry.value_to_y(low),
                geometry.value_to_y(close),
            ) else {
                continue;
            };
            let color = if close >= open {
                style.candle_up_color
            } else {
                style.candle_down_color
            };

            let wick = LinePrimitive::new(x, y_high, x, y_low, style.wick_width, color);
            self.line(geometry, RenderLayer::Series, wick);
            let body = RectPrimitive::new(
                x - body_width / 2.0,
                y_open.min(y_close),
                body_width,
                (y_open - y_close).abs(),
                color,
            )
            .with_border(color);
            self.frame
                .push(geometry.pane_id, RenderLayer::Series, Primitive::Rect(body));
        }
    }

    /// One path per run of available values; gaps break the line.
    fn polyline(
        &mut self,
        geometry: PaneGeometry,
        extent: Extent,
        source: &SourceField,
        color: Color,
    ) {
        let time_scale = self.input.time_scale;
        let mut run: Vec<(f64, f64)> = Vec::new();
        for index in extent.indices() {
            let point = self
                .input
                .bars
                .get(index)
                .and_then(|bar| bar.source(source))
                .and_then(|value| Some((time_scale.pixel_of(index)?, geometry.value_to_y(value)?)));
            match point {
                Some(point) => run.push(point),
                None => self.flush_run(geometry, &mut run, color),
            }
        }
        self.flush_run(geometry, &mut run, color);
    }

    fn flush_run(&mut self, geometry: PaneGeometry, run: &mut Vec<(f64, f64)>, color: Color) {
        if run.len() < 2 {
            run.clear();
            return;
        }
        let path = PathPrimitive::new(std::mem::take(run), self.style().line_width, color);
        self.frame
            .push(geometry.pane_id, RenderLayer::Series, Primitive::Path(path));
    }

    fn value_axis(&mut self, spec: &PaneSpec, geometry: PaneGeometry) {
        let style = *self.style();
        let x = self.input.plot.right();
        let axis = LinePrimitive::new(
            x,
            geometry.origin_y,
            x,
            geometry.bottom(),
            1.0,
            style.axis_line_color,
        );
        self.line(geometry, RenderLayer::Axis, axis);

        let Some(domain) = geometry.y_domain else {
            return;
        };
        for value in value_ticks(&spec.ticks, domain) {
            let Some(y) = geometry.value_to_y(value) else {
                continue;
            };
            let tick = LinePrimitive::new(
                x,
                y,
                x + style.axis_tick_length_px,
                y,
                1.0,
                style.axis_line_color,
            );
            self.line(geometry, RenderLayer::Axis, tick);
            let label = TextPrimitive::new(
                format_value(value),
                x + style.axis_tick_length_px + 2.0,
                y + style.axis_font_size_px / 3.0,
                style.axis_font_size_px,
                style.axis_label_color,
                TextHAlign::Left,
            );
            self.frame
                .push(geometry.pane_id, RenderLayer::Axis, Primitive::Text(label));
        }
    }

    fn time_axis(&mut self, lowest: PaneGeometry, extent: Extent) {
        let style = *self.style();
        let plot = self.input.plot;
        let time_scale = self.input.time_scale;
        let y = lowest.bottom();
        let axis = LinePrimitive::new(plot.left, y, plot.right(), y, 1.0, style.axis_line_color);
        self.line(lowest, RenderLayer::Axis, axis);

        let Some(slot) = time_scale.slot_width() else {
            return;
        };
        for index in time_tick_indices(extent, slot, style.time_label_min_spacing_px) {
            let (Some(x), Some(date)) = (time_scale.pixel_of(index), time_scale.date_of(index))
            else {
                continue;
            };
            let tick = LinePrimitive::new(
                x,
                y,
                x,
                y + style.axis_tick_length_px,
                1.0,
                style.axis_line_color,
            );
            self.line(lowest, RenderLayer::Axis, tick);
            let label = TextPrimitive::new(
                format_date(date),
                x,
                y + style.axis_tick_length_px + style.axis_font_size_px,
                style.axis_font_size_px,
                style.axis_label_color,
                TextHAlign::Center,
            );
            self.frame
                .push(lowest.pane_id, RenderLayer::Axis, Primitive::Text(label));
        }
    }

    fn crosshair(&mut self, hover: &HoverState, panes: &[(&PaneSpec, PaneGeometry)]) {
        let Some(x) = hover.crosshair_x else {
            return;
        };
        let style = *self.style();
        let plot = self.input.plot;

        for (spec, geometry) in panes {
            let Some(flags) = hover.flags(spec.id) else {
                continue;
            };
            if flags.vertical_line {
                let line = LinePrimitive::new(
                    x,
                    geometry.origin_y,
                    x,
                    geometry.bottom(),
                    1.0,
                    style.crosshair_line_color,
                )
                .with_stroke_style(style.crosshair_line_style);
                self.line(*geometry, RenderLayer::Crosshair, line);
            }
            if flags.horizontal_line {
                let y = hover.pointer_y;
                let line = LinePrimitive::new(
                    plot.left,
                    y,
                    plot.right(),
                    y,
                    1.0,
                    style.crosshair_line_color,
                )
                .with_stroke_style(style.crosshair_line_style);
                self.line(*geometry, RenderLayer::Crosshair, line);
                if let Some(value) = geometry.y_to_value(y) {
                    let height = style.axis_font_size_px + 2.0 * style.tooltip_padding_px;
                    self.label_box(
                        *geometry,
                        format_value(value),
                        (plot.right(), y - height / 2.0),
                        TextHAlign::Left,
                    );
                }
            }
        }

        if let (Some(date), Some(lowest)) = (hover.date, self.input.layout.lowest()) {
            self.label_box(
                *lowest,
                format_date(date),
                (x, lowest.bottom() + 1.0),
                TextHAlign::Center,
            );
        }
    }

    fn tooltip(&mut self, hover: &HoverState, panes: &[(&PaneSpec, PaneGeometry)]) {
        let (Some(active), Some(index)) = (hover.active_pane, hover.index) else {
            return;
        };
        let Some((spec, geometry)) = panes.iter().find(|(spec, _)| spec.id == active) else {
            return;
        };
        if !hover.flags(active).is_some_and(|flags| flags.tooltip) {
            return;
        }
        let Some(bar) = self.input.bars.get(index) else {
            return;
        };

        let style = *self.style();
        let font = style.tooltip_font_size_px;
        let padding = style.tooltip_padding_px;
        let line_height = font * TOOLTIP_LINE_HEIGHT_RATIO;
        let lines = tooltip_lines(bar, spec);
        let width = lines
            .iter()
            .map(|line| text_width(line, font))
            .fold(0.0, f64::max)
            + 2.0 * padding;
        let height = lines.len() as f64 * line_height + 2.0 * padding;
        let left = self.input.plot.left + TOOLTIP_OFFSET_PX;
        let top = geometry.origin_y + TOOLTIP_OFFSET_PX;

        let rect = RectPrimitive::new(left, top, width, height, style.tooltip_box_color)
            .with_border(style.tooltip_border_color);
        self.frame
            .push(geometry.pane_id, RenderLayer::Tooltip, Primitive::Rect(rect));
        for (row, line) in lines.into_iter().enumerate() {
            let text = TextPrimitive::new(
                line,
                left + padding,
                top + padding + font + row as f64 * line_height,
                font,
                style.tooltip_text_color,
                TextHAlign::Left,
            );
            self.frame
                .push(geometry.pane_id, RenderLayer::Tooltip, Primitive::Text(text));
        }
    }
}

fn text_width(text: &str, font_size_px: f64) -> f64 {
    text.chars().count() as f64 * font_size_px * CHAR_WIDTH_RATIO
}

use chrono::NaiveDate;

use crate::core::{PaneSpec, SeriesSpec};
use crate::indicators::EnrichedBar;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const UNAVAILABLE_LABEL: &str = "n/a";

#[must_use]
pub fn format_value(value: f64) -> String {
    format!("{value:.2}")
}

#[must_use]
pub fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| UNAVAILABLE_LABEL.to_owned(), format_value)
}

#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Tooltip text for `bar` as shown in `pane`: the date, then OHLC and volume
/// for a candlestick series, then one line per line series.
#[must_use]
pub fn tooltip_lines(bar: &EnrichedBar, pane: &PaneSpec) -> Vec<String> {
    let mut lines = vec![format!("Date: {}", format_date(bar.date()))];
    for series in &pane.series {
        match series {
            SeriesSpec::Candlestick => {
                lines.push(format!("O: {}", format_optional(bar.bar.open)));
                lines.push(format!("H: {}", format_optional(bar.bar.high)));
                lines.push(format!("L: {}", format_optional(bar.bar.low)));
                lines.push(format!("C: {}", format_optional(bar.bar.close)));
                lines.push(format!(
                    "Volume: {}",
                    format_optional(bar.bar.volume.map(|volume| volume as f64))
                ));
            }
            SeriesSpec::Line { source, label } => {
                lines.push(format!("{label}: {}", format_optional(bar.source(source))));
            }
        }
    }
    lines
}

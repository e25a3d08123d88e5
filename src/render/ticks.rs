use crate::core::{Extent, ValueAxisTicks, ValueDomain};

/// Minimum horizontal distance between two date labels.
pub const TIME_LABEL_MIN_SPACING_PX: f64 = 72.0;

/// Tick values for a pane's value axis, restricted to `domain`.
#[must_use]
pub fn value_ticks(policy: &ValueAxisTicks, domain: ValueDomain) -> Vec<f64> {
    match policy {
        ValueAxisTicks::Count(count) => nice_ticks(domain, *count),
        ValueAxisTicks::Values(values) => values
            .iter()
            .copied()
            .filter(|value| domain.contains(*value))
            .collect(),
    }
}

/// Roughly `count` ticks on a 1/2/5·10^k grid covering `domain`.
#[must_use]
pub fn nice_ticks(domain: ValueDomain, count: usize) -> Vec<f64> {
    let span = domain.span();
    if count == 0 || !span.is_finite() || span <= 0.0 {
        return Vec::new();
    }

    let step = nice_step(span / count as f64);
    let first = (domain.min / step).ceil();
    let last = (domain.max / step).floor();
    if !first.is_finite() || !last.is_finite() || last < first {
        return Vec::new();
    }
    (first as i64..=last as i64)
        .map(|k| k as f64 * step)
        .collect()
}

const RESIDUAL_EPSILON: f64 = 1e-9;

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let residual = raw / magnitude;
    let nice = if residual <= 1.0 + RESIDUAL_EPSILON {
        1.0
    } else if residual <= 2.0 + RESIDUAL_EPSILON {
        2.0
    } else if residual <= 5.0 + RESIDUAL_EPSILON {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Bar indices that receive a date label.
///
/// Labels sit on multiples of a fixed stride so they stay put while panning.
#[must_use]
pub fn time_tick_indices(extent: Extent, slot_width: f64, min_spacing_px: f64) -> Vec<usize> {
    if !slot_width.is_finite() || slot_width <= 0.0 {
        return Vec::new();
    }
    let stride = if min_spacing_px.is_finite() && min_spacing_px > 0.0 {
        ((min_spacing_px / slot_width).ceil() as usize).max(1)
    } else {
        1
    };
    let first = extent.start.div_ceil(stride) * stride;
    (first..=extent.end).step_by(stride).collect()
}

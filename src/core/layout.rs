use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::pane::{DomainPolicy, DomainSource, PaneId, PaneOrigin, PanePadding, PaneSpec};
use crate::core::time_scale::Extent;
use crate::core::{LinearScale, validate_panes};
use crate::error::{ChartError, ChartResult};
use crate::indicators::EnrichedBar;

/// Closed value interval shown by a pane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueDomain {
    pub min: f64,
    pub max: f64,
}

impl ValueDomain {
    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Resolved vertical placement of one pane in plot pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaneGeometry {
    pub pane_id: PaneId,
    pub origin_y: f64,
    pub height: f64,
    /// `None` when a dynamic pane has no available value in the extent.
    pub y_domain: Option<ValueDomain>,
}

impl PaneGeometry {
    #[must_use]
    pub fn bottom(self) -> f64 {
        self.origin_y + self.height
    }

    /// Half-open: `[origin_y, bottom)`.
    #[must_use]
    pub fn contains_y(self, y: f64) -> bool {
        y >= self.origin_y && y < self.bottom()
    }

    /// Value axis with larger values towards the pane top.
    #[must_use]
    pub fn value_scale(self) -> Option<LinearScale> {
        let domain = self.y_domain?;
        LinearScale::new(domain.min, domain.max, self.bottom(), self.origin_y).ok()
    }

    #[must_use]
    pub fn value_to_y(self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        Some(self.value_scale()?.to_pixel(value))
    }

    #[must_use]
    pub fn y_to_value(self, y: f64) -> Option<f64> {
        if !y.is_finite() {
            return None;
        }
        Some(self.value_scale()?.to_domain(y))
    }
}

/// Pane geometries in top-to-bottom configuration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaneLayout {
    panes: IndexMap<PaneId, PaneGeometry>,
}

impl PaneLayout {
    /// Places `specs` inside the plot band `[plot_top, plot_top + total_height]`
    /// and resolves each pane's value domain over `extent`.
    ///
    /// Heights are clipped to the plot. A pane starting inside the previous
    /// pane truncates it; one starting at or above the previous origin is a
    /// [`ChartError::PaneOverlap`].
    pub fn compute(
        specs: &[PaneSpec],
        plot_top: f64,
        total_height: f64,
        bars: &[EnrichedBar],
        extent: Option<Extent>,
    ) -> ChartResult<Self> {
        if !plot_top.is_finite() || !total_height.is_finite() || total_height <= 0.0 {
            return Err(ChartError::InvalidData(
                "pane layout needs a finite, positive plot height".to_owned(),
            ));
        }
        validate_panes(specs)?;

        let plot_bottom = plot_top + total_height;
        let mut panes: IndexMap<PaneId, PaneGeometry> = IndexMap::with_capacity(specs.len());
        let mut cursor = plot_top;

        for spec in specs {
            let origin_y = match spec.origin {
                PaneOrigin::Stacked => cursor,
                PaneOrigin::FromTop(offset) => plot_top + offset,
                PaneOrigin::FromBottom(offset) => plot_bottom - offset,
            }
            .clamp(plot_top, plot_bottom);

            if let Some((_, previous)) = panes.last_mut() {
                if origin_y < previous.bottom() {
                    if origin_y <= previous.origin_y {
                        return Err(ChartError::PaneOverlap { pane: spec.id });
                    }
                    warn!(
                        pane = spec.id.raw(),
                        previous = previous.pane_id.raw(),
                        from = previous.height,
                        to = origin_y - previous.origin_y,
                        "pane origin overlaps previous pane, truncating"
                    );
                    previous.height = origin_y - previous.origin_y;
                }
            }

            let height = spec.height_px.min(plot_bottom - origin_y).max(0.0);
            let y_domain = resolve_domain(&spec.domain, spec.padding, bars, extent);
            panes.insert(
                spec.id,
                PaneGeometry {
                    pane_id: spec.id,
                    origin_y,
                    height,
                    y_domain,
                },
            );
            cursor = origin_y + height;
        }

        debug!(panes = panes.len(), plot_top, total_height, "pane layout computed");
        Ok(Self { panes })
    }

    #[must_use]
    pub fn get(&self, pane_id: PaneId) -> Option<&PaneGeometry> {
        self.panes.get(&pane_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PaneGeometry> {
        self.panes.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.panes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }

    /// Pane whose `[origin, bottom)` band contains `y`.
    #[must_use]
    pub fn pane_at(&self, y: f64) -> Option<&PaneGeometry> {
        self.panes.values().find(|pane| pane.contains_y(y))
    }

    /// Pane drawn lowest on screen; it carries the shared time axis.
    #[must_use]
    pub fn lowest(&self) -> Option<&PaneGeometry> {
        self.panes
            .values()
            .max_by_key(|pane| OrderedFloat(pane.bottom()))
    }
}

fn resolve_domain(
    policy: &DomainPolicy,
    padding: PanePadding,
    bars: &[EnrichedBar],
    extent: Option<Extent>,
) -> Option<ValueDomain> {
    match policy {
        DomainPolicy::Fixed { min, max } => Some(ValueDomain {
            min: *min,
            max: *max,
        }),
        DomainPolicy::Dynamic { sources } => dynamic_domain(sources, padding, bars, extent?),
    }
}

fn dynamic_domain(
    sources: &[DomainSource],
    padding: PanePadding,
    bars: &[EnrichedBar],
    extent: Extent,
) -> Option<ValueDomain> {
    let last = bars.len().checked_sub(1)?;
    let visible = bars.get(extent.start.min(last)..=extent.end.min(last))?;

    let (min, max) = visible
        .iter()
        .flat_map(|bar| {
            sources.iter().flat_map(move |source| match source {
                DomainSource::HighLow => [bar.bar.high, bar.bar.low],
                DomainSource::Source(field) => [bar.source(field), None],
            })
        })
        .flatten()
        .filter(|value| value.is_finite())
        .map(OrderedFloat)
        .fold(None, |range, value| match range {
            None => Some((value, value)),
            Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
        })?;
    let (min, max) = (min.into_inner(), max.into_inner());

    let span = max - min;
    if span <= 0.0 {
        let half = if min == 0.0 { 0.5 } else { min.abs() * 0.01 };
        return Some(ValueDomain {
            min: min - half,
            max: max + half,
        });
    }
    Some(ValueDomain {
        min: min - span * padding.bottom,
        max: max + span * padding.top,
    })
}

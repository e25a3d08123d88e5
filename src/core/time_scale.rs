use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::LinearScale;
use crate::error::{ChartError, ChartResult};

/// Number of most recent bars visible after a dataset is loaded.
pub const DEFAULT_EXTENT_BARS: usize = 150;

/// Inclusive range of bar indices currently visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent {
    pub start: usize,
    pub end: usize,
}

impl Extent {
    #[must_use]
    pub fn len(self) -> usize {
        self.end - self.start + 1
    }

    #[must_use]
    pub fn contains(self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }

    #[must_use]
    pub fn indices(self) -> RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Discontinuous time axis over trading dates.
///
/// Bars are addressed by their position in the date sequence, so gaps in the
/// calendar (weekends, holidays) take no horizontal space. The visible extent
/// is widened by half a slot on each side before being mapped onto the pixel
/// range, which centres every bar in a slot of `width / extent.len()` pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    dates: Vec<NaiveDate>,
    extent: Option<Extent>,
    range_start: f64,
    range_end: f64,
    default_extent_bars: usize,
}

impl TimeScale {
    /// Indexes `dates` and shows the latest `default_extent_bars` of them.
    ///
    /// `dates` must be strictly increasing. An empty slice yields a scale
    /// without extent whose lookups all return `None`.
    pub fn build(
        dates: Vec<NaiveDate>,
        pixel_range: (f64, f64),
        default_extent_bars: usize,
    ) -> ChartResult<Self> {
        validate_pixel_range(pixel_range)?;
        if default_extent_bars == 0 {
            return Err(ChartError::InvalidConfig(
                "default extent must cover at least one bar".to_owned(),
            ));
        }
        for (index, pair) in dates.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(ChartError::UnsortedInput {
                    index: index + 1,
                    previous: pair[0],
                    current: pair[1],
                });
            }
        }

        let mut scale = Self {
            dates,
            extent: None,
            range_start: pixel_range.0,
            range_end: pixel_range.1,
            default_extent_bars,
        };
        scale.reset_extent();
        Ok(scale)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    #[must_use]
    pub fn extent(&self) -> Option<Extent> {
        self.extent
    }

    #[must_use]
    pub fn pixel_range(&self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    #[must_use]
    pub fn date_of(&self, index: usize) -> Option<NaiveDate> {
        self.dates.get(index).copied()
    }

    /// Pixel x of the centre of bar `index`.
    ///
    /// Indices outside the extent still map (off-screen) as long as they
    /// exist in the dataset.
    #[must_use]
    pub fn pixel_of(&self, index: usize) -> Option<f64> {
        if index >= self.dates.len() {
            return None;
        }
        Some(self.linear()?.to_pixel(index as f64))
    }

    /// Visible bar whose centre is closest to `pixel_x`, clamped to the extent.
    ///
    /// Binary search over the extent, so the cost is `O(log n)` per pointer event.
    /// Ties resolve to the earlier bar.
    #[must_use]
    pub fn nearest_index(&self, pixel_x: f64) -> Option<usize> {
        if !pixel_x.is_finite() {
            return None;
        }
        let extent = self.extent?;
        let scale = self.linear()?;

        let mut lo = extent.start;
        let mut hi = extent.end + 1;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if scale.to_pixel(mid as f64) < pixel_x {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }

        if lo > extent.end {
            return Some(extent.end);
        }
        if lo == extent.start {
            return Some(lo);
        }
        let left = lo - 1;
        let left_distance = pixel_x - scale.to_pixel(left as f64);
        let right_distance = scale.to_pixel(lo as f64) - pixel_x;
        Some(if left_distance <= right_distance { left } else { lo })
    }

    /// Horizontal pixels owned by one visible bar.
    #[must_use]
    pub fn slot_width(&self) -> Option<f64> {
        let extent = self.extent?;
        Some((self.range_end - self.range_start) / extent.len() as f64)
    }

    /// Updates the pixel range after a resize; the extent is unchanged.
    pub fn set_pixel_range(&mut self, pixel_range: (f64, f64)) -> ChartResult<()> {
        validate_pixel_range(pixel_range)?;
        self.range_start = pixel_range.0;
        self.range_end = pixel_range.1;
        Ok(())
    }

    /// Sets the visible extent, clamping it into the dataset.
    ///
    /// Swapped bounds are reordered. Returns the extent actually applied.
    pub fn set_extent(&mut self, start: usize, end: usize) -> Option<Extent> {
        let last = self.dates.len().checked_sub(1)?;
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let end = end.min(last);
        let start = start.min(end);
        self.extent = Some(Extent { start, end });
        self.extent
    }

    /// Restores the default extent anchored at the latest bar.
    pub fn reset_extent(&mut self) -> Option<Extent> {
        let Some(last) = self.dates.len().checked_sub(1) else {
            self.extent = None;
            return None;
        };
        let span = self.default_extent_bars.min(self.dates.len());
        self.extent = Some(Extent {
            start: last + 1 - span,
            end: last,
        });
        self.extent
    }

    /// Shifts the extent by whole bars, keeping its length.
    pub fn pan_by_bars(&mut self, delta: i64) -> Option<Extent> {
        let extent = self.extent?;
        let span = extent.len();
        let max_start = (self.dates.len() - span) as i64;
        let start = (extent.start as i64).saturating_add(delta).clamp(0, max_start) as usize;
        self.extent = Some(Extent {
            start,
            end: start + span - 1,
        });
        self.extent
    }

    /// Scales the extent length by `1 / factor` around `anchor_index`.
    ///
    /// `factor > 1.0` zooms in. The anchor keeps its relative position and the
    /// resulting length is clamped to `[min_bars, len]`.
    pub fn zoom_by_factor(
        &mut self,
        factor: f64,
        anchor_index: usize,
        min_bars: usize,
    ) -> ChartResult<Option<Extent>> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ChartError::InvalidData(
                "zoom factor must be finite and > 0".to_owned(),
            ));
        }
        let Some(extent) = self.extent else {
            return Ok(None);
        };

        let len = self.dates.len();
        let span = extent.len() as f64;
        let target = ((span / factor).round() as usize).clamp(min_bars.clamp(1, len), len);
        let anchor = anchor_index.clamp(extent.start, extent.end);
        let left_ratio = (anchor - extent.start) as f64 / span;
        let start = (anchor as f64 - left_ratio * target as f64).round().max(0.0) as usize;
        let start = start.min(len - target);

        self.extent = Some(Extent {
            start,
            end: start + target - 1,
        });
        Ok(self.extent)
    }

    fn linear(&self) -> Option<LinearScale> {
        let extent = self.extent?;
        LinearScale::new(
            extent.start as f64 - 0.5,
            extent.end as f64 + 0.5,
            self.range_start,
            self.range_end,
        )
        .ok()
    }
}

fn validate_pixel_range(range: (f64, f64)) -> ChartResult<()> {
    if !range.0.is_finite() || !range.1.is_finite() || range.1 <= range.0 {
        return Err(ChartError::InvalidData(
            "time scale pixel range must be finite and increasing".to_owned(),
        ));
    }
    Ok(())
}

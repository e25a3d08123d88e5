//! Pointer handling shared by all panes.
//!
//! A pointer x is resolved to one bar index per event and broadcast to every
//! pane: each gets the vertical crosshair at the snapped x, while only the pane
//! under the pointer gets the horizontal line and the tooltip.

mod scroll_lock;

pub use scroll_lock::{NullScrollBlocker, ScrollBlocker, ScrollLock};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::core::{Extent, PaneId, PaneLayout, TimeScale};
use crate::error::{ChartError, ChartResult};

/// Wheel handling while the pointer is over the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelBehavior {
    /// Extent length is divided (zoom in) or multiplied (zoom out) by this
    /// factor per vertical wheel event.
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f64,
    /// Zooming in stops at this many visible bars.
    #[serde(default = "default_min_bars")]
    pub min_bars: usize,
}

fn default_zoom_step() -> f64 {
    1.2
}

fn default_min_bars() -> usize {
    10
}

impl Default for WheelBehavior {
    fn default() -> Self {
        Self {
            zoom_step: default_zoom_step(),
            min_bars: default_min_bars(),
        }
    }
}

impl WheelBehavior {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.zoom_step.is_finite() || self.zoom_step <= 1.0 {
            return Err(ChartError::InvalidConfig(
                "wheel zoom step must be finite and > 1".to_owned(),
            ));
        }
        if self.min_bars == 0 {
            return Err(ChartError::InvalidConfig(
                "wheel min_bars must be >= 1".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Crosshair parts a pane draws for the current hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneHoverFlags {
    pub pane_id: PaneId,
    pub vertical_line: bool,
    pub horizontal_line: bool,
    pub tooltip: bool,
}

/// Transient pointer state; rebuilt on every move and never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HoverState {
    pub pointer_x: f64,
    pub pointer_y: f64,
    /// `None` when the dataset is empty.
    pub index: Option<usize>,
    pub date: Option<NaiveDate>,
    /// Pixel x of the hovered bar's centre.
    pub crosshair_x: Option<f64>,
    pub active_pane: Option<PaneId>,
    pub panes: SmallVec<[PaneHoverFlags; 4]>,
}

impl HoverState {
    #[must_use]
    pub fn flags(&self, pane_id: PaneId) -> Option<&PaneHoverFlags> {
        self.panes.iter().find(|flags| flags.pane_id == pane_id)
    }
}

/// Owns the hover state and the scroll lock for one chart surface.
#[derive(Debug)]
pub struct InteractionController<B: ScrollBlocker> {
    lock: ScrollLock<B>,
    hover: Option<HoverState>,
    wheel: WheelBehavior,
}

impl<B: ScrollBlocker> InteractionController<B> {
    #[must_use]
    pub fn new(blocker: B, wheel: WheelBehavior) -> Self {
        Self {
            lock: ScrollLock::new(blocker),
            hover: None,
            wheel,
        }
    }

    #[must_use]
    pub fn hover(&self) -> Option<&HoverState> {
        self.hover.as_ref()
    }

    #[must_use]
    pub fn is_scroll_locked(&self) -> bool {
        self.lock.is_held()
    }

    #[must_use]
    pub fn wheel_behavior(&self) -> WheelBehavior {
        self.wheel
    }

    #[must_use]
    pub fn blocker(&self) -> &B {
        self.lock.blocker()
    }

    pub fn on_pointer_enter(&mut self) {
        if self.lock.acquire() {
            trace!("pointer entered chart");
        }
    }

    /// Resolves the pointer to a bar and updates the hover state in place.
    ///
    /// Implies [`Self::on_pointer_enter`] when the pointer was not inside yet.
    pub fn on_pointer_move(
        &mut self,
        x: f64,
        y: f64,
        time_scale: &TimeScale,
        layout: &PaneLayout,
    ) -> &HoverState {
        self.on_pointer_enter();

        let index = time_scale.nearest_index(x);
        let date = index.and_then(|index| time_scale.date_of(index));
        let crosshair_x = index.and_then(|index| time_scale.pixel_of(index));
        let active_pane = layout.pane_at(y).map(|pane| pane.pane_id);
        trace!(x, y, ?index, pane = ?active_pane.map(PaneId::raw), "pointer moved");

        let hover = self.hover.get_or_insert_with(HoverState::default);
        hover.pointer_x = x;
        hover.pointer_y = y;
        hover.index = index;
        hover.date = date;
        hover.crosshair_x = crosshair_x;
        hover.active_pane = active_pane;
        hover.panes.clear();
        hover.panes.extend(layout.iter().map(|pane| {
            let active = active_pane == Some(pane.pane_id);
            PaneHoverFlags {
                pane_id: pane.pane_id,
                vertical_line: crosshair_x.is_some(),
                horizontal_line: active,
                tooltip: active && index.is_some(),
            }
        }));
        hover
    }

    /// Re-resolves the last pointer position after the extent or layout changed.
    pub fn refresh(&mut self, time_scale: &TimeScale, layout: &PaneLayout) {
        if let Some((x, y)) = self
            .hover
            .as_ref()
            .map(|hover| (hover.pointer_x, hover.pointer_y))
        {
            self.on_pointer_move(x, y, time_scale, layout);
        }
    }

    /// Clears the hover state and restores page scrolling.
    pub fn on_pointer_leave(&mut self) {
        self.hover = None;
        if self.lock.release() {
            trace!("pointer left chart");
        }
    }

    /// Restores page scrolling without touching the hover state.
    pub fn release_scroll_lock(&mut self) -> bool {
        self.lock.release()
    }

    /// Wheel input while hovered: vertical delta zooms around the hovered bar
    /// (negative zooms in), horizontal delta pans by whole bars.
    ///
    /// Ignored (`Ok(None)`) while the pointer is outside the chart.
    pub fn on_wheel(
        &mut self,
        delta_x: f64,
        delta_y: f64,
        time_scale: &mut TimeScale,
    ) -> ChartResult<Option<Extent>> {
        if !delta_x.is_finite() || !delta_y.is_finite() {
            return Err(ChartError::InvalidData(
                "wheel deltas must be finite".to_owned(),
            ));
        }
        if !self.lock.is_held() {
            return Ok(None);
        }
        let Some(extent) = time_scale.extent() else {
            return Ok(None);
        };

        let mut applied = None;
        if delta_y != 0.0 {
            let factor = if delta_y < 0.0 {
                self.wheel.zoom_step
            } else {
                self.wheel.zoom_step.recip()
            };
            let anchor = self
                .hover
                .as_ref()
                .and_then(|hover| hover.index)
                .unwrap_or(extent.end);
            applied = time_scale.zoom_by_factor(factor, anchor, self.wheel.min_bars)?;
        }
        if delta_x != 0.0 {
            let slot = time_scale.slot_width().unwrap_or(1.0);
            let mut bars = (delta_x / slot).round() as i64;
            if bars == 0 {
                bars = delta_x.signum() as i64;
            }
            applied = time_scale.pan_by_bars(bars);
        }
        trace!(delta_x, delta_y, extent = ?applied, "wheel handled");
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};

    use super::{InteractionController, NullScrollBlocker, WheelBehavior};
    use crate::core::{DomainPolicy, Extent, PaneId, PaneLayout, PaneOrigin, PaneSpec, TimeScale};

    fn scale(count: u64) -> TimeScale {
        let start = NaiveDate::from_ymd_opt(2021, 1, 4).expect("date");
        let dates = (0..count).map(|i| start + Days::new(i)).collect();
        TimeScale::build(dates, (0.0, 100.0), 150).expect("scale")
    }

    fn two_panes() -> PaneLayout {
        let fixed = DomainPolicy::Fixed {
            min: 0.0,
            max: 100.0,
        };
        let specs = [
            PaneSpec::new(PaneId::new(0), 60.0, fixed.clone()),
            PaneSpec::new(PaneId::new(1), 40.0, fixed).with_origin(PaneOrigin::FromBottom(40.0)),
        ];
        PaneLayout::compute(&specs, 0.0, 100.0, &[], None).expect("layout")
    }

    #[test]
    fn move_broadcasts_vertical_line_to_every_pane() {
        let mut controller =
            InteractionController::new(NullScrollBlocker::default(), WheelBehavior::default());
        let layout = two_panes();
        let hover = controller.on_pointer_move(31.0, 70.0, &scale(10), &layout).clone();

        assert_eq!(hover.index, Some(3));
        assert!((hover.crosshair_x.expect("crosshair x") - 35.0).abs() <= 1e-9);
        assert_eq!(hover.active_pane, Some(PaneId::new(1)));
        let top = hover.flags(PaneId::new(0)).expect("top flags");
        let bottom = hover.flags(PaneId::new(1)).expect("bottom flags");
        assert!(top.vertical_line && !top.horizontal_line && !top.tooltip);
        assert!(bottom.vertical_line && bottom.horizontal_line && bottom.tooltip);
        assert!(controller.is_scroll_locked());
    }

    #[test]
    fn leave_clears_hover_and_unlocks() {
        let mut controller =
            InteractionController::new(NullScrollBlocker::default(), WheelBehavior::default());
        controller.on_pointer_enter();
        controller.on_pointer_move(10.0, 10.0, &scale(10), &two_panes());
        controller.on_pointer_leave();
        assert!(controller.hover().is_none());
        assert!(!controller.is_scroll_locked());
        assert_eq!(controller.blocker().block_calls, 1);
        assert_eq!(controller.blocker().unblock_calls, 1);
    }

    #[test]
    fn wheel_only_acts_while_hovered() {
        let mut controller =
            InteractionController::new(NullScrollBlocker::default(), WheelBehavior::default());
        let mut time_scale = scale(100);
        assert_eq!(controller.on_wheel(0.0, -1.0, &mut time_scale).expect("wheel"), None);
        assert_eq!(time_scale.extent(), Some(Extent { start: 0, end: 99 }));

        controller.on_pointer_enter();
        let zoomed = controller
            .on_wheel(0.0, -1.0, &mut time_scale)
            .expect("wheel")
            .expect("extent");
        assert_eq!(zoomed.len(), 83);
        assert_eq!(zoomed.end, 99);

        let panned = controller
            .on_wheel(-2.0, 0.0, &mut time_scale)
            .expect("wheel")
            .expect("extent");
        assert_eq!(panned.end, 97);
        assert!(controller.on_wheel(f64::NAN, 0.0, &mut time_scale).is_err());
    }

    #[test]
    fn empty_dataset_hover_has_no_index() {
        let mut controller =
            InteractionController::new(NullScrollBlocker::default(), WheelBehavior::default());
        let hover = controller.on_pointer_move(10.0, 10.0, &scale(0), &two_panes());
        assert!(hover.index.is_none());
        assert!(hover.crosshair_x.is_none());
        assert!(hover.panes.iter().all(|flags| !flags.vertical_line && !flags.tooltip));
    }
}

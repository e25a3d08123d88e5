use tracing::{debug, warn};

use crate::core::{
    Bar, PaneLayout, TimeRangeFilter, TimeScale, bars_from_json_str, ensure_ascending,
};
use crate::error::ChartResult;
use crate::indicators::{self, EnrichedBar};
use crate::interaction::ScrollBlocker;
use crate::render::Renderer;

use super::ChartEngine;

impl<R: Renderer, B: ScrollBlocker> ChartEngine<R, B> {
    /// Replaces the dataset and recomputes everything derived from it.
    ///
    /// On error the previous dataset stays in place and page scrolling is
    /// restored.
    pub fn set_bars(&mut self, bars: Vec<Bar>) -> ChartResult<()> {
        let result = self.rebuild(bars, self.filter);
        self.release_on_error(result)
    }

    /// Parses a JSON array of bar records and loads it.
    pub fn load_json_bars(&mut self, input: &str) -> ChartResult<()> {
        let parsed = bars_from_json_str(input);
        let bars = self.release_on_error(parsed)?;
        self.set_bars(bars)
    }

    /// Switches the time range filter and re-runs the pipeline.
    pub fn set_time_range_filter(&mut self, filter: TimeRangeFilter) -> ChartResult<()> {
        let result = self.rebuild(self.source_bars.clone(), filter);
        self.release_on_error(result)
    }

    fn rebuild(&mut self, source: Vec<Bar>, filter: TimeRangeFilter) -> ChartResult<()> {
        ensure_ascending(&source)?;
        let filtered = filter.apply(&source);
        let enriched = indicators::apply(&filtered, &self.config.indicators)?;
        let time_scale = TimeScale::build(
            enriched.iter().map(EnrichedBar::date).collect(),
            (self.plot.left, self.plot.right()),
            self.config.default_extent_bars,
        )?;
        let layout = PaneLayout::compute(
            &self.config.panes,
            self.plot.top,
            self.plot.height,
            &enriched,
            time_scale.extent(),
        )?;

        debug!(
            source = source.len(),
            visible = enriched.len(),
            filter = ?filter,
            extent = ?time_scale.extent(),
            "dataset replaced"
        );
        self.source_bars = source;
        self.filter = filter;
        self.bars = enriched;
        self.time_scale = time_scale;
        self.layout = layout;
        self.interaction.refresh(&self.time_scale, &self.layout);
        Ok(())
    }

    pub(super) fn release_on_error<T>(&mut self, result: ChartResult<T>) -> ChartResult<T> {
        if let Err(err) = &result {
            if self.interaction.release_scroll_lock() {
                warn!(error = %err, "page scroll restored after error");
            }
        }
        result
    }
}

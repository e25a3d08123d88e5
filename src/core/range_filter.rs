use chrono::{Datelike, IsoWeek, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::Bar;

/// Preset windows relative to the most recent bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRangeFilter {
    #[default]
    All,
    LastMonth,
    LastYear,
    /// One year of daily bars aggregated into ISO weeks.
    LastYearWeekly,
    /// Last five trading bars.
    Last5Days,
}

impl TimeRangeFilter {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::LastMonth => "Last Month",
            Self::LastYear => "1 Year daily",
            Self::LastYearWeekly => "1 Year weekly",
            Self::Last5Days => "Last 5 days",
        }
    }

    /// Returns the bars selected by this filter. Input must be ascending.
    #[must_use]
    pub fn apply(self, bars: &[Bar]) -> Vec<Bar> {
        let Some(latest) = bars.last().map(|bar| bar.date) else {
            return Vec::new();
        };
        let filtered = match self {
            Self::All => bars.to_vec(),
            Self::LastMonth => since(bars, latest, Months::new(1)).to_vec(),
            Self::LastYear => since(bars, latest, Months::new(12)).to_vec(),
            Self::LastYearWeekly => aggregate_weekly(since(bars, latest, Months::new(12))),
            Self::Last5Days => bars[bars.len().saturating_sub(5)..].to_vec(),
        };
        debug!(
            filter = ?self,
            input = bars.len(),
            output = filtered.len(),
            "time range filter applied"
        );
        filtered
    }
}

/// Bars strictly after `latest - months`.
fn since(bars: &[Bar], latest: NaiveDate, months: Months) -> &[Bar] {
    let Some(cutoff) = latest.checked_sub_months(months) else {
        return bars;
    };
    let start = bars.partition_point(|bar| bar.date <= cutoff);
    &bars[start..]
}

/// Collapses consecutive bars of the same ISO week into one bar dated at the
/// week's first trading day.
///
/// A field missing on any bar of the week is missing on the aggregate.
#[must_use]
pub fn aggregate_weekly(bars: &[Bar]) -> Vec<Bar> {
    let mut weeks: Vec<Bar> = Vec::new();
    let mut current_week: Option<IsoWeek> = None;

    for bar in bars {
        let week = bar.date.iso_week();
        match weeks.last_mut() {
            Some(aggregate) if current_week == Some(week) => {
                aggregate.open = aggregate.open.filter(|_| bar.open.is_some());
                aggregate.high = aggregate.high.zip(bar.high).map(|(a, b)| a.max(b));
                aggregate.low = aggregate.low.zip(bar.low).map(|(a, b)| a.min(b));
                aggregate.close = aggregate.close.and(bar.close);
                aggregate.volume = aggregate
                    .volume
                    .zip(bar.volume)
                    .map(|(a, b)| a.saturating_add(b));
            }
            _ => {
                current_week = Some(week);
                weeks.push(*bar);
            }
        }
    }
    weeks
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};

    use super::{TimeRangeFilter, aggregate_weekly};
    use crate::core::Bar;

    fn daily(start: NaiveDate, count: u64) -> Vec<Bar> {
        (0..count)
            .map(|i| {
                let price = 10.0 + i as f64;
                Bar::new(start + Days::new(i), price, price + 2.0, price - 1.0, price + 1.0, 100)
                    .expect("bar")
            })
            .collect()
    }

    #[test]
    fn calendar_windows_are_relative_to_latest_bar() {
        let bars = daily(NaiveDate::from_ymd_opt(2020, 1, 1).expect("date"), 500);
        let latest = bars.last().expect("bars").date;

        let month = TimeRangeFilter::LastMonth.apply(&bars);
        assert_eq!(month.last().map(|bar| bar.date), Some(latest));
        let cutoff = NaiveDate::from_ymd_opt(2021, 4, 14).expect("d");
        assert!(month.iter().all(|bar| bar.date > cutoff));
        assert_eq!(month.len(), 30);

        let year = TimeRangeFilter::LastYear.apply(&bars);
        assert_eq!(year.len(), 365);

        assert_eq!(TimeRangeFilter::Last5Days.apply(&bars).len(), 5);
        assert_eq!(TimeRangeFilter::All.apply(&bars).len(), 500);
        assert!(TimeRangeFilter::LastMonth.apply(&[]).is_empty());
    }

    #[test]
    fn weekly_aggregation_follows_iso_weeks() {
        // Thursday 2021-01-07 .. Wednesday 2021-01-13: ISO weeks 1 and 2.
        let mut bars = daily(NaiveDate::from_ymd_opt(2021, 1, 7).expect("date"), 7);
        let weeks = aggregate_weekly(&bars);
        assert_eq!(weeks.len(), 2);

        let first = weeks[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2021, 1, 7).expect("d"));
        assert_eq!(first.open, Some(10.0));
        assert_eq!(first.high, Some(15.0));
        assert_eq!(first.low, Some(9.0));
        assert_eq!(first.close, Some(14.0));
        assert_eq!(first.volume, Some(400));

        bars[5].high = None;
        let weeks = aggregate_weekly(&bars);
        assert_eq!(weeks[1].high, None);
        assert_eq!(weeks[1].low, Some(13.0));
    }
}

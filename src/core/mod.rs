pub mod bar;
pub mod layout;
pub mod pane;
pub mod primitives;
pub mod range_filter;
pub mod scale;
pub mod time_scale;
pub mod types;

pub use bar::{Bar, PriceField, RawBar, bars_from_json_str, ensure_ascending};
pub use layout::{PaneGeometry, PaneLayout, ValueDomain};
pub use pane::{
    DomainPolicy, DomainSource, PaneId, PaneOrigin, PanePadding, PaneSpec, SeriesSpec,
    ValueAxisTicks, validate_panes,
};
pub use primitives::{RawNumber, parse_bar_date};
pub use range_filter::{TimeRangeFilter, aggregate_weekly};
pub use scale::LinearScale;
pub use time_scale::{DEFAULT_EXTENT_BARS, Extent, TimeScale};
pub use types::{ChartMargins, PlotArea, Viewport};

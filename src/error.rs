use chrono::NaiveDate;
use thiserror::Error;

use crate::core::PaneId;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid bar date `{0}`: expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("bars must be strictly ascending by date: index {index} ({current}) follows {previous}")]
    UnsortedInput {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("indicator {id} has invalid window size {window}")]
    InvalidWindow { id: u32, window: usize },

    #[error("duplicate indicator {0}")]
    DuplicateIndicator(String),

    #[error("indicator {id} reads `{source_name}` which is not produced by an earlier indicator")]
    UnknownIndicatorSource { id: u32, source_name: String },

    #[error("duplicate pane id {}", .0.raw())]
    DuplicatePane(PaneId),

    #[error("pane {} overlaps the pane above it", .pane.raw())]
    PaneOverlap { pane: PaneId },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

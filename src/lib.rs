//! stockchart: multi-pane OHLCV chart engine.
//!
//! Bars flow through an indicator pipeline (SMA, EMA, RSI, ATR), are indexed
//! by a discontinuous time scale and laid out over vertically stacked panes
//! that share one horizontal axis and one crosshair. Rendering is expressed
//! as backend-agnostic draw commands handed to a [`render::Renderer`].

pub mod api;
pub mod core;
pub mod error;
pub mod indicators;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartConfig, ChartEngine};
pub use error::{ChartError, ChartResult};

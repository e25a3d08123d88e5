use crate::core::Bar;

use super::{IndicatorValue, StreamingIndicator};

/// High/low/close triple consumed by [`Atr`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSample {
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl RangeSample {
    /// `None` when any of the three fields is missing.
    #[must_use]
    pub fn from_bar(bar: &Bar) -> Option<Self> {
        Some(Self {
            high: bar.high?,
            low: bar.low?,
            close: bar.close?,
        })
    }

    /// True range against the previous close; `high - low` without one.
    #[must_use]
    pub fn true_range(self, previous_close: Option<f64>) -> f64 {
        let span = self.high - self.low;
        let range = match previous_close {
            Some(close) => span
                .max((self.high - close).abs())
                .max((self.low - close).abs()),
            None => span,
        };
        range.max(0.0)
    }
}

/// Average true range with Wilder smoothing, seeded by the mean of the first
/// `window` true ranges (index `window - 1`).
#[derive(Debug, Clone)]
pub struct Atr {
    window: usize,
    previous_close: Option<f64>,
    warmup_sum: f64,
    warmup_count: usize,
    current: Option<f64>,
}

impl Atr {
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            previous_close: None,
            warmup_sum: 0.0,
            warmup_count: 0,
            current: None,
        }
    }
}

impl StreamingIndicator for Atr {
    type Input = RangeSample;

    fn update(&mut self, sample: Option<RangeSample>) -> IndicatorValue {
        let Some(sample) = sample else {
            self.reset();
            return IndicatorValue::Unavailable;
        };

        let true_range = sample.true_range(self.previous_close);
        self.previous_close = Some(sample.close);
        let window = self.window as f64;

        if let Some(atr) = self.current {
            let next = ((atr * (window - 1.0) + true_range) / window).max(0.0);
            self.current = Some(next);
            return IndicatorValue::Available(next);
        }

        self.warmup_sum += true_range;
        self.warmup_count += 1;
        if self.warmup_count < self.window {
            return IndicatorValue::Unavailable;
        }
        let seed = self.warmup_sum / window;
        self.current = Some(seed);
        IndicatorValue::Available(seed)
    }

    fn reset(&mut self) {
        self.previous_close = None;
        self.warmup_sum = 0.0;
        self.warmup_count = 0;
        self.current = None;
    }
}

use std::collections::VecDeque;

use super::{IndicatorValue, StreamingIndicator};

/// Simple moving average over the last `window` samples.
///
/// First value appears once `window` consecutive samples have been seen,
/// i.e. at index `window - 1` of a gap-free series. The mean is updated
/// incrementally, so a constant input yields that constant exactly.
#[derive(Debug, Clone)]
pub struct Sma {
    window: usize,
    buffer: VecDeque<f64>,
    mean: f64,
}

impl Sma {
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            buffer: VecDeque::with_capacity(window.max(1)),
            mean: 0.0,
        }
    }
}

impl StreamingIndicator for Sma {
    type Input = f64;

    fn update(&mut self, sample: Option<f64>) -> IndicatorValue {
        let Some(value) = sample else {
            self.reset();
            return IndicatorValue::Unavailable;
        };

        if self.buffer.len() == self.window {
            if let Some(expired) = self.buffer.pop_front() {
                self.mean += (value - expired) / self.window as f64;
            }
            self.buffer.push_back(value);
        } else {
            self.buffer.push_back(value);
            self.mean += (value - self.mean) / self.buffer.len() as f64;
        }

        if self.buffer.len() == self.window {
            IndicatorValue::Available(self.mean)
        } else {
            IndicatorValue::Unavailable
        }
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.mean = 0.0;
    }
}

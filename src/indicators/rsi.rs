use super::{IndicatorValue, StreamingIndicator};

/// Wilder's relative strength index.
///
/// The first value appears once `window` bar-to-bar changes are known, i.e. at
/// index `window` of a gap-free series.
#[derive(Debug, Clone)]
pub struct Rsi {
    window: usize,
    previous: Option<f64>,
    warmup_gain: f64,
    warmup_loss: f64,
    warmup_count: usize,
    averages: Option<(f64, f64)>,
}

impl Rsi {
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            previous: None,
            warmup_gain: 0.0,
            warmup_loss: 0.0,
            warmup_count: 0,
            averages: None,
        }
    }
}

impl StreamingIndicator for Rsi {
    type Input = f64;

    fn update(&mut self, sample: Option<f64>) -> IndicatorValue {
        let Some(value) = sample else {
            self.reset();
            return IndicatorValue::Unavailable;
        };
        let Some(previous) = self.previous.replace(value) else {
            return IndicatorValue::Unavailable;
        };

        let change = value - previous;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        let window = self.window as f64;

        if let Some((avg_gain, avg_loss)) = self.averages {
            let avg_gain = (avg_gain * (window - 1.0) + gain) / window;
            let avg_loss = (avg_loss * (window - 1.0) + loss) / window;
            self.averages = Some((avg_gain, avg_loss));
            return IndicatorValue::Available(relative_strength_index(avg_gain, avg_loss));
        }

        self.warmup_gain += gain;
        self.warmup_loss += loss;
        self.warmup_count += 1;
        if self.warmup_count < self.window {
            return IndicatorValue::Unavailable;
        }

        let avg_gain = self.warmup_gain / window;
        let avg_loss = self.warmup_loss / window;
        self.averages = Some((avg_gain, avg_loss));
        IndicatorValue::Available(relative_strength_index(avg_gain, avg_loss))
    }

    fn reset(&mut self) {
        self.previous = None;
        self.warmup_gain = 0.0;
        self.warmup_loss = 0.0;
        self.warmup_count = 0;
        self.averages = None;
    }
}

/// `100 - 100 / (1 + gain / loss)`, clamped to `[0, 100]`.
///
/// Zero average loss yields 100 when there were gains and a neutral 50 when
/// the series did not move at all.
#[must_use]
pub fn relative_strength_index(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss <= 0.0 {
        return if avg_gain > 0.0 { 100.0 } else { 50.0 };
    }
    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

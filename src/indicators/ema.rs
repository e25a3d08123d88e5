use super::{IndicatorValue, Sma, StreamingIndicator};

/// Exponential moving average with `α = 2 / (window + 1)`, seeded by the SMA
/// of the first `window` samples.
#[derive(Debug, Clone)]
pub struct Ema {
    alpha: f64,
    seed: Sma,
    current: Option<f64>,
}

impl Ema {
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            alpha: 2.0 / (window as f64 + 1.0),
            seed: Sma::new(window),
            current: None,
        }
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl StreamingIndicator for Ema {
    type Input = f64;

    fn update(&mut self, sample: Option<f64>) -> IndicatorValue {
        let Some(value) = sample else {
            self.reset();
            return IndicatorValue::Unavailable;
        };

        if let Some(previous) = self.current {
            // Same as α·x + (1-α)·prev, but a flat input stays bit-exact.
            let next = previous + self.alpha * (value - previous);
            self.current = Some(next);
            return IndicatorValue::Available(next);
        }

        let seeded = self.seed.update(Some(value));
        self.current = seeded.value();
        seeded
    }

    fn reset(&mut self) {
        self.seed.reset();
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::Ema;
    use crate::indicators::{IndicatorValue, run};

    #[test]
    fn seeds_with_sma_then_smooths() {
        let out = run(Ema::new(3), [2.0, 4.0, 6.0, 8.0, 10.0].map(Some));
        assert_eq!(out[1], IndicatorValue::Unavailable);
        assert_eq!(out[2], IndicatorValue::Available(4.0));
        // alpha = 0.5
        assert_relative_eq!(out[3].value().expect("ema"), 6.0);
        assert_relative_eq!(out[4].value().expect("ema"), 8.0);
    }

    #[test]
    fn matches_textbook_recurrence() {
        let inputs = [
            22.27, 22.19, 22.08, 22.17, 22.18, 22.13, 22.23, 22.43, 22.24, 22.29, 22.15, 22.39,
        ];
        let out = run(Ema::new(10), inputs.map(Some));
        let seed: f64 = inputs[..10].iter().sum::<f64>() / 10.0;
        let alpha = 2.0 / 11.0;
        let expected_10 = alpha * inputs[10] + (1.0 - alpha) * seed;
        let expected_11 = alpha * inputs[11] + (1.0 - alpha) * expected_10;
        assert_relative_eq!(out[9].value().expect("seed"), seed, epsilon = 1e-12);
        assert_relative_eq!(out[10].value().expect("ema"), expected_10, epsilon = 1e-12);
        assert_relative_eq!(out[11].value().expect("ema"), expected_11, epsilon = 1e-12);
    }

    #[test]
    fn gap_requires_a_new_seed_window() {
        let out = run(
            Ema::new(2),
            [Some(1.0), Some(3.0), Some(5.0), None, Some(1.0), Some(1.0)],
        );
        assert_relative_eq!(out[2].value().expect("ema"), 4.0, epsilon = 1e-12);
        assert_eq!(out[3], IndicatorValue::Unavailable);
        assert_eq!(out[4], IndicatorValue::Unavailable);
        assert_eq!(out[5], IndicatorValue::Available(1.0));
    }

    #[test]
    fn fractional_constant_survives_seed_and_smoothing() {
        for constant in [0.1, 100.1, 182.63] {
            let out = run(Ema::new(12), std::iter::repeat_n(Some(constant), 60));
            assert!(out[..11].iter().all(|value| !value.is_available()));
            assert!(out[11..].iter().all(|value| *value == IndicatorValue::Available(constant)));
        }
    }
}

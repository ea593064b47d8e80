//! Trailing Moving Average for Chart Smoothing

/// Number of samples averaged for each output point
pub const SMOOTHING_WINDOW: usize = 15;

/// Sliding window simple moving average.
///
/// The window counts samples, not time, so the smoothed duration depends on
/// the sampling rate.
pub struct MovingAverage {
    window: Vec<f64>,
    size: usize,
    position: usize,
    len: usize,
}

impl MovingAverage {
    /// Create a new moving average with given window size
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "Window size must be > 0");
        Self {
            window: vec![0.0; size],
            size,
            position: 0,
            len: 0,
        }
    }

    /// Add a value and get the mean of the last `size` values, rounded to
    /// two decimals
    pub fn filter(&mut self, value: f64) -> f64 {
        self.window[self.position] = value;
        self.position = (self.position + 1) % self.size;
        self.len = (self.len + 1).min(self.size);

        // summed oldest to newest over the occupied slots
        let (older, newer): (&[f64], &[f64]) = if self.len == self.size {
            (&self.window[self.position..], &self.window[..self.position])
        } else {
            (&self.window[..self.len], &[])
        };
        let sum: f64 = older.iter().chain(newer).sum();

        round2(sum / self.len as f64)
    }

    /// Reset the filter
    pub fn reset(&mut self) {
        self.window.fill(0.0);
        self.position = 0;
        self.len = 0;
    }
}

impl Default for MovingAverage {
    fn default() -> Self {
        Self::new(SMOOTHING_WINDOW)
    }
}

/// Smooth a chronologically ordered series with a fresh 15-sample window.
///
/// Output `i` averages inputs `max(0, i - 14)..=i`.
pub fn smooth(series: &[f64]) -> Vec<f64> {
    let mut average = MovingAverage::default();
    series.iter().map(|&value| average.filter(value)).collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_constant_series_stays_constant() {
        let smoothed = smooth(&[10.0; 40]);
        assert_eq!(smoothed.len(), 40);
        assert!(smoothed.iter().all(|&v| v == 10.0));
    }

    #[test]
    fn test_warmup_uses_available_samples() {
        let smoothed = smooth(&[1.0, 2.0, 3.0]);
        assert_eq!(smoothed, vec![1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_window_drops_oldest_sample() {
        let mut series = vec![0.0; SMOOTHING_WINDOW];
        series.push(15.0);
        let smoothed = smooth(&series);
        // last window is fourteen zeros and one 15
        assert_eq!(smoothed[SMOOTHING_WINDOW], 1.0);
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        let smoothed = smooth(&[1.0, 1.0, 2.0]);
        assert_eq!(smoothed[2], 1.33);
    }

    #[test]
    fn test_reset() {
        let mut average = MovingAverage::new(3);
        average.filter(100.0);
        average.reset();
        assert_eq!(average.filter(4.0), 4.0);
    }

    #[test]
    fn test_outlier_leaves_no_residue() {
        let mut series = vec![1e17];
        series.extend(std::iter::repeat(21.37).take(40));
        let smoothed = smooth(&series);
        assert!(smoothed[SMOOTHING_WINDOW..].iter().all(|&v| v == 21.37));
    }

    fn reading() -> impl Strategy<Value = f64> {
        prop_oneof![-50.0f64..50.0, -1e17f64..1e17]
    }

    proptest! {
        #[test]
        fn prop_matches_direct_window_mean(values in proptest::collection::vec(reading(), 1..60)) {
            let smoothed = smooth(&values);
            for (i, &out) in smoothed.iter().enumerate() {
                let start = i.saturating_sub(SMOOTHING_WINDOW - 1);
                let window = &values[start..=i];
                let mean = window.iter().sum::<f64>() / window.len() as f64;
                prop_assert_eq!(out, round2(mean));
            }
        }
    }
}

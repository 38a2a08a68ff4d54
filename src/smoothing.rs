use std::collections::VecDeque;

/// Causal trailing moving average with a running sum.
///
/// The window grows from the left edge: the first output averages one sample,
/// the second two, and so on until `window_size` is reached. Each update is O(1).
pub struct MovingAverage {
    window: VecDeque<f64>,
    window_size: usize,
    sum: f64,
}

impl MovingAverage {
    /// Create a new averager. A window of 0 behaves like 1 (pass-through).
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        MovingAverage {
            window: VecDeque::with_capacity(window_size + 1),
            window_size,
            sum: 0.0,
        }
    }

    /// Push a value and return the mean of the current window.
    pub fn apply(&mut self, value: f64) -> f64 {
        self.window.push_back(value);
        self.sum += value;

        if self.window.len() > self.window_size {
            if let Some(old) = self.window.pop_front() {
                self.sum -= old;
            }
        }

        self.sum / self.window.len() as f64
    }

    /// Current number of samples in the window (actual, not max)
    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

/// Batch moving average. Returns the input unchanged when `window <= 1` or the
/// input is empty; otherwise the output has the same length as the input.
pub fn moving_average(signal: &[f64], window: usize) -> Vec<f64> {
    if signal.is_empty() || window <= 1 {
        return signal.to_vec();
    }
    let mut avg = MovingAverage::new(window);
    signal.iter().map(|&v| avg.apply(v)).collect()
}

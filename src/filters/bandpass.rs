//! Moving-average band-pass used ahead of step detection.
//!
//! The high-pass stage estimates the slow trend (gravity plus bias) with a
//! ~1 s moving average and subtracts it. The low-pass stage smooths the
//! residual with a ~0.25 s moving average.

use crate::config::known_rate;
use crate::smoothing::moving_average;

/// High-pass window when the sampling rate is unknown.
pub const HIGHPASS_FALLBACK_WINDOW: usize = 25;
/// Low-pass window when the sampling rate is unknown.
pub const LOWPASS_FALLBACK_WINDOW: usize = 5;

const HIGHPASS_WINDOW_SECS: f64 = 1.0;
const LOWPASS_WINDOW_SECS: f64 = 0.25;

/// Window length in samples for a duration, truncated toward zero.
fn window_samples(fs: f64, secs: f64) -> usize {
    (fs * secs) as usize
}

pub fn highpass_window(sampling_rate_hz: Option<u32>) -> usize {
    known_rate(sampling_rate_hz)
        .map(|fs| window_samples(fs, HIGHPASS_WINDOW_SECS))
        .unwrap_or(HIGHPASS_FALLBACK_WINDOW)
}

pub fn lowpass_window(sampling_rate_hz: Option<u32>) -> usize {
    known_rate(sampling_rate_hz)
        .map(|fs| window_samples(fs, LOWPASS_WINDOW_SECS))
        .unwrap_or(LOWPASS_FALLBACK_WINDOW)
        .max(1)
}

/// Gravity removal: `x[i] - trend[i]`.
pub fn highpass(signal: &[f64], sampling_rate_hz: Option<u32>) -> Vec<f64> {
    let trend = moving_average(signal, highpass_window(sampling_rate_hz));
    signal
        .iter()
        .zip(&trend)
        .map(|(raw, gravity)| raw - gravity)
        .collect()
}

/// Noise smoothing.
pub fn lowpass(signal: &[f64], sampling_rate_hz: Option<u32>) -> Vec<f64> {
    moving_average(signal, lowpass_window(sampling_rate_hz))
}

/// `lowpass(highpass(magnitude))`.
pub fn preprocess(magnitude: &[f64], sampling_rate_hz: Option<u32>) -> Vec<f64> {
    lowpass(&highpass(magnitude, sampling_rate_hz), sampling_rate_hz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_windows_from_rate() {
        assert_eq!(highpass_window(Some(50)), 50);
        assert_eq!(lowpass_window(Some(50)), 12);
        assert_eq!(lowpass_window(Some(100)), 25);
        assert_eq!(lowpass_window(Some(3)), 1);
    }

    #[test]
    fn test_windows_fallback_when_rate_unknown() {
        assert_eq!(highpass_window(None), HIGHPASS_FALLBACK_WINDOW);
        assert_eq!(highpass_window(Some(0)), HIGHPASS_FALLBACK_WINDOW);
        assert_eq!(lowpass_window(None), LOWPASS_FALLBACK_WINDOW);
    }

    #[test]
    fn test_highpass_removes_constant_gravity() {
        let signal = vec![9.81; 200];
        for v in highpass(&signal, Some(50)) {
            assert_abs_diff_eq!(v, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_preprocess_preserves_length() {
        let signal: Vec<f64> = (0..333)
            .map(|i| 9.81 + (i as f64 * 0.25).sin())
            .collect();
        assert_eq!(preprocess(&signal, Some(50)).len(), signal.len());
        assert_eq!(preprocess(&signal, None).len(), signal.len());
        assert!(preprocess(&[], Some(50)).is_empty());
    }

    #[test]
    fn test_preprocess_keeps_gait_oscillation() {
        // 2 Hz oscillation on top of gravity at 50 Hz.
        let signal: Vec<f64> = (0..500)
            .map(|i| 9.81 + 2.0 * (2.0 * std::f64::consts::PI * 2.0 * i as f64 / 50.0).sin())
            .collect();
        let filtered = preprocess(&signal, Some(50));
        let tail = &filtered[100..];
        let max = tail.iter().cloned().fold(f64::MIN, f64::max);
        let min = tail.iter().cloned().fold(f64::MAX, f64::min);
        assert!(max > 0.3 && min < -0.3, "max={} min={}", max, min);
        let mean = tail.iter().sum::<f64>() / tail.len() as f64;
        assert_abs_diff_eq!(mean, 0.0, epsilon = 0.2);
    }
}

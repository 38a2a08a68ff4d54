//! Adaptive-threshold peak detection for step counting.
//!
//! A peak is an interior index with a strict rise into it and a non-strict fall
//! out of it (`s[i-1] < s[i] >= s[i+1]`), above the threshold. Two scans enforce
//! the refractory gap differently:
//! - [`detect_peaks`]: greedy, first qualifying peak wins.
//! - [`detect_peaks_with_merge`]: collect everything, then keep the strongest
//!   peak of each too-close pair.

use crate::config::{known_rate, PeakStrategy};

/// Refractory gap in samples when the sampling rate is unknown.
pub const FALLBACK_MIN_GAP_SAMPLES: usize = 15;

/// `mean + k * stddev` over the whole signal. Uses Bessel's correction with the
/// denominator floored at 1. Empty signal gives 0.0.
pub fn dynamic_threshold(signal: &[f64], k: f64) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    let n = signal.len() as f64;
    let mean = signal.iter().sum::<f64>() / n;
    let variance = signal.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1.0).max(1.0);
    mean + k * variance.sqrt()
}

/// Converts a refractory gap in milliseconds to samples: `max(1, fs * ms / 1000)`
/// truncated toward zero.
pub fn min_gap_samples(min_gap_ms: u32, sampling_rate_hz: Option<u32>) -> usize {
    match known_rate(sampling_rate_hz) {
        Some(fs) => ((fs * (f64::from(min_gap_ms) / 1000.0)) as usize).max(1),
        None => FALLBACK_MIN_GAP_SAMPLES,
    }
}

#[inline]
fn is_candidate(signal: &[f64], i: usize, threshold: f64) -> bool {
    let curr = signal[i];
    signal[i - 1] < curr && curr >= signal[i + 1] && curr > threshold
}

fn candidates(signal: &[f64], threshold: f64) -> impl Iterator<Item = usize> + '_ {
    let interior_end = signal.len().saturating_sub(1);
    (1..interior_end).filter(move |&i| is_candidate(signal, i, threshold))
}

/// Greedy scan: a candidate is kept when it is at least `min_gap` samples after
/// the previously kept peak.
pub fn detect_peaks(signal: &[f64], threshold: f64, min_gap: usize) -> Vec<usize> {
    if signal.len() < 3 {
        return Vec::new();
    }
    let min_gap = min_gap.max(1);
    let mut peaks: Vec<usize> = Vec::new();

    for i in candidates(signal, threshold) {
        // No previous peak acts as negative infinity.
        let far_enough = peaks.last().map_or(true, |&last| i - last >= min_gap);
        if far_enough {
            peaks.push(i);
        }
    }
    peaks
}

/// Merge scan: candidates closer than `min_gap` to the last kept peak replace it
/// only when strictly stronger.
pub fn detect_peaks_with_merge(signal: &[f64], threshold: f64, min_gap: usize) -> Vec<usize> {
    if signal.len() < 3 {
        return Vec::new();
    }
    let min_gap = min_gap.max(1);
    let mut merged: Vec<usize> = Vec::new();

    for i in candidates(signal, threshold) {
        match merged.last_mut() {
            Some(last) if i - *last < min_gap => {
                if signal[i] > signal[*last] {
                    *last = i;
                }
            }
            _ => merged.push(i),
        }
    }
    merged
}

/// Runs the scan selected by `strategy`.
pub fn detect(signal: &[f64], threshold: f64, min_gap: usize, strategy: PeakStrategy) -> Vec<usize> {
    match strategy {
        PeakStrategy::Greedy => detect_peaks(signal, threshold, min_gap),
        PeakStrategy::Merge => detect_peaks_with_merge(signal, threshold, min_gap),
    }
}

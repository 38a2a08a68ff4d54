//! Offline step counting.
//!
//! Stages: load → magnitude → band-pass → threshold (auto | fixed) → detect →
//! summarize. Unknown sampling rates fall back to fixed sample windows and
//! never fail; only the cadence needs a real rate.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{StepConfig, ThresholdMode};
use crate::error::Result;
use crate::filters::bandpass::preprocess;
use crate::loader::{load_axes, AxisMatch};
use crate::magnitude::magnitude;
use crate::peaks::{detect, dynamic_threshold, min_gap_samples};

/// Result of one step-counting run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepSummary {
    /// Band-passed magnitude the peaks were searched in.
    pub filtered_signal: Vec<f64>,
    pub threshold: f64,
    /// Sample indices of the detected steps, increasing.
    pub peaks: Vec<usize>,
    pub step_count: usize,
    pub sampling_rate_hz: Option<u32>,
    pub duration_s: Option<f64>,
    pub cadence_spm: Option<f64>,
}

impl StepSummary {
    fn empty(sampling_rate_hz: Option<u32>) -> Self {
        Self {
            filtered_signal: Vec::new(),
            threshold: 0.0,
            peaks: Vec::new(),
            step_count: 0,
            sampling_rate_hz,
            duration_s: None,
            cadence_spm: None,
        }
    }

    /// Time of each step in seconds, or `None` when the rate is unknown.
    pub fn step_times(&self) -> Option<Vec<f64>> {
        let fs = crate::config::known_rate(self.sampling_rate_hz)?;
        Some(self.peaks.iter().map(|&i| i as f64 / fs).collect())
    }
}

/// Resolves the threshold for a filtered signal.
pub fn resolve_threshold(filtered: &[f64], mode: ThresholdMode) -> f64 {
    match mode {
        ThresholdMode::Auto { k } => dynamic_threshold(filtered, k),
        ThresholdMode::Fixed { value } => value,
    }
}

/// Counts steps in an accelerometer magnitude series.
pub fn count_steps(magnitude: &[f64], config: &StepConfig) -> StepSummary {
    if magnitude.is_empty() {
        log::warn!("empty magnitude series, reporting zero steps");
        return StepSummary::empty(config.sampling_rate_hz);
    }
    let fs = config.known_rate();
    if fs.is_none() {
        log::warn!("sampling rate unknown, using fixed filter windows and a 15-sample gap");
    }

    let filtered = preprocess(magnitude, config.sampling_rate_hz);
    let threshold = resolve_threshold(&filtered, config.threshold);
    let min_gap = min_gap_samples(config.min_gap_ms, config.sampling_rate_hz);
    let peaks = detect(&filtered, threshold, min_gap, config.strategy);
    let step_count = peaks.len();

    let duration_s = fs.map(|fs| filtered.len() as f64 / fs);
    let cadence_spm = duration_s
        .filter(|d| *d > 0.0)
        .map(|d| step_count as f64 / d * 60.0);

    log::debug!(
        "step pipeline: n={} threshold={:.4} min_gap={} strategy={:?} steps={}",
        filtered.len(),
        threshold,
        min_gap,
        config.strategy,
        step_count
    );

    StepSummary {
        filtered_signal: filtered,
        threshold,
        peaks,
        step_count,
        sampling_rate_hz: config.sampling_rate_hz,
        duration_s,
        cadence_spm,
    }
}

/// Loads an accelerometer CSV (name-matched x/y/z columns) and counts steps.
pub fn process_file(path: &Path, config: &StepConfig) -> Result<StepSummary> {
    let axes = load_axes(path, AxisMatch::Substring)?;
    log::info!("loaded {} accelerometer samples from {}", axes.len(), path.display());
    Ok(count_steps_xyz(&axes.x, &axes.y, &axes.z, config))
}

/// Counts steps from three raw accelerometer axes.
pub fn count_steps_xyz(x: &[f64], y: &[f64], z: &[f64], config: &StepConfig) -> StepSummary {
    count_steps(&magnitude(x, y, z), config)
}

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{MotionError, Result};

/// How the step-detection threshold is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ThresholdMode {
    /// `mean + k * stddev` over the whole filtered signal.
    Auto { k: f64 },
    /// A literal threshold.
    Fixed { value: f64 },
}

impl ThresholdMode {
    /// Parses `"auto"` (any case) or a number. `k` is used for the auto mode.
    pub fn parse(text: &str, k: f64) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(ThresholdMode::Auto { k });
        }
        trimmed
            .parse::<f64>()
            .map(|value| ThresholdMode::Fixed { value })
            .map_err(|_| {
                MotionError::config(format!(
                    "threshold must be 'auto' or a number, got '{}'",
                    text
                ))
            })
    }
}

impl Default for ThresholdMode {
    fn default() -> Self {
        ThresholdMode::Auto { k: 0.8 }
    }
}

/// Peak scan variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeakStrategy {
    /// First qualifying peak wins; later peaks inside the refractory gap are dropped.
    #[default]
    Greedy,
    /// The strongest peak inside each refractory cluster wins.
    Merge,
}

impl PeakStrategy {
    pub fn parse(text: &str) -> Result<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "greedy" | "plain" => Ok(PeakStrategy::Greedy),
            "merge" => Ok(PeakStrategy::Merge),
            other => Err(MotionError::config(format!(
                "unknown peak strategy '{}' (expected greedy or merge)",
                other
            ))),
        }
    }
}

/// Unit of the gyroscope channels in a recording.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GyroUnit {
    #[default]
    Radians,
    Degrees,
}

impl GyroUnit {
    /// Anything starting with "deg" (any case) is degrees, everything else radians.
    pub fn parse(text: &str) -> Self {
        if text.trim().to_ascii_lowercase().starts_with("deg") {
            GyroUnit::Degrees
        } else {
            GyroUnit::Radians
        }
    }

    /// Converts an angular rate in this unit to deg/s.
    pub fn to_degrees_per_sec(self, rate: f64) -> f64 {
        match self {
            GyroUnit::Degrees => rate,
            GyroUnit::Radians => rate.to_degrees(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GyroUnit::Radians => "rad",
            GyroUnit::Degrees => "deg",
        }
    }
}

// ─── Step counter ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepConfig {
    /// Sampling rate in Hz. `None` or `Some(0)` means unknown.
    pub sampling_rate_hz: Option<u32>,
    pub threshold: ThresholdMode,
    /// Refractory gap between steps.
    pub min_gap_ms: u32,
    pub strategy: PeakStrategy,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            sampling_rate_hz: None,
            threshold: ThresholdMode::default(),
            min_gap_ms: 350,
            strategy: PeakStrategy::Greedy,
        }
    }
}

impl StepConfig {
    /// Sampling rate as f64, only when known and positive.
    pub fn known_rate(&self) -> Option<f64> {
        known_rate(self.sampling_rate_hz)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// `Some(fs)` only for a known, positive rate.
pub fn known_rate(sampling_rate_hz: Option<u32>) -> Option<f64> {
    sampling_rate_hz.filter(|fs| *fs > 0).map(f64::from)
}

// ─── Pose estimator ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    /// Mandatory for orientation. Never defaulted: `None` or zero is rejected
    /// at estimation time.
    pub sampling_rate_hz: Option<u32>,
    pub gyro_unit: GyroUnit,
    /// Weight on the gyro-integrated angle. Clamped to [0, 1] when used.
    pub alpha: f64,
    pub include_yaw: bool,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            sampling_rate_hz: None,
            gyro_unit: GyroUnit::Radians,
            alpha: 0.98,
            include_yaw: false,
        }
    }
}

impl PoseConfig {
    pub fn new(sampling_rate_hz: u32) -> Self {
        Self {
            sampling_rate_hz: Some(sampling_rate_hz),
            ..Self::default()
        }
    }

    /// The sampling rate, or an input error when it is missing or zero.
    pub fn required_rate(&self) -> Result<u32> {
        match self.sampling_rate_hz {
            Some(fs) if fs > 0 => Ok(fs),
            Some(_) => Err(MotionError::input("fs <= 0: sampling rate must be positive")),
            None => Err(MotionError::input(
                "sampling rate is required for orientation estimation",
            )),
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_auto_is_case_insensitive() {
        assert_eq!(
            ThresholdMode::parse("AuTo", 1.2).unwrap(),
            ThresholdMode::Auto { k: 1.2 }
        );
        assert_eq!(
            ThresholdMode::parse(" auto ", 0.8).unwrap(),
            ThresholdMode::Auto { k: 0.8 }
        );
    }

    #[test]
    fn test_threshold_fixed_number() {
        assert_eq!(
            ThresholdMode::parse("1.5", 0.8).unwrap(),
            ThresholdMode::Fixed { value: 1.5 }
        );
    }

    #[test]
    fn test_threshold_non_numeric_is_config_error() {
        let err = ThresholdMode::parse("high", 0.8).unwrap_err();
        assert!(matches!(err, MotionError::Config(_)));
    }

    #[test]
    fn test_gyro_unit_prefix_match() {
        assert_eq!(GyroUnit::parse("deg"), GyroUnit::Degrees);
        assert_eq!(GyroUnit::parse("Degrees/s"), GyroUnit::Degrees);
        assert_eq!(GyroUnit::parse("rad"), GyroUnit::Radians);
        assert_eq!(GyroUnit::parse("whatever"), GyroUnit::Radians);
        assert_eq!(GyroUnit::Degrees.to_degrees_per_sec(12.0), 12.0);
    }

    #[test]
    fn test_known_rate_treats_zero_as_unknown() {
        assert_eq!(known_rate(Some(0)), None);
        assert_eq!(known_rate(None), None);
        assert_eq!(known_rate(Some(50)), Some(50.0));
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!(PeakStrategy::parse("Merge").unwrap(), PeakStrategy::Merge);
        assert_eq!(PeakStrategy::parse("greedy").unwrap(), PeakStrategy::Greedy);
        assert!(PeakStrategy::parse("best").is_err());
    }

    #[test]
    fn test_step_config_json_partial() {
        let cfg: StepConfig = serde_json::from_str(
            r#"{"sampling_rate_hz": 100, "threshold": {"mode": "fixed", "value": 0.4}}"#,
        )
        .unwrap();
        assert_eq!(cfg.sampling_rate_hz, Some(100));
        assert_eq!(cfg.threshold, ThresholdMode::Fixed { value: 0.4 });
        assert_eq!(cfg.min_gap_ms, 350);
        assert_eq!(cfg.strategy, PeakStrategy::Greedy);
    }

    #[test]
    fn test_step_config_absent_rate_is_unknown() {
        let cfg: StepConfig = serde_json::from_str(r#"{"min_gap_ms": 300}"#).unwrap();
        assert_eq!(cfg.sampling_rate_hz, None);
        assert_eq!(cfg.known_rate(), None);
        assert_eq!(cfg.min_gap_ms, 300);
        assert_eq!(StepConfig::default().sampling_rate_hz, None);
    }

    #[test]
    fn test_pose_config_without_rate_is_rejected() {
        let cfg: PoseConfig = serde_json::from_str(r#"{"alpha": 1.0}"#).unwrap();
        assert_eq!(cfg.sampling_rate_hz, None);
        assert_eq!(cfg.alpha, 1.0);
        let err = cfg.required_rate().unwrap_err();
        assert!(matches!(err, MotionError::Input(_)));
        assert!(PoseConfig::new(0).required_rate().is_err());
        assert_eq!(PoseConfig::new(200).required_rate().unwrap(), 200);
    }
}

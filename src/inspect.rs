//! Feature inspection of labelled activity recordings.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{MotionError, Result};
use crate::loader::{load_axes, AxisMatch};
use crate::types::AxisChannels;

/// Activities inspected when none are given.
pub const DEFAULT_ACTIVITIES: [&str; 4] = ["standing", "sitting", "walking", "running"];

/// Summary statistics of an acceleration magnitude series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MagnitudeStats {
    pub samples: usize,
    pub mean: f64,
    /// Population standard deviation (divides by N).
    pub std: f64,
    pub max: f64,
    pub min: f64,
}

impl MagnitudeStats {
    pub fn from_series(series: &[f64]) -> Result<Self> {
        if series.is_empty() {
            return Err(MotionError::input("cannot summarise an empty series"));
        }
        let n = series.len() as f64;
        let mean = series.iter().sum::<f64>() / n;
        let variance = series.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let max = series.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min = series.iter().cloned().fold(f64::INFINITY, f64::min);
        Ok(Self {
            samples: series.len(),
            mean,
            std: variance.sqrt(),
            max,
            min,
        })
    }
}

/// Axes, magnitude and stats of one activity file.
#[derive(Clone, Debug, Serialize)]
pub struct ActivityReport {
    pub activity: String,
    pub axes: AxisChannels,
    pub magnitude: Vec<f64>,
    pub stats: MagnitudeStats,
}

/// Loads one activity recording, matching z columns that are not "abs".
pub fn inspect_file(activity: &str, path: &Path) -> Result<ActivityReport> {
    let axes = load_axes(path, AxisMatch::ExcludeAbsZ)?;
    let magnitude = axes.magnitude();
    let stats = MagnitudeStats::from_series(&magnitude)?;
    Ok(ActivityReport {
        activity: activity.to_string(),
        axes,
        magnitude,
        stats,
    })
}

/// Inspects `<data_dir>/<activity>.csv` for each activity. Missing files are
/// skipped with a warning; any other failure aborts.
pub fn inspect_dir(data_dir: &Path, activities: &[String]) -> Result<Vec<ActivityReport>> {
    let mut reports = Vec::with_capacity(activities.len());
    for activity in activities {
        let path = data_dir.join(format!("{}.csv", activity));
        if !path.exists() {
            log::warn!("skipping {}: {} not found", activity, path.display());
            continue;
        }
        reports.push(inspect_file(activity, &path)?);
    }
    Ok(reports)
}

//! Merges separate accelerometer and gyroscope exports into one record.
//!
//! Samples are paired by index, not by timestamp: the merged length is the
//! shorter of the two files and time is re-based on the first accelerometer
//! timestamp.

use std::path::Path;

use crate::error::Result;
use crate::loader::load_timed_axes;
use crate::types::{AccelData, GyroData, ImuRecord, TimedAxes};

pub fn merge_axes(accel: &TimedAxes, gyro: &TimedAxes) -> ImuRecord {
    let sample_count = accel.len().min(gyro.len());
    let start_time = if sample_count > 0 {
        accel.timestamps[0]
    } else {
        0.0
    };

    let mut record = ImuRecord::default();
    for i in 0..sample_count {
        record.push(
            accel.timestamps[i] - start_time,
            AccelData {
                x: accel.x[i],
                y: accel.y[i],
                z: accel.z[i],
            },
            GyroData {
                x: gyro.x[i],
                y: gyro.y[i],
                z: gyro.z[i],
            },
        );
    }

    if accel.len() != gyro.len() {
        log::warn!(
            "accel has {} samples, gyro has {}; truncated to {}",
            accel.len(),
            gyro.len(),
            sample_count
        );
    }
    record
}

/// Loads both exports and merges them.
pub fn merge_files(accel_path: &Path, gyro_path: &Path) -> Result<ImuRecord> {
    let accel = load_timed_axes(accel_path)?;
    let gyro = load_timed_axes(gyro_path)?;
    Ok(merge_axes(&accel, &gyro))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn timed(start: f64, n: usize, scale: f64) -> TimedAxes {
        let mut axes = TimedAxes::default();
        for i in 0..n {
            let v = i as f64 * scale;
            axes.push(start + i as f64 * 0.01, v, v + 1.0, v + 2.0);
        }
        axes
    }

    #[test]
    fn test_merge_truncates_and_rebases_time() {
        let accel = timed(1000.5, 5, 1.0);
        let gyro = timed(1000.6, 3, 0.1);
        let record = merge_axes(&accel, &gyro);

        assert_eq!(record.aligned_len(), 3);
        assert_eq!(record.timestamps[0], 0.0);
        assert_relative_eq!(record.timestamps[2], 0.02, epsilon = 1e-9);
        assert_eq!(record.ax, vec![0.0, 1.0, 2.0]);
        assert_eq!(record.gz, vec![2.0, 2.1, 2.2]);
    }

    #[test]
    fn test_merge_empty() {
        let record = merge_axes(&TimedAxes::default(), &timed(0.0, 4, 1.0));
        assert!(record.is_empty());
    }
}

//! Orientation estimation over a merged IMU recording.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{GyroUnit, PoseConfig};
use crate::error::{MotionError, Result};
use crate::filters::complementary::fuse_orientation;
use crate::loader::load_imu;
use crate::types::ImuRecord;

/// Configuration echoed back with an estimate, exactly as supplied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseSettings {
    pub sampling_rate_hz: u32,
    pub gyro_unit: GyroUnit,
    pub alpha: f64,
}

/// Per-sample orientation of one recording.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseEstimate {
    pub time_s: Vec<f64>,
    pub roll_deg: Vec<f64>,
    pub pitch_deg: Vec<f64>,
    pub yaw_deg: Option<Vec<f64>>,
    pub settings: PoseSettings,
}

impl PoseEstimate {
    pub fn len(&self) -> usize {
        self.time_s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_s.is_empty()
    }
}

/// Aligns the record to its shortest channel and runs the complementary filter.
///
/// The sampling rate must be supplied; a missing or zero rate is an input error.
pub fn estimate_pose(mut record: ImuRecord, config: &PoseConfig) -> Result<PoseEstimate> {
    let sampling_rate_hz = config.required_rate()?;
    let sample_count = record.truncate_aligned();
    if sample_count == 0 {
        return Err(MotionError::input(format!(
            "empty data: no aligned samples at {} Hz",
            sampling_rate_hz
        )));
    }

    let trace = fuse_orientation(
        &record,
        sampling_rate_hz,
        config.alpha,
        config.gyro_unit,
        config.include_yaw,
    )?;

    Ok(PoseEstimate {
        time_s: record.timestamps,
        roll_deg: trace.roll_deg,
        pitch_deg: trace.pitch_deg,
        yaw_deg: trace.yaw_deg,
        settings: PoseSettings {
            sampling_rate_hz,
            gyro_unit: config.gyro_unit,
            alpha: config.alpha,
        },
    })
}

/// Loads a merged `time, ax, ay, az, gx, gy, gz` CSV and estimates orientation.
pub fn estimate_pose_file(path: &Path, config: &PoseConfig) -> Result<PoseEstimate> {
    let record = load_imu(path)?;
    log::info!("loaded {} IMU samples from {}", record.aligned_len(), path.display());
    estimate_pose(record, config)
}

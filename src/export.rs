//! Flat tabular outputs and JSON run summaries.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::pose::PoseEstimate;
use crate::step_counter::StepSummary;
use crate::types::ImuRecord;

pub const STEPS_FILE: &str = "steps.csv";
pub const ORIENTATION_FILE: &str = "orientation_output.csv";

fn create_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(fs::File::create(path)?)
}

/// `step_index,time_s` rows. Time is `index / fs` with 3 decimals, or the raw
/// index when the sampling rate is unknown.
pub fn write_steps<W: Write>(writer: W, summary: &StepSummary) -> Result<()> {
    let times = summary
        .step_times()
        .unwrap_or_else(|| summary.peaks.iter().map(|&idx| idx as f64).collect());
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["step_index", "time_s"])?;
    for (&idx, t) in summary.peaks.iter().zip(times) {
        wtr.write_record([idx.to_string(), format!("{:.3}", t)])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_steps_file(path: &Path, summary: &StepSummary) -> Result<()> {
    write_steps(create_file(path)?, summary)
}

/// `time_s,roll_deg,pitch_deg[,yaw_deg]` rows: 6-decimal time, 4-decimal angles.
pub fn write_orientation<W: Write>(writer: W, estimate: &PoseEstimate) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    match estimate.yaw_deg.as_ref() {
        Some(_) => wtr.write_record(["time_s", "roll_deg", "pitch_deg", "yaw_deg"])?,
        None => wtr.write_record(["time_s", "roll_deg", "pitch_deg"])?,
    }
    for i in 0..estimate.len() {
        let mut row = vec![
            format!("{:.6}", estimate.time_s[i]),
            format!("{:.4}", estimate.roll_deg[i]),
            format!("{:.4}", estimate.pitch_deg[i]),
        ];
        if let Some(yaw) = estimate.yaw_deg.as_ref() {
            row.push(format!("{:.4}", yaw[i]));
        }
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_orientation_file(path: &Path, estimate: &PoseEstimate) -> Result<()> {
    write_orientation(create_file(path)?, estimate)
}

/// Merged `timestamp,ax,ay,az,gx,gy,gz` rows with a 6-decimal timestamp.
/// Channel values use the shortest round-trip form and always keep a decimal
/// point, so `0.0` stays `0.0`.
pub fn write_imu<W: Write>(writer: W, record: &ImuRecord) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["timestamp", "ax", "ay", "az", "gx", "gy", "gz"])?;
    for i in 0..record.aligned_len() {
        let accel = record.accel(i);
        let gyro = record.gyro(i);
        wtr.write_record([
            format!("{:.6}", record.timestamps[i]),
            format!("{:?}", accel.x),
            format!("{:?}", accel.y),
            format!("{:?}", accel.z),
            format!("{:?}", gyro.x),
            format!("{:?}", gyro.y),
            format!("{:?}", gyro.z),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_imu_file(path: &Path, record: &ImuRecord) -> Result<()> {
    write_imu(create_file(path)?, record)
}

/// JSON envelope written next to the tabular outputs.
#[derive(Serialize)]
pub struct RunSummary<'a, T: Serialize> {
    pub generated_at: DateTime<Utc>,
    pub input: &'a Path,
    pub outputs: Vec<PathBuf>,
    pub result: &'a T,
}

impl<'a, T: Serialize> RunSummary<'a, T> {
    pub fn new(input: &'a Path, outputs: Vec<PathBuf>, result: &'a T) -> Self {
        Self {
            generated_at: Utc::now(),
            input,
            outputs,
            result,
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = create_file(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

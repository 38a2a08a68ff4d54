use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use imu_motion_rs::export::write_imu_file;
use imu_motion_rs::merge::merge_files;

/// Merge accelerometer and gyroscope exports into one time-aligned CSV
#[derive(Parser, Debug)]
struct Args {
    /// Accelerometer CSV (time, x, y, z)
    #[arg(long, default_value = "data/Accelerometer.csv")]
    accel: PathBuf,

    /// Gyroscope CSV (time, x, y, z)
    #[arg(long, default_value = "data/Gyroscope.csv")]
    gyro: PathBuf,

    /// Merged output CSV
    #[arg(long, default_value = "data/mergedWalk.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let record = merge_files(&args.accel, &args.gyro).with_context(|| {
        format!(
            "merging {} and {}",
            args.accel.display(),
            args.gyro.display()
        )
    })?;
    write_imu_file(&args.output, &record)?;

    let duration = record.timestamps.last().copied().unwrap_or(0.0);
    println!(
        "Created {} ({} samples). Duration ~ {:.2}s",
        args.output.display(),
        record.aligned_len(),
        duration
    );
    Ok(())
}

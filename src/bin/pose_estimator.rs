use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use imu_motion_rs::config::{GyroUnit, PoseConfig};
use imu_motion_rs::export::{write_orientation_file, RunSummary, ORIENTATION_FILE};
use imu_motion_rs::pose::estimate_pose_file;

#[derive(Parser, Debug)]
#[command(name = "pose_estimator")]
#[command(about = "Roll/pitch estimation with a complementary filter", long_about = None)]
struct Args {
    /// Path to merged IMU CSV (timestamp, ax, ay, az, gx, gy, gz)
    #[arg(long)]
    file: PathBuf,

    /// Sampling rate in Hz (required unless given by --config)
    #[arg(long)]
    fs: Option<u32>,

    /// Gyro unit: 'rad' or 'deg'
    #[arg(long)]
    gyro_unit: Option<String>,

    /// Complementary filter alpha (weight on the gyro path)
    #[arg(long)]
    alpha: Option<f64>,

    /// Also integrate and write yaw (gyro only, drifts)
    #[arg(long, default_value_t = false)]
    yaw: bool,

    /// JSON config file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(long, default_value = "outputs")]
    output_dir: PathBuf,

    /// Also write pose_summary.json
    #[arg(long, default_value_t = false)]
    summary_json: bool,
}

/// JSON config first, then flag overrides. The rate is never defaulted.
fn build_config(args: &Args) -> Result<PoseConfig> {
    let mut config = match args.config.as_ref() {
        Some(path) => PoseConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => PoseConfig::default(),
    };

    if let Some(fs) = args.fs {
        config.sampling_rate_hz = Some(fs);
    }
    config
        .required_rate()
        .context("--fs is required unless the config sets sampling_rate_hz")?;
    if let Some(unit) = args.gyro_unit.as_deref() {
        config.gyro_unit = GyroUnit::parse(unit);
    }
    if let Some(alpha) = args.alpha {
        config.alpha = alpha;
    }
    if args.yaw {
        config.include_yaw = true;
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = build_config(&args)?;

    let estimate = estimate_pose_file(&args.file, &config)
        .with_context(|| format!("estimating pose from {}", args.file.display()))?;

    let csv_path = args.output_dir.join(ORIENTATION_FILE);
    write_orientation_file(&csv_path, &estimate)?;

    if args.summary_json {
        let summary_path = args.output_dir.join("pose_summary.json");
        RunSummary::new(&args.file, vec![csv_path.clone()], &estimate.settings)
            .save(&summary_path)?;
        log::info!("wrote {}", summary_path.display());
    }

    println!("\n========== Pose Estimation Summary ==========");
    println!("File          : {}", args.file.display());
    println!("Samples       : {}", estimate.len());
    println!("Sampling Rate : {} Hz", estimate.settings.sampling_rate_hz);
    println!("Gyro Unit     : {}", config.gyro_unit.as_str());
    println!("Alpha (α)     : {}", config.alpha);
    println!("Output CSV    : {}", csv_path.display());
    println!("=============================================\n");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["pose_estimator", "--file", "merged.csv"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_flags_only() {
        let config = build_config(&args(&["--fs", "100", "--gyro-unit", "deg", "--yaw"])).unwrap();
        assert_eq!(config.sampling_rate_hz, Some(100));
        assert_eq!(config.gyro_unit, GyroUnit::Degrees);
        assert_eq!(config.alpha, 0.98);
        assert!(config.include_yaw);
    }

    #[test]
    fn test_missing_rate_is_rejected() {
        assert!(build_config(&args(&[])).is_err());

        let file = config_file(r#"{"alpha": 1.0}"#);
        assert!(build_config(&args(&["--config", file.path().to_str().unwrap()])).is_err());
        assert!(build_config(&args(&["--fs", "0"])).is_err());
    }

    #[test]
    fn test_config_only() {
        let file = config_file(r#"{"sampling_rate_hz": 200, "gyro_unit": "degrees", "alpha": 0.9}"#);
        let config = build_config(&args(&["--config", file.path().to_str().unwrap()])).unwrap();
        assert_eq!(config.sampling_rate_hz, Some(200));
        assert_eq!(config.gyro_unit, GyroUnit::Degrees);
        assert_eq!(config.alpha, 0.9);
        assert!(!config.include_yaw);
    }

    #[test]
    fn test_flags_override_config() {
        let file = config_file(r#"{"alpha": 0.9}"#);
        let config = build_config(&args(&[
            "--config",
            file.path().to_str().unwrap(),
            "--fs",
            "50",
            "--alpha",
            "0.5",
            "--gyro-unit",
            "rad",
        ]))
        .unwrap();
        assert_eq!(config.sampling_rate_hz, Some(50));
        assert_eq!(config.alpha, 0.5);
        assert_eq!(config.gyro_unit, GyroUnit::Radians);
    }
}

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;

use imu_motion_rs::config::{PeakStrategy, StepConfig, ThresholdMode};
use imu_motion_rs::export::{write_steps_file, RunSummary, STEPS_FILE};
use imu_motion_rs::step_counter::process_file;

#[derive(Parser, Debug)]
#[command(name = "step_counter")]
#[command(about = "Offline step counter - band-pass + adaptive threshold peak detection", long_about = None)]
struct Args {
    /// Path to accelerometer CSV (columns matched by x/y/z in the header)
    #[arg(long)]
    file: PathBuf,

    /// Sampling rate in Hz (0 = unknown) [default: 50 without --config]
    #[arg(long)]
    fs: Option<u32>,

    /// Threshold value or 'auto' (mean + k*std)
    #[arg(long)]
    threshold: Option<String>,

    /// Multiplier for the auto threshold
    #[arg(long)]
    k_auto: Option<f64>,

    /// Minimum gap between steps in ms
    #[arg(long)]
    min_gap_ms: Option<u32>,

    /// Peak scan (greedy, merge)
    #[arg(long)]
    strategy: Option<String>,

    /// JSON config file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(long, default_value = "outputs")]
    output_dir: PathBuf,

    /// Also write step_summary.json
    #[arg(long, default_value_t = false)]
    summary_json: bool,
}

const DEFAULT_FS: u32 = 50;

/// JSON config first (an absent rate there stays unknown), then flag overrides.
fn build_config(args: &Args) -> Result<StepConfig> {
    let mut config = match args.config.as_ref() {
        Some(path) => StepConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => StepConfig {
            sampling_rate_hz: Some(DEFAULT_FS),
            ..StepConfig::default()
        },
    };

    if let Some(fs) = args.fs {
        config.sampling_rate_hz = Some(fs);
    }
    let k = match (args.k_auto, config.threshold) {
        (Some(k), _) => k,
        (None, ThresholdMode::Auto { k }) => k,
        (None, ThresholdMode::Fixed { .. }) => 0.8,
    };
    config.threshold = match args.threshold.as_deref() {
        Some(text) => ThresholdMode::parse(text, k)?,
        None => match config.threshold {
            ThresholdMode::Auto { .. } => ThresholdMode::Auto { k },
            fixed => fixed,
        },
    };
    if let Some(ms) = args.min_gap_ms {
        config.min_gap_ms = ms;
    }
    if let Some(strategy) = args.strategy.as_deref() {
        config.strategy = PeakStrategy::parse(strategy)?;
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = build_config(&args)?;

    println!("[{}] Step Counter Starting", ts_now());
    println!("  File: {}", args.file.display());
    println!("  Config: {:?}", config);

    let result = process_file(&args.file, &config)
        .with_context(|| format!("processing {}", args.file.display()))?;

    let steps_path = args.output_dir.join(STEPS_FILE);
    write_steps_file(&steps_path, &result)?;
    println!("[{}] Saved: {}", ts_now(), steps_path.display());

    if args.summary_json {
        let summary_path = args.output_dir.join("step_summary.json");
        RunSummary::new(&args.file, vec![steps_path.clone()], &result).save(&summary_path)?;
        println!("[{}] Saved: {}", ts_now(), summary_path.display());
    }

    println!("\n=== Step Count Summary ===");
    println!("File              : {}", args.file.display());
    match config.sampling_rate_hz {
        Some(fs) if fs > 0 => println!("Sampling Rate (fs): {} Hz", fs),
        _ => println!("Sampling Rate (fs): unknown"),
    }
    println!("Threshold used    : {:.2}", result.threshold);
    println!("Steps Detected    : {}", result.step_count);
    match result.cadence_spm {
        Some(cadence) => println!("Mean Cadence      : {:.1} steps/min", cadence),
        None => println!("Mean Cadence      : (fs not provided)"),
    }

    Ok(())
}

fn ts_now() -> String {
    Utc::now().format("%H:%M:%S").to_string()
}

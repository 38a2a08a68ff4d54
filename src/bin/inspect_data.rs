use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use imu_motion_rs::inspect::{inspect_dir, DEFAULT_ACTIVITIES};

/// Print magnitude statistics for labelled activity recordings
#[derive(Parser, Debug)]
struct Args {
    /// Directory holding <activity>.csv files
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Activities to inspect (default: standing sitting walking running)
    #[arg(long = "activity")]
    activities: Vec<String>,

    /// Print the reports as JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let activities: Vec<String> = if args.activities.is_empty() {
        DEFAULT_ACTIVITIES.iter().map(|s| s.to_string()).collect()
    } else {
        args.activities.clone()
    };

    let reports = inspect_dir(&args.data_dir, &activities)?;

    if args.json {
        let stats: Vec<_> = reports
            .iter()
            .map(|r| serde_json::json!({ "activity": r.activity, "stats": r.stats }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    for report in &reports {
        let s = &report.stats;
        println!(
            "{}: mean={:.2}, std={:.2}, max={:.2}, min={:.2}",
            report.activity, s.mean, s.std, s.max, s.min
        );
    }
    Ok(())
}

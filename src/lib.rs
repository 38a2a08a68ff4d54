//! Offline IMU motion analysis.
//!
//! Two independent pipelines over a fully buffered recording:
//! - step counting from accelerometer magnitude (band-pass, adaptive
//!   threshold, refractory peak scan, cadence)
//! - roll/pitch orientation from a complementary filter over accelerometer
//!   tilt and integrated gyro rates
//!
//! Everything below `loader`/`export` is pure computation: it takes sample
//! buffers in and returns result structs, with no I/O.

pub mod config;
pub mod error;
pub mod export;
pub mod filters;
pub mod inspect;
pub mod loader;
pub mod magnitude;
pub mod merge;
pub mod peaks;
pub mod pose;
pub mod smoothing;
pub mod step_counter;
pub mod types;

pub use config::{GyroUnit, PeakStrategy, PoseConfig, StepConfig, ThresholdMode};
pub use error::{MotionError, Result};
pub use filters::complementary::{fuse_orientation, OrientationState, OrientationTrace};
pub use pose::{estimate_pose, estimate_pose_file, PoseEstimate};
pub use step_counter::{count_steps, process_file, StepSummary};
pub use types::{AccelData, AxisChannels, GyroData, ImuRecord, TimedAxes};

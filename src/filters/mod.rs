//! Signal filters
//!
//! `bandpass` prepares accelerometer magnitude for step detection;
//! `complementary` fuses accelerometer tilt with gyro integration.

pub mod bandpass;
pub mod complementary;

pub use bandpass::preprocess;
pub use complementary::{ComplementaryFilter, OrientationState};

//! Complementary filter for roll/pitch.
//!
//! Gyro integration is trusted at high frequency, accelerometer tilt at low
//! frequency:
//!
//! ```text
//! roll[i]  = α (roll[i-1]  + gx[i]·dt) + (1-α) rollAccel[i]
//! pitch[i] = α (pitch[i-1] + gy[i]·dt) + (1-α) pitchAccel[i]
//! yaw[i]   =    yaw[i-1]   + gz[i]·dt
//! ```
//!
//! Gravity cannot observe yaw, so yaw is pure gyro integration and drifts.
//! Accelerometer tilt is only valid while linear acceleration is small
//! compared to gravity.

use serde::{Deserialize, Serialize};

use crate::config::GyroUnit;
use crate::error::{MotionError, Result};
use crate::types::{AccelData, GyroData, ImuRecord};

/// Orientation in degrees at one sample index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrientationState {
    pub roll_deg: f64,
    pub pitch_deg: f64,
    pub yaw_deg: f64,
}

/// Roll and pitch (degrees) from the gravity vector alone.
pub fn accel_tilt(accel: &AccelData) -> (f64, f64) {
    let roll = accel.y.atan2(accel.z);
    let pitch = (-accel.x).atan2((accel.y * accel.y + accel.z * accel.z).sqrt());
    (roll.to_degrees(), pitch.to_degrees())
}

/// Keeps the blend weight inside [0, 1].
pub fn clamp_alpha(alpha: f64) -> f64 {
    alpha.clamp(0.0, 1.0)
}

/// Per-run constants of the filter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterGains {
    /// Clamped weight on the gyro-integrated angle.
    pub alpha: f64,
    /// Sample period in seconds.
    pub dt: f64,
    pub gyro_unit: GyroUnit,
}

impl FilterGains {
    pub fn new(alpha: f64, sampling_rate_hz: u32, gyro_unit: GyroUnit) -> Result<Self> {
        if sampling_rate_hz == 0 {
            return Err(MotionError::input("sampling rate must be positive"));
        }
        Ok(Self {
            alpha: clamp_alpha(alpha),
            dt: 1.0 / f64::from(sampling_rate_hz),
            gyro_unit,
        })
    }
}

/// First state: tilt from the accelerometer, zero yaw.
pub fn initial_state(accel: &AccelData) -> OrientationState {
    let (roll_deg, pitch_deg) = accel_tilt(accel);
    OrientationState {
        roll_deg,
        pitch_deg,
        yaw_deg: 0.0,
    }
}

/// One filter transition from the previous fused state.
pub fn propagate(
    prev: &OrientationState,
    accel: &AccelData,
    gyro: &GyroData,
    gains: &FilterGains,
) -> OrientationState {
    let unit = gains.gyro_unit;
    let roll_gyro = prev.roll_deg + unit.to_degrees_per_sec(gyro.x) * gains.dt;
    let pitch_gyro = prev.pitch_deg + unit.to_degrees_per_sec(gyro.y) * gains.dt;
    let yaw_gyro = prev.yaw_deg + unit.to_degrees_per_sec(gyro.z) * gains.dt;

    let (roll_accel, pitch_accel) = accel_tilt(accel);
    let a = gains.alpha;

    OrientationState {
        roll_deg: a * roll_gyro + (1.0 - a) * roll_accel,
        pitch_deg: a * pitch_gyro + (1.0 - a) * pitch_accel,
        yaw_deg: yaw_gyro,
    }
}

/// Incremental form of the filter, one sample at a time.
pub struct ComplementaryFilter {
    gains: FilterGains,
    state: Option<OrientationState>,
    samples: u64,
}

impl ComplementaryFilter {
    pub fn new(alpha: f64, sampling_rate_hz: u32, gyro_unit: GyroUnit) -> Result<Self> {
        Ok(Self {
            gains: FilterGains::new(alpha, sampling_rate_hz, gyro_unit)?,
            state: None,
            samples: 0,
        })
    }

    /// Feed one sample. The first sample seeds the state from tilt and its gyro
    /// reading is not used.
    pub fn update(&mut self, accel: &AccelData, gyro: &GyroData) -> OrientationState {
        let next = match self.state.as_ref() {
            None => initial_state(accel),
            Some(prev) => propagate(prev, accel, gyro, &self.gains),
        };
        self.state = Some(next);
        self.samples += 1;
        next
    }

    pub fn get_state(&self) -> Option<OrientationState> {
        self.state
    }

    pub fn gains(&self) -> &FilterGains {
        &self.gains
    }

    pub fn sample_count(&self) -> u64 {
        self.samples
    }
}

/// Per-index angle traces produced by [`fuse_orientation`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrientationTrace {
    pub roll_deg: Vec<f64>,
    pub pitch_deg: Vec<f64>,
    /// Present only when yaw was requested.
    pub yaw_deg: Option<Vec<f64>>,
}

impl OrientationTrace {
    pub fn len(&self) -> usize {
        self.roll_deg.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roll_deg.is_empty()
    }
}

/// Runs the filter over the aligned part of `record`.
///
/// Fails with an input error when no aligned samples exist or the rate is zero.
/// Each state depends on the previous fused state, so samples are fed in order.
pub fn fuse_orientation(
    record: &ImuRecord,
    sampling_rate_hz: u32,
    alpha: f64,
    gyro_unit: GyroUnit,
    include_yaw: bool,
) -> Result<OrientationTrace> {
    let n = record.aligned_len();
    if n == 0 {
        return Err(MotionError::input("no aligned IMU samples"));
    }
    let mut filter = ComplementaryFilter::new(alpha, sampling_rate_hz, gyro_unit)?;
    let states: Vec<OrientationState> = (0..n)
        .map(|i| filter.update(&record.accel(i), &record.gyro(i)))
        .collect();

    let gains = filter.gains();
    log::debug!(
        "fused {} samples (alpha={:.3}, dt={:.5}s, gyro={})",
        filter.sample_count(),
        gains.alpha,
        gains.dt,
        gyro_unit.as_str()
    );

    Ok(OrientationTrace {
        roll_deg: states.iter().map(|s| s.roll_deg).collect(),
        pitch_deg: states.iter().map(|s| s.pitch_deg).collect(),
        yaw_deg: include_yaw.then(|| states.iter().map(|s| s.yaw_deg).collect()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    /// Tilted, slightly shaking device with a varying gyro.
    fn synthetic_record(n: usize) -> ImuRecord {
        let mut record = ImuRecord::default();
        for i in 0..n {
            let t = i as f64 * 0.01;
            record.push(
                t,
                AccelData {
                    x: 1.0 + 0.3 * (t * 3.0).sin(),
                    y: 2.0 * (t * 1.5).cos(),
                    z: 9.5,
                },
                GyroData {
                    x: 0.2 * (t * 2.0).sin(),
                    y: -0.1 + 0.05 * t,
                    z: 0.3,
                },
            );
        }
        record
    }

    #[test]
    fn test_accel_tilt_level() {
        let (roll, pitch) = accel_tilt(&AccelData { x: 0.0, y: 0.0, z: 9.81 });
        assert_abs_diff_eq!(roll, 0.0);
        assert_abs_diff_eq!(pitch, 0.0);
    }

    #[test]
    fn test_accel_tilt_on_side() {
        let (roll, _) = accel_tilt(&AccelData { x: 0.0, y: 9.81, z: 0.0 });
        assert_relative_eq!(roll, 90.0);
        let (_, pitch) = accel_tilt(&AccelData { x: -9.81, y: 0.0, z: 0.0 });
        assert_relative_eq!(pitch, 90.0);
    }

    #[test]
    fn test_alpha_clamped() {
        assert_eq!(clamp_alpha(1.7), 1.0);
        assert_eq!(clamp_alpha(-0.2), 0.0);
        assert_eq!(clamp_alpha(0.98), 0.98);
    }

    #[test]
    fn test_alpha_one_is_pure_gyro_integration() {
        let record = synthetic_record(300);
        let fs = 100;
        let dt = 1.0 / fs as f64;
        let trace = fuse_orientation(&record, fs, 1.0, GyroUnit::Radians, false).unwrap();

        let mut expected = trace.roll_deg[0];
        for i in 1..record.aligned_len() {
            expected += record.gx[i].to_degrees() * dt;
            assert_relative_eq!(trace.roll_deg[i], expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_alpha_zero_is_pure_tilt() {
        let record = synthetic_record(200);
        let trace = fuse_orientation(&record, 100, 0.0, GyroUnit::Radians, false).unwrap();
        for i in 0..record.aligned_len() {
            let (roll, pitch) = accel_tilt(&record.accel(i));
            assert_relative_eq!(trace.roll_deg[i], roll);
            assert_relative_eq!(trace.pitch_deg[i], pitch);
        }
    }

    #[test]
    fn test_out_of_range_alpha_behaves_like_clamped() {
        let record = synthetic_record(50);
        let over = fuse_orientation(&record, 100, 3.0, GyroUnit::Radians, false).unwrap();
        let one = fuse_orientation(&record, 100, 1.0, GyroUnit::Radians, false).unwrap();
        assert_eq!(over, one);
    }

    #[test]
    fn test_first_sample_comes_from_tilt() {
        let record = synthetic_record(10);
        let trace = fuse_orientation(&record, 100, 0.98, GyroUnit::Radians, true).unwrap();
        let (roll, pitch) = accel_tilt(&record.accel(0));
        assert_eq!(trace.roll_deg[0], roll);
        assert_eq!(trace.pitch_deg[0], pitch);
        assert_eq!(trace.yaw_deg.as_ref().unwrap()[0], 0.0);
    }

    #[test]
    fn test_yaw_is_gyro_only_and_optional() {
        let record = synthetic_record(101);
        let with_yaw = fuse_orientation(&record, 100, 0.5, GyroUnit::Radians, true).unwrap();
        let yaw = with_yaw.yaw_deg.unwrap();
        // gz = 0.3 rad/s for 100 steps of 0.01 s
        assert_relative_eq!(yaw[100], 0.3f64.to_degrees(), epsilon = 1e-9);

        let without = fuse_orientation(&record, 100, 0.5, GyroUnit::Radians, false).unwrap();
        assert!(without.yaw_deg.is_none());
        assert_eq!(without.roll_deg, with_yaw.roll_deg);
    }

    #[test]
    fn test_degree_unit_skips_conversion() {
        let mut deg = synthetic_record(60);
        let rad = deg.clone();
        for v in deg.gx.iter_mut().chain(deg.gy.iter_mut()).chain(deg.gz.iter_mut()) {
            *v = v.to_degrees();
        }
        let a = fuse_orientation(&rad, 100, 0.9, GyroUnit::Radians, true).unwrap();
        let b = fuse_orientation(&deg, 100, 0.9, GyroUnit::Degrees, true).unwrap();
        for (x, y) in a.pitch_deg.iter().zip(&b.pitch_deg) {
            assert_relative_eq!(x, y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_empty_or_zero_rate_is_input_error() {
        let empty = ImuRecord::default();
        assert!(matches!(
            fuse_orientation(&empty, 100, 0.98, GyroUnit::Radians, false),
            Err(MotionError::Input(_))
        ));
        let record = synthetic_record(5);
        assert!(matches!(
            fuse_orientation(&record, 0, 0.98, GyroUnit::Radians, false),
            Err(MotionError::Input(_))
        ));
    }

    #[test]
    fn test_incremental_filter_matches_batch() {
        let record = synthetic_record(120);
        let batch = fuse_orientation(&record, 100, 0.98, GyroUnit::Radians, true).unwrap();

        let mut filter = ComplementaryFilter::new(0.98, 100, GyroUnit::Radians).unwrap();
        assert!(filter.get_state().is_none());
        for i in 0..record.aligned_len() {
            let state = filter.update(&record.accel(i), &record.gyro(i));
            assert_eq!(state.roll_deg, batch.roll_deg[i]);
            assert_eq!(state.pitch_deg, batch.pitch_deg[i]);
        }
        assert_eq!(filter.sample_count(), 120);
    }

    #[test]
    fn test_static_device_converges_to_tilt() {
        let mut record = ImuRecord::default();
        for i in 0..2000 {
            record.push(
                i as f64 * 0.01,
                AccelData { x: 0.0, y: 4.905, z: 8.496 },
                GyroData::default(),
            );
        }
        // Start the filter from a wrong state by seeding a different first sample.
        record.ay[0] = 0.0;
        record.az[0] = 9.81;
        let trace = fuse_orientation(&record, 100, 0.98, GyroUnit::Radians, false).unwrap();
        let (roll, _) = accel_tilt(&record.accel(1999));
        assert_abs_diff_eq!(trace.roll_deg[1999], roll, epsilon = 1e-6);
    }
}

use serde::{Deserialize, Serialize};

/// One accelerometer reading (m/s²).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AccelData {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// One gyroscope reading, in whatever unit the recording uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GyroData {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Three name-matched axis columns from a single sensor export.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisChannels {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl AxisChannels {
    pub fn len(&self) -> usize {
        self.x.len().min(self.y.len()).min(self.z.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&mut self, x: f64, y: f64, z: f64) {
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
    }
}

/// Positional `time, x, y, z` rows, as written by phone sensor exporters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimedAxes {
    pub timestamps: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl TimedAxes {
    pub fn len(&self) -> usize {
        self.timestamps
            .len()
            .min(self.x.len())
            .min(self.y.len())
            .min(self.z.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&mut self, timestamp: f64, x: f64, y: f64, z: f64) {
        self.timestamps.push(timestamp);
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
    }
}

/// Merged accelerometer + gyroscope record, one entry per sample index.
///
/// Index order is temporal order. Channels may differ in length until
/// [`ImuRecord::truncate_aligned`] is called.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImuRecord {
    pub timestamps: Vec<f64>,
    pub ax: Vec<f64>,
    pub ay: Vec<f64>,
    pub az: Vec<f64>,
    pub gx: Vec<f64>,
    pub gy: Vec<f64>,
    pub gz: Vec<f64>,
}

impl ImuRecord {
    /// Length of the shortest channel.
    pub fn aligned_len(&self) -> usize {
        [
            self.timestamps.len(),
            self.ax.len(),
            self.ay.len(),
            self.az.len(),
            self.gx.len(),
            self.gy.len(),
            self.gz.len(),
        ]
        .into_iter()
        .min()
        .unwrap_or(0)
    }

    /// Drops trailing entries so every channel has the shortest length. Never pads.
    pub fn truncate_aligned(&mut self) -> usize {
        let n = self.aligned_len();
        for channel in [
            &mut self.timestamps,
            &mut self.ax,
            &mut self.ay,
            &mut self.az,
            &mut self.gx,
            &mut self.gy,
            &mut self.gz,
        ] {
            channel.truncate(n);
        }
        n
    }

    pub fn push(&mut self, timestamp: f64, accel: AccelData, gyro: GyroData) {
        self.timestamps.push(timestamp);
        self.ax.push(accel.x);
        self.ay.push(accel.y);
        self.az.push(accel.z);
        self.gx.push(gyro.x);
        self.gy.push(gyro.y);
        self.gz.push(gyro.z);
    }

    pub fn accel(&self, i: usize) -> AccelData {
        AccelData {
            x: self.ax[i],
            y: self.ay[i],
            z: self.az[i],
        }
    }

    pub fn gyro(&self, i: usize) -> GyroData {
        GyroData {
            x: self.gx[i],
            y: self.gy[i],
            z: self.gz[i],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.aligned_len() == 0
    }
}

use crate::types::{AccelData, AxisChannels};

/// Euclidean norm of one accelerometer reading.
#[inline]
pub fn vector_magnitude(x: f64, y: f64, z: f64) -> f64 {
    (x * x + y * y + z * z).sqrt()
}

impl AccelData {
    pub fn magnitude(&self) -> f64 {
        vector_magnitude(self.x, self.y, self.z)
    }
}

/// Per-index magnitude over the common length of the three axes.
pub fn magnitude(x: &[f64], y: &[f64], z: &[f64]) -> Vec<f64> {
    x.iter()
        .zip(y)
        .zip(z)
        .map(|((&x, &y), &z)| vector_magnitude(x, y, z))
        .collect()
}

impl AxisChannels {
    pub fn magnitude(&self) -> Vec<f64> {
        magnitude(&self.x, &self.y, &self.z)
    }
}

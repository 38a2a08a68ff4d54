use thiserror::Error;

/// Motion analysis error types
#[derive(Error, Debug)]
pub enum MotionError {
    /// Required columns could not be located in the header row.
    #[error("Schema error: {0}")]
    Schema(String),

    /// The usable dataset is empty, or a mandatory sampling rate is not positive.
    #[error("Input error: {0}")]
    Input(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MotionError {
    pub fn schema(msg: impl Into<String>) -> Self {
        MotionError::Schema(msg.into())
    }

    pub fn input(msg: impl Into<String>) -> Self {
        MotionError::Input(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        MotionError::Config(msg.into())
    }
}

/// Result type for motion analysis operations
pub type Result<T> = std::result::Result<T, MotionError>;

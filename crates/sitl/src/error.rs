use std::net::SocketAddr;

/// Errors that can occur during simulator operations.
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Orientation sensor: {0}")]
    Sensor(String),

    #[error("Calibration failed: {0}")]
    Calibration(String),

    #[error("Record of {len} bytes only partly sent to {target}")]
    ShortSend { len: usize, target: SocketAddr },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<body_tracker::devices::traits::OrientationError> for SimulatorError {
    fn from(e: body_tracker::devices::traits::OrientationError) -> Self {
        SimulatorError::Sensor(e.to_string())
    }
}

impl From<body_tracker_core::CalibrationError> for SimulatorError {
    fn from(e: body_tracker_core::CalibrationError) -> Self {
        SimulatorError::Calibration(e.to_string())
    }
}

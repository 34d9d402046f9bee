//! Error types for the rover core

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Rover error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Analog channel not wired on this board
    #[error("analog channel {0} is not wired")]
    UnknownAnalogChannel(u8),

    /// Ranging sensor failed hard (a plain timeout is reported as the
    /// maximum-range sentinel instead)
    #[error("ranging sensor failure")]
    RangeSensor,

    /// An actuator rejected a command
    #[error("actuator fault: {0}")]
    Actuator(&'static str),

    /// Persisted calibration value outside its expected range
    #[error("invalid calibration: {0}")]
    InvalidCalibration(String),

    /// Calibration key-value store unavailable
    #[error("calibration store failure: {0}")]
    CalibrationStore(String),
}

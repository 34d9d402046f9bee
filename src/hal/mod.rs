//! Hardware capability interface
//!
//! The narrow boundary between the control pipeline and whatever drives the
//! physical electronics: PWM generation, GPIO direction pins, the ADC and
//! the persisted calibration store all live behind this trait.
//!
//! Two implementations exist and the caller picks one explicitly at
//! construction time; there is no runtime probing for hardware. The real
//! implementation ships with the board support package, the simulated one
//! lives in [`sim`] and backs the demo pipeline and the test suite.
//!
//! Access rules: the drive arbiter is the only task allowed to command the
//! drivetrain, and each sensor source owns its read channel. Everything
//! else goes through mailboxes.

pub mod sim;

use crate::error::Result;

/// Drive wheel selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Positioning servo selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServoChannel {
    Steering,
    CameraPan,
    CameraTilt,
}

/// ADC channels of the reflectance array, ordered left, middle, right
pub const REFLECTANCE_CHANNELS: [u8; 3] = [0, 1, 2];

/// Capabilities the pipeline consumes from the hardware collaborator
pub trait Hardware: Send + Sync {
    /// Commands one wheel's duty cycle, signed percent in [-100, 100]
    fn set_wheel_duty(&self, side: Side, percent: f32) -> Result<()>;

    /// Positions one servo, degrees from center
    fn set_servo_angle(&self, servo: ServoChannel, degrees: f32) -> Result<()>;

    /// Reads one raw analog channel
    fn read_analog(&self, channel: u8) -> Result<u16>;

    /// Reads the forward range in centimeters
    ///
    /// The implementation enforces its own read timeout (20 ms on the real
    /// board) and reports a timed-out ping as the maximum-range sentinel
    /// rather than blocking the caller.
    fn read_range(&self) -> Result<f64>;

    /// Fetches a persisted calibration value, `None` when the key was never
    /// written
    fn get_calibration(&self, key: &str) -> Result<Option<f64>>;

    /// Persists a calibration value
    fn set_calibration(&self, key: &str, value: f64) -> Result<()>;
}

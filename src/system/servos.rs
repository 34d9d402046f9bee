//! Servo positioning
//!
//! Applies per-robot trim before handing an angle to the hardware. The
//! camera pan and tilt servos are mounted mirrored relative to their
//! positive direction, so a requested "look right / look up" angle is
//! inverted around the trimmed center before it reaches the horn.

use crate::error::Result;
use crate::hal::{Hardware, ServoChannel};
use crate::system::calibration::CalibrationState;

/// Physical travel limit of the positioning servos (degrees)
pub const MAX_SERVO_ANGLE: f32 = 90.0;

/// Points the front wheels, trim applied
pub fn set_steering_angle(
    hal: &dyn Hardware,
    calibration: &CalibrationState,
    degrees: f32,
) -> Result<()> {
    let target = (degrees + calibration.steering_trim).clamp(-MAX_SERVO_ANGLE, MAX_SERVO_ANGLE);
    hal.set_servo_angle(ServoChannel::Steering, target)
}

/// Points the camera pan axis, trim applied and mirror-mount inverted
pub fn set_pan_angle(
    hal: &dyn Hardware,
    calibration: &CalibrationState,
    degrees: f32,
) -> Result<()> {
    let target = (calibration.pan_trim - degrees).clamp(-MAX_SERVO_ANGLE, MAX_SERVO_ANGLE);
    hal.set_servo_angle(ServoChannel::CameraPan, target)
}

/// Points the camera tilt axis, trim applied and mirror-mount inverted
pub fn set_tilt_angle(
    hal: &dyn Hardware,
    calibration: &CalibrationState,
    degrees: f32,
) -> Result<()> {
    let target = (calibration.tilt_trim - degrees).clamp(-MAX_SERVO_ANGLE, MAX_SERVO_ANGLE);
    hal.set_servo_angle(ServoChannel::CameraTilt, target)
}

//! Differential drive kinematics
//!
//! Converts a desired chassis motion (speed, steering angle) into two
//! independent wheel duty commands.
//!
//! # Turning model
//! On a turn, the wheel on the inside of the curve travels a shorter arc
//! than the outside wheel. Driving both at full power makes the inside
//! wheel slip, so its power is reduced by a scale factor derived from the
//! instantaneous center of rotation: with track length `L` and wheelbase
//! offset `H`, the turning radius at steering angle `a` is
//! `icr = tan(90° - |a|) * H + L/2`, and the inside wheel runs at
//! `(icr - L/2) / icr` of the commanded speed. A simpler linear
//! approximation, `(100 - |a|) / 100`, is available as a configuration
//! option; the two diverge most at steep angles.
//!
//! # Sign conventions
//! The right motor is mounted mirrored, so opposing duty signs drive the
//! chassis in the same travel direction. `angle == 0` bypasses the scale
//! math entirely and commands `(speed, -speed)` exactly, keeping
//! straight-line driving free of floating-point residue from the turning
//! geometry.
//!
//! # Calibration
//! Raw wheel powers are passed through the per-robot calibration as the
//! last step: direction sign per wheel, then power trim subtracted from the
//! magnitude, then a clamp to the ±100 duty range.

use crate::system::calibration::CalibrationState;
use crate::system::steering::MAX_STEER_ANGLE;

/// Duty commands for both wheels, signed percent in [-100, 100]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelCommand {
    pub left: f32,
    pub right: f32,
}

/// Chassis geometry used by the turning model (centimeters)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveGeometry {
    /// Distance between the two drive wheels
    pub track_cm: f32,
    /// Longitudinal offset between steering axis and drive axle
    pub wheelbase_offset_cm: f32,
}

impl Default for DriveGeometry {
    fn default() -> Self {
        Self {
            track_cm: 11.4,
            wheelbase_offset_cm: 9.2,
        }
    }
}

/// Inside-wheel power reduction model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnModel {
    /// Scale from the instantaneous center of rotation
    #[default]
    InstantaneousCenter,
    /// `(100 - |angle|) / 100`, the earlier approximation
    Linear,
}

/// Computes the inside-wheel power scale for a steering angle
///
/// `|angle|` is clamped to [`MAX_STEER_ANGLE`] first: steeper requested
/// angles still steer fully but do not reduce inside-wheel power further.
pub fn power_scale(angle: f32, model: TurnModel, geometry: &DriveGeometry) -> f32 {
    let angle = angle.abs().min(MAX_STEER_ANGLE);
    if angle == 0.0 {
        return 1.0;
    }
    match model {
        TurnModel::Linear => (100.0 - angle) / 100.0,
        TurnModel::InstantaneousCenter => {
            let half_track = geometry.track_cm / 2.0;
            let icr = libm::tanf((90.0 - angle).to_radians()) * geometry.wheelbase_offset_cm
                + half_track;
            (icr - half_track) / icr
        }
    }
}

/// Mixes a chassis motion into raw per-wheel powers
///
/// The wheel on the side the robot turns toward receives the scaled power.
/// Role assignment follows the sign of `speed * angle`, which keeps the
/// chassis turning toward the same side while reversing.
pub fn mix(speed: f32, angle: f32, model: TurnModel, geometry: &DriveGeometry) -> WheelCommand {
    if angle == 0.0 || speed == 0.0 {
        return WheelCommand {
            left: speed,
            right: -speed,
        };
    }

    let scale = power_scale(angle, model, geometry);
    if speed * angle > 0.0 {
        WheelCommand {
            left: speed * scale,
            right: -speed,
        }
    } else {
        WheelCommand {
            left: speed,
            right: -speed * scale,
        }
    }
}

/// Applies per-wheel direction sign and power trim, then clamps to the
/// ±100 duty range. Zero stays exactly zero.
pub fn apply_calibration(command: WheelCommand, calibration: &CalibrationState) -> WheelCommand {
    WheelCommand {
        left: trim_wheel(
            command.left,
            calibration.left_direction,
            calibration.left_trim,
        ),
        right: trim_wheel(
            command.right,
            calibration.right_direction,
            calibration.right_trim,
        ),
    }
}

fn trim_wheel(power: f32, direction: i8, trim: f32) -> f32 {
    if power == 0.0 {
        return 0.0;
    }
    let magnitude = (power.abs() - trim).max(0.0);
    (power.signum() * f32::from(direction) * magnitude).clamp(-100.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn geometry() -> DriveGeometry {
        DriveGeometry::default()
    }

    #[test]
    fn zero_angle_bypasses_the_turning_model() {
        for speed in [-100.0, -50.0, 0.0, 12.5, 50.0, 100.0] {
            let wheels = mix(speed, 0.0, TurnModel::InstantaneousCenter, &geometry());
            assert_eq!(wheels.left, speed);
            assert_eq!(wheels.right, -speed);
        }
    }

    #[test]
    fn power_scale_clamps_above_the_maximum_angle() {
        for model in [TurnModel::InstantaneousCenter, TurnModel::Linear] {
            let at_limit = power_scale(MAX_STEER_ANGLE, model, &geometry());
            for angle in [41.0, 60.0, 90.0, 500.0] {
                assert_eq!(power_scale(angle, model, &geometry()), at_limit);
                assert_eq!(power_scale(-angle, model, &geometry()), at_limit);
            }
        }
    }

    #[test]
    fn power_scale_stays_in_unit_range() {
        for model in [TurnModel::InstantaneousCenter, TurnModel::Linear] {
            for angle in 1..=40 {
                let scale = power_scale(angle as f32, model, &geometry());
                assert!(scale > 0.0 && scale < 1.0, "{model:?} at {angle}: {scale}");
            }
        }
    }

    #[test]
    fn inside_wheel_slows_while_outside_keeps_full_power() {
        let wheels = mix(50.0, 30.0, TurnModel::InstantaneousCenter, &geometry());
        assert!(wheels.left > 0.0 && wheels.left < 50.0);
        assert_eq!(wheels.right, -50.0);

        let wheels = mix(50.0, -30.0, TurnModel::InstantaneousCenter, &geometry());
        assert_eq!(wheels.left, 50.0);
        assert!(wheels.right < 0.0 && wheels.right > -50.0);
    }

    #[test]
    fn reversing_turns_toward_the_same_side() {
        // Forward with positive angle scales the left wheel; reversing with
        // the same angle must scale the right wheel instead so the chassis
        // keeps rotating the same way.
        let forward = mix(50.0, 30.0, TurnModel::InstantaneousCenter, &geometry());
        let reverse = mix(-50.0, 30.0, TurnModel::InstantaneousCenter, &geometry());
        assert!(forward.left.abs() < forward.right.abs());
        assert!(reverse.right.abs() < reverse.left.abs());
        assert_eq!(reverse.left, -50.0);
    }

    #[test]
    fn linear_model_matches_the_closed_form() {
        let scale = power_scale(30.0, TurnModel::Linear, &geometry());
        assert!((scale - 0.7).abs() < EPSILON);
    }

    #[test]
    fn calibration_applies_direction_and_trim() {
        let mut calibration = CalibrationState::default();
        calibration.left_direction = -1;
        calibration.right_trim = 5.0;

        let wheels = apply_calibration(
            WheelCommand {
                left: 40.0,
                right: -40.0,
            },
            &calibration,
        );
        assert_eq!(wheels.left, -40.0);
        assert_eq!(wheels.right, -35.0);
    }

    #[test]
    fn calibration_keeps_zero_at_zero() {
        let mut calibration = CalibrationState::default();
        calibration.left_trim = 5.0;
        calibration.right_trim = 5.0;

        let wheels = apply_calibration(
            WheelCommand {
                left: 0.0,
                right: 0.0,
            },
            &calibration,
        );
        assert_eq!(wheels.left, 0.0);
        assert_eq!(wheels.right, 0.0);
    }

    #[test]
    fn trim_floors_small_magnitudes_at_zero() {
        let mut calibration = CalibrationState::default();
        calibration.left_trim = 10.0;

        let wheels = apply_calibration(
            WheelCommand {
                left: 4.0,
                right: -4.0,
            },
            &calibration,
        );
        assert_eq!(wheels.left, 0.0);
        assert_eq!(wheels.right, -4.0);
    }

    #[test]
    fn calibrated_duty_never_leaves_valid_range() {
        let calibration = CalibrationState::default();
        let wheels = apply_calibration(
            WheelCommand {
                left: 250.0,
                right: -250.0,
            },
            &calibration,
        );
        assert_eq!(wheels.left, 100.0);
        assert_eq!(wheels.right, -100.0);
    }
}

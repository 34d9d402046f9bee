//! Persisted per-robot calibration
//!
//! Every chassis leaves assembly a little different: servos are rarely
//! centered, motors may be wired reversed, and one wheel usually runs a
//! touch faster than the other. The correction values live in the hardware
//! collaborator's key-value store and are loaded once at startup, with a
//! per-key default for robots that were never calibrated.
//!
//! Loading validates every value; a nonsensical trim refuses pipeline
//! startup rather than driving the robot with it. The explicit save
//! operations are the only mutation path, they persist the new value and
//! apply it immediately.

use crate::error::{Error, Result};
use crate::hal::{Hardware, ServoChannel, Side};

const KEY_STEERING_TRIM: &str = "steering_servo_trim";
const KEY_PAN_TRIM: &str = "camera_pan_trim";
const KEY_TILT_TRIM: &str = "camera_tilt_trim";
const KEY_LEFT_DIRECTION: &str = "left_wheel_direction";
const KEY_RIGHT_DIRECTION: &str = "right_wheel_direction";
const KEY_LEFT_TRIM: &str = "left_wheel_trim";
const KEY_RIGHT_TRIM: &str = "right_wheel_trim";

/// Largest believable servo trim (degrees); beyond this the servo horn is
/// mounted wrong, not miscalibrated
pub const MAX_SERVO_TRIM: f32 = 30.0;

/// Largest believable wheel power trim (duty percent)
pub const MAX_WHEEL_TRIM: f32 = 50.0;

/// Per-robot correction values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationState {
    /// Steering servo center offset (degrees)
    pub steering_trim: f32,
    /// Camera pan servo center offset (degrees)
    pub pan_trim: f32,
    /// Camera tilt servo center offset (degrees)
    pub tilt_trim: f32,
    /// Left motor wiring direction, +1 or -1
    pub left_direction: i8,
    /// Right motor wiring direction, +1 or -1
    pub right_direction: i8,
    /// Duty percent subtracted from the left wheel's magnitude
    pub left_trim: f32,
    /// Duty percent subtracted from the right wheel's magnitude
    pub right_trim: f32,
}

impl Default for CalibrationState {
    fn default() -> Self {
        Self {
            steering_trim: 0.0,
            pan_trim: 0.0,
            tilt_trim: 0.0,
            left_direction: 1,
            right_direction: 1,
            left_trim: 0.0,
            right_trim: 0.0,
        }
    }
}

impl CalibrationState {
    /// Loads all values from the persisted store, falling back to defaults
    /// for missing keys, and validates the result
    pub fn load(hal: &dyn Hardware) -> Result<Self> {
        let state = Self {
            steering_trim: fetch(hal, KEY_STEERING_TRIM, 0.0)? as f32,
            pan_trim: fetch(hal, KEY_PAN_TRIM, 0.0)? as f32,
            tilt_trim: fetch(hal, KEY_TILT_TRIM, 0.0)? as f32,
            left_direction: fetch(hal, KEY_LEFT_DIRECTION, 1.0)? as i8,
            right_direction: fetch(hal, KEY_RIGHT_DIRECTION, 1.0)? as i8,
            left_trim: fetch(hal, KEY_LEFT_TRIM, 0.0)? as f32,
            right_trim: fetch(hal, KEY_RIGHT_TRIM, 0.0)? as f32,
        };
        state.validate()?;
        Ok(state)
    }

    /// Checks every value against its expected range
    pub fn validate(&self) -> Result<()> {
        for (name, trim) in [
            ("steering", self.steering_trim),
            ("pan", self.pan_trim),
            ("tilt", self.tilt_trim),
        ] {
            if !trim.is_finite() || trim.abs() > MAX_SERVO_TRIM {
                return Err(Error::InvalidCalibration(format!(
                    "{name} servo trim {trim} outside ±{MAX_SERVO_TRIM} degrees"
                )));
            }
        }
        for (name, direction) in [
            ("left", self.left_direction),
            ("right", self.right_direction),
        ] {
            if direction != 1 && direction != -1 {
                return Err(Error::InvalidCalibration(format!(
                    "{name} wheel direction {direction} must be +1 or -1"
                )));
            }
        }
        for (name, trim) in [("left", self.left_trim), ("right", self.right_trim)] {
            if !trim.is_finite() || !(0.0..=MAX_WHEEL_TRIM).contains(&trim) {
                return Err(Error::InvalidCalibration(format!(
                    "{name} wheel trim {trim} outside 0..={MAX_WHEEL_TRIM}"
                )));
            }
        }
        Ok(())
    }

    /// Persists a new steering trim and recenters the servo onto it
    pub fn save_steering_trim(&mut self, hal: &dyn Hardware, degrees: f32) -> Result<()> {
        check_servo_trim("steering", degrees)?;
        hal.set_calibration(KEY_STEERING_TRIM, f64::from(degrees))?;
        self.steering_trim = degrees;
        hal.set_servo_angle(ServoChannel::Steering, degrees)
    }

    /// Persists a new camera pan trim and recenters the servo onto it
    pub fn save_pan_trim(&mut self, hal: &dyn Hardware, degrees: f32) -> Result<()> {
        check_servo_trim("pan", degrees)?;
        hal.set_calibration(KEY_PAN_TRIM, f64::from(degrees))?;
        self.pan_trim = degrees;
        hal.set_servo_angle(ServoChannel::CameraPan, degrees)
    }

    /// Persists a new camera tilt trim and recenters the servo onto it
    pub fn save_tilt_trim(&mut self, hal: &dyn Hardware, degrees: f32) -> Result<()> {
        check_servo_trim("tilt", degrees)?;
        hal.set_calibration(KEY_TILT_TRIM, f64::from(degrees))?;
        self.tilt_trim = degrees;
        hal.set_servo_angle(ServoChannel::CameraTilt, degrees)
    }

    /// Persists a new wiring direction for one wheel
    pub fn save_wheel_direction(
        &mut self,
        hal: &dyn Hardware,
        side: Side,
        direction: i8,
    ) -> Result<()> {
        if direction != 1 && direction != -1 {
            return Err(Error::InvalidCalibration(format!(
                "wheel direction {direction} must be +1 or -1"
            )));
        }
        let (key, slot) = match side {
            Side::Left => (KEY_LEFT_DIRECTION, &mut self.left_direction),
            Side::Right => (KEY_RIGHT_DIRECTION, &mut self.right_direction),
        };
        hal.set_calibration(key, f64::from(direction))?;
        *slot = direction;
        Ok(())
    }

    /// Persists a new power trim for one wheel
    pub fn save_wheel_trim(&mut self, hal: &dyn Hardware, side: Side, trim: f32) -> Result<()> {
        if !trim.is_finite() || !(0.0..=MAX_WHEEL_TRIM).contains(&trim) {
            return Err(Error::InvalidCalibration(format!(
                "wheel trim {trim} outside 0..={MAX_WHEEL_TRIM}"
            )));
        }
        let (key, slot) = match side {
            Side::Left => (KEY_LEFT_TRIM, &mut self.left_trim),
            Side::Right => (KEY_RIGHT_TRIM, &mut self.right_trim),
        };
        hal.set_calibration(key, f64::from(trim))?;
        *slot = trim;
        Ok(())
    }
}

fn fetch(hal: &dyn Hardware, key: &str, default: f64) -> Result<f64> {
    Ok(hal.get_calibration(key)?.unwrap_or(default))
}

fn check_servo_trim(name: &str, degrees: f32) -> Result<()> {
    if !degrees.is_finite() || degrees.abs() > MAX_SERVO_TRIM {
        return Err(Error::InvalidCalibration(format!(
            "{name} servo trim {degrees} outside ±{MAX_SERVO_TRIM} degrees"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::sim::SimHardware;

    #[test]
    fn empty_store_loads_defaults() {
        let sim = SimHardware::new();
        let state = CalibrationState::load(&sim).unwrap();
        assert_eq!(state, CalibrationState::default());
    }

    #[test]
    fn saved_values_survive_a_reload() {
        let sim = SimHardware::new();
        let mut state = CalibrationState::load(&sim).unwrap();
        state.save_steering_trim(&sim, -4.5).unwrap();
        state.save_wheel_direction(&sim, Side::Right, -1).unwrap();
        state.save_wheel_trim(&sim, Side::Left, 2.0).unwrap();

        let reloaded = CalibrationState::load(&sim).unwrap();
        assert_eq!(reloaded.steering_trim, -4.5);
        assert_eq!(reloaded.right_direction, -1);
        assert_eq!(reloaded.left_trim, 2.0);
        assert_eq!(reloaded, state);
    }

    #[test]
    fn saving_a_servo_trim_recenters_the_servo() {
        let sim = SimHardware::new();
        let mut state = CalibrationState::default();
        state.save_steering_trim(&sim, 3.0).unwrap();
        assert_eq!(sim.servo_angle(ServoChannel::Steering), 3.0);
    }

    #[test]
    fn bogus_stored_direction_refuses_to_load() {
        let sim = SimHardware::new();
        sim.set_calibration("left_wheel_direction", 0.0).unwrap();
        assert!(CalibrationState::load(&sim).is_err());
    }

    #[test]
    fn bogus_stored_servo_trim_refuses_to_load() {
        let sim = SimHardware::new();
        sim.set_calibration("steering_servo_trim", 71.0).unwrap();
        assert!(CalibrationState::load(&sim).is_err());
    }

    #[test]
    fn out_of_range_saves_are_rejected_without_persisting() {
        let sim = SimHardware::new();
        let mut state = CalibrationState::default();
        assert!(state.save_steering_trim(&sim, 45.0).is_err());
        assert!(state.save_wheel_trim(&sim, Side::Left, -1.0).is_err());
        assert!(state.save_wheel_direction(&sim, Side::Left, 2).is_err());
        assert_eq!(state, CalibrationState::default());
        assert_eq!(sim.get_calibration("steering_servo_trim").unwrap(), None);
    }
}

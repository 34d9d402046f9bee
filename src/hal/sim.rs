//! Simulated hardware
//!
//! Stands in for the board support package when no robot is attached:
//! analog channels and the range reading are plain settable values, wheel
//! and servo commands are recorded for inspection, and the calibration
//! store is an in-memory map. Selected explicitly at construction time,
//! never by environment probing.

use core::cell::RefCell;
use std::collections::BTreeMap;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::error::{Error, Result};
use crate::system::range::MAX_RANGE_CM;

use super::{Hardware, ServoChannel, Side};

/// Hardware substitute with settable sensors and recorded actuators
pub struct SimHardware {
    state: Mutex<CriticalSectionRawMutex, RefCell<SimState>>,
}

struct SimState {
    analog: [u16; 3],
    range_cm: f64,
    wheel_duty: [f32; 2],
    servo_angle: [f32; 3],
    calibration: BTreeMap<String, f64>,
}

impl SimHardware {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(SimState {
                analog: [0; 3],
                range_cm: MAX_RANGE_CM,
                wheel_duty: [0.0; 2],
                servo_angle: [0.0; 3],
                calibration: BTreeMap::new(),
            })),
        }
    }

    /// Sets what an analog channel will read
    pub fn set_analog(&self, channel: u8, value: u16) {
        assert!((channel as usize) < 3, "channel {channel} is not wired");
        self.state
            .lock(|state| state.borrow_mut().analog[channel as usize] = value);
    }

    /// Sets what the ranging sensor will read (cm)
    pub fn set_range(&self, distance_cm: f64) {
        self.state
            .lock(|state| state.borrow_mut().range_cm = distance_cm);
    }

    /// Last commanded duty for one wheel
    pub fn wheel_duty(&self, side: Side) -> f32 {
        self.state
            .lock(|state| state.borrow().wheel_duty[side_index(side)])
    }

    /// Last commanded angle for one servo
    pub fn servo_angle(&self, servo: ServoChannel) -> f32 {
        self.state
            .lock(|state| state.borrow().servo_angle[servo_index(servo)])
    }
}

impl Default for SimHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl Hardware for SimHardware {
    fn set_wheel_duty(&self, side: Side, percent: f32) -> Result<()> {
        log::debug!("sim: {side:?} wheel duty {percent:.1}");
        self.state.lock(|state| {
            state.borrow_mut().wheel_duty[side_index(side)] = percent.clamp(-100.0, 100.0);
        });
        Ok(())
    }

    fn set_servo_angle(&self, servo: ServoChannel, degrees: f32) -> Result<()> {
        log::debug!("sim: {servo:?} servo to {degrees:.1} degrees");
        self.state.lock(|state| {
            state.borrow_mut().servo_angle[servo_index(servo)] = degrees;
        });
        Ok(())
    }

    fn read_analog(&self, channel: u8) -> Result<u16> {
        if channel as usize >= 3 {
            return Err(Error::UnknownAnalogChannel(channel));
        }
        Ok(self
            .state
            .lock(|state| state.borrow().analog[channel as usize]))
    }

    fn read_range(&self) -> Result<f64> {
        Ok(self.state.lock(|state| state.borrow().range_cm))
    }

    fn get_calibration(&self, key: &str) -> Result<Option<f64>> {
        Ok(self
            .state
            .lock(|state| state.borrow().calibration.get(key).copied()))
    }

    fn set_calibration(&self, key: &str, value: f64) -> Result<()> {
        self.state.lock(|state| {
            state.borrow_mut().calibration.insert(key.to_string(), value);
        });
        Ok(())
    }
}

fn side_index(side: Side) -> usize {
    match side {
        Side::Left => 0,
        Side::Right => 1,
    }
}

fn servo_index(servo: ServoChannel) -> usize {
    match servo {
        ServoChannel::Steering => 0,
        ServoChannel::CameraPan => 1,
        ServoChannel::CameraTilt => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analog_channels_read_back_what_was_set() {
        let sim = SimHardware::new();
        sim.set_analog(0, 120);
        sim.set_analog(2, 900);
        assert_eq!(sim.read_analog(0).unwrap(), 120);
        assert_eq!(sim.read_analog(1).unwrap(), 0);
        assert_eq!(sim.read_analog(2).unwrap(), 900);
    }

    #[test]
    fn unwired_channel_is_an_error() {
        let sim = SimHardware::new();
        assert!(sim.read_analog(7).is_err());
    }

    #[test]
    fn range_defaults_to_the_sentinel() {
        let sim = SimHardware::new();
        assert_eq!(sim.read_range().unwrap(), MAX_RANGE_CM);
        sim.set_range(42.5);
        assert_eq!(sim.read_range().unwrap(), 42.5);
    }

    #[test]
    fn actuator_commands_are_recorded() {
        let sim = SimHardware::new();
        sim.set_wheel_duty(Side::Left, 55.0).unwrap();
        sim.set_wheel_duty(Side::Right, -55.0).unwrap();
        sim.set_servo_angle(ServoChannel::Steering, 15.0).unwrap();
        assert_eq!(sim.wheel_duty(Side::Left), 55.0);
        assert_eq!(sim.wheel_duty(Side::Right), -55.0);
        assert_eq!(sim.servo_angle(ServoChannel::Steering), 15.0);
    }

    #[test]
    fn calibration_store_round_trips() {
        let sim = SimHardware::new();
        assert_eq!(sim.get_calibration("steering_servo_trim").unwrap(), None);
        sim.set_calibration("steering_servo_trim", -3.5).unwrap();
        assert_eq!(
            sim.get_calibration("steering_servo_trim").unwrap(),
            Some(-3.5)
        );
    }
}

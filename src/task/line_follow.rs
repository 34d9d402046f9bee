//! Line-following interpreter
//!
//! Turns the latest reflectance reading into a steering command.
//!
//! # Direction detection
//! The middle channel sits over the line when the robot is centered, so the
//! two side channels see plain background and their gradients against the
//! middle cancel. Drift puts one side channel onto the line; the ratio of
//! its deviation against the middle channel gives a normalized bias toward
//! that side:
//!
//! - readings of zero are bumped to one so the ratios below stay defined
//! - side gradients within the noise threshold of each other mean straight
//! - otherwise the side with the larger deviation wins:
//!   `right - left > 0` gives `-(mid-right)/(mid+right)`, else
//!   `(mid-left)/(mid+left)`
//! - the result is scaled by a signed sensitivity whose sign encodes line
//!   polarity (brighter or darker than the background)
//!
//! The bias is then scaled to degrees and published as a full steering
//! command at the configured cruise speed.

use embassy_time::Duration;

use crate::system::mailbox::Mailbox;
use crate::system::reflectance::{self, ReflectanceReading};
use crate::system::steering::{self, SteeringCommand};
use crate::system::termination;
use crate::task::scheduled::run_scheduled;

/// Time between interpretations
const INTERPRET_INTERVAL: Duration = Duration::from_millis(50);

/// Task-local failure flag
pub static FAULT: Mailbox<bool> = Mailbox::new();

/// Tuning for the line interpreter
#[derive(Debug, Clone, Copy)]
pub struct LineFollowConfig {
    /// Signed steering sensitivity in [-1, 1]; negative for a line brighter
    /// than the background, positive for a darker one
    pub sensitivity: f32,
    /// Side gradients closer than this count as centered
    pub noise_threshold: i32,
    /// Degrees of steering per unit of bias
    pub angle_scale: f32,
    /// Cruise speed commanded while following
    pub speed: f32,
}

impl Default for LineFollowConfig {
    fn default() -> Self {
        Self {
            sensitivity: -0.5,
            noise_threshold: 10,
            angle_scale: 100.0,
            speed: 50.0,
        }
    }
}

/// Line-following interpreter task
#[embassy_executor::task]
pub async fn line_follow(config: LineFollowConfig) {
    run_scheduled(
        "line_follow",
        INTERPRET_INTERVAL,
        &termination::SHUTDOWN,
        &FAULT,
        move || {
            // Nothing sampled yet: publish nothing and let the arbiter hold
            // its safe default.
            if let Some(reading) = reflectance::latest() {
                let bias = detect_direction(reading, config.noise_threshold, config.sensitivity);
                steering::update(SteeringCommand::new(config.speed, bias * config.angle_scale));
            }
            Ok(())
        },
    )
    .await;
}

/// Computes the normalized steering bias for one reflectance reading
///
/// Total over all integer inputs: the zero substitution happens before any
/// division and the arithmetic is widened past overflow.
pub fn detect_direction(reading: ReflectanceReading, noise_threshold: i32, sensitivity: f32) -> f32 {
    let zero_guard = |x: i32| if x == 0 { 1 } else { x };
    let left = i64::from(zero_guard(reading.left));
    let middle = i64::from(zero_guard(reading.middle));
    let right = i64::from(zero_guard(reading.right));

    if ((left - middle) - (right - middle)).abs() < i64::from(noise_threshold) {
        return 0.0;
    }

    let bias = if right - left > 0 {
        -((middle - right) as f32 / (middle + right) as f32)
    } else {
        (middle - left) as f32 / (middle + left) as f32
    };

    bias * sensitivity.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LineFollowConfig {
        LineFollowConfig::default()
    }

    #[test]
    fn equal_readings_mean_straight() {
        for value in [0, 1, 100, 500, 4095] {
            let reading = ReflectanceReading::new(value, value, value);
            assert_eq!(detect_direction(reading, 10, config().sensitivity), 0.0);
        }
    }

    #[test]
    fn symmetric_deviations_stay_inside_the_noise_threshold() {
        let reading = ReflectanceReading::new(100, 500, 100);
        assert_eq!(detect_direction(reading, 10, config().sensitivity), 0.0);
    }

    #[test]
    fn line_under_the_right_channel_steers_left() {
        let reading = ReflectanceReading::new(50, 500, 900);
        let bias = detect_direction(reading, 10, config().sensitivity);
        assert!(bias < 0.0, "expected negative bias, got {bias}");
    }

    #[test]
    fn line_under_the_left_channel_steers_right() {
        let reading = ReflectanceReading::new(900, 500, 50);
        let bias = detect_direction(reading, 10, config().sensitivity);
        assert!(bias > 0.0, "expected positive bias, got {bias}");
    }

    #[test]
    fn all_dark_readings_are_guarded_against_division_by_zero() {
        let reading = ReflectanceReading::new(0, 0, 0);
        assert_eq!(detect_direction(reading, 10, config().sensitivity), 0.0);

        // One dead channel must not blow up either.
        let reading = ReflectanceReading::new(0, 600, 900);
        let bias = detect_direction(reading, 10, config().sensitivity);
        assert!(bias.is_finite());
    }

    #[test]
    fn sensitivity_sign_selects_line_polarity() {
        let reading = ReflectanceReading::new(50, 500, 900);
        let bright = detect_direction(reading, 10, -0.5);
        let dark = detect_direction(reading, 10, 0.5);
        assert_eq!(bright, -dark);
    }

    #[test]
    fn sensitivity_magnitude_is_limited_to_one() {
        let reading = ReflectanceReading::new(50, 500, 900);
        let clamped = detect_direction(reading, 10, -8.0);
        let unit = detect_direction(reading, 10, -1.0);
        assert_eq!(clamped, unit);
    }

    #[test]
    fn extreme_readings_do_not_overflow() {
        let reading = ReflectanceReading::new(i32::MAX, i32::MIN, i32::MAX);
        let bias = detect_direction(reading, 10, -0.5);
        assert!(!bias.is_nan());
    }
}

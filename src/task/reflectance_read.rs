//! Reflectance sensor source
//!
//! Samples the three ground-facing reflectance channels at a fixed rate and
//! publishes the calibrated reading.
//!
//! # Calibration
//! Each channel carries a dark trim captured with the sensor over plain
//! background; it is subtracted from the raw value and the result floored
//! at zero, so readings compare surfaces rather than channel offsets.
//!
//! # Error handling
//! A failed read substitutes the previous known-good reading (all-dark
//! before the first success) and keeps the task alive; a single bad sample
//! must not take down the pipeline.

use embassy_time::Duration;

use crate::error::Result;
use crate::hal::{Hardware, REFLECTANCE_CHANNELS};
use crate::system::mailbox::Mailbox;
use crate::system::reflectance::{self, ReflectanceReading};
use crate::system::termination;
use crate::task::scheduled::run_scheduled;

/// Time between samples
const READ_INTERVAL: Duration = Duration::from_millis(50);

/// Task-local failure flag
pub static FAULT: Mailbox<bool> = Mailbox::new();

/// Per-channel dark trims subtracted from the raw readings
#[derive(Debug, Clone, Copy, Default)]
pub struct ReflectanceTrims {
    pub left: i32,
    pub middle: i32,
    pub right: i32,
}

/// Reflectance source task
#[embassy_executor::task]
pub async fn reflectance_read(hal: &'static dyn Hardware, trims: ReflectanceTrims) {
    let mut last_good = ReflectanceReading::new(0, 0, 0);
    run_scheduled(
        "reflectance_read",
        READ_INTERVAL,
        &termination::SHUTDOWN,
        &FAULT,
        move || {
            let reading = match sample(hal, trims) {
                Ok(reading) => {
                    last_good = reading;
                    reading
                }
                Err(e) => {
                    log::warn!("reflectance read failed, keeping previous reading: {e}");
                    last_good
                }
            };
            reflectance::update(reading);
            Ok(())
        },
    )
    .await;
}

fn sample(hal: &dyn Hardware, trims: ReflectanceTrims) -> Result<ReflectanceReading> {
    let [left, middle, right] = REFLECTANCE_CHANNELS;
    Ok(ReflectanceReading::new(
        calibrated(hal.read_analog(left)?, trims.left),
        calibrated(hal.read_analog(middle)?, trims.middle),
        calibrated(hal.read_analog(right)?, trims.right),
    ))
}

fn calibrated(raw: u16, trim: i32) -> i32 {
    (i32::from(raw) - trim).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::sim::SimHardware;

    #[test]
    fn trims_are_subtracted_and_floored_at_zero() {
        assert_eq!(calibrated(500, 120), 380);
        assert_eq!(calibrated(100, 120), 0);
        assert_eq!(calibrated(0, 0), 0);
    }

    #[test]
    fn sample_reads_all_three_channels_in_chassis_order() {
        let sim = SimHardware::new();
        sim.set_analog(0, 200);
        sim.set_analog(1, 800);
        sim.set_analog(2, 350);

        let reading = sample(
            &sim,
            ReflectanceTrims {
                left: 50,
                middle: 0,
                right: 400,
            },
        )
        .unwrap();
        assert_eq!(reading, ReflectanceReading::new(150, 800, 0));
    }
}

//! Ground-facing reflectance signal
//!
//! Carries the latest calibrated reading of the three downward-looking
//! reflectance channels. Written by the reflectance source task only.

use crate::system::mailbox::Mailbox;

/// Latest calibrated reflectance reading
pub static READINGS: Mailbox<ReflectanceReading> = Mailbox::new();

/// Publishes a new reading
pub fn update(reading: ReflectanceReading) {
    READINGS.write(reading);
}

/// Returns the most recent reading, if any
pub fn latest() -> Option<ReflectanceReading> {
    READINGS.read()
}

/// One calibrated sample of the three reflectance channels, ordered as
/// mounted on the chassis: left, middle, right
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflectanceReading {
    pub left: i32,
    pub middle: i32,
    pub right: i32,
}

impl ReflectanceReading {
    pub const fn new(left: i32, middle: i32, right: i32) -> Self {
        Self { left, middle, right }
    }
}

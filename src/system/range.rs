//! Forward range signal
//!
//! Carries the latest median-filtered distance to whatever is in front of
//! the robot, in centimeters. Written by the range source task only.

use crate::system::mailbox::Mailbox;

/// Latest filtered distance (cm)
pub static DISTANCE: Mailbox<f64> = Mailbox::new();

/// Distance reported when the ranging sensor times out or has nothing in
/// view (cm)
pub const MAX_RANGE_CM: f64 = 300.0;

/// Publishes a new distance
pub fn update(distance_cm: f64) {
    DISTANCE.write(distance_cm);
}

/// Returns the most recent distance, if any
pub fn latest() -> Option<f64> {
    DISTANCE.read()
}

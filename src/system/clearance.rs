//! Obstacle clearance signal
//!
//! Carries the speed scalar produced by the obstacle-avoidance interpreter:
//! 0 when something is inside the minimum clearance, 1 otherwise. The drive
//! arbiter multiplies the commanded speed by this value, so the scalar can
//! only ever attenuate speed, never increase it.

use crate::system::mailbox::Mailbox;

/// Latest obstacle-avoidance speed scalar
pub static SPEED_SCALAR: Mailbox<f32> = Mailbox::new();

/// Publishes a new speed scalar
pub fn update(scalar: f32) {
    SPEED_SCALAR.write(scalar);
}

/// Returns the most recent speed scalar, if any
pub fn latest() -> Option<f32> {
    SPEED_SCALAR.read()
}

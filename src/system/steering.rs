//! Steering signal
//!
//! Carries the latest desired motion of the chassis: a signed cruise speed
//! and a signed steering angle in degrees. Written by exactly one
//! interpreter per pipeline run, normally the line-following task; a camera
//! perception module can be wired as the writer instead, the drive arbiter
//! does not care who produces the signal.

use crate::system::mailbox::Mailbox;

/// Latest steering command
pub static STEERING: Mailbox<SteeringCommand> = Mailbox::new();

/// Largest steering angle the turning geometry stays valid for (degrees)
pub const MAX_STEER_ANGLE: f32 = 40.0;

/// Publishes a new steering command
pub fn update(command: SteeringCommand) {
    STEERING.write(command);
}

/// Returns the most recent steering command, if any
pub fn latest() -> Option<SteeringCommand> {
    STEERING.read()
}

/// Desired chassis motion
///
/// Positive speed drives forward, negative reverses. The angle sign selects
/// the side the robot turns toward; its magnitude is clamped on
/// construction so every command in flight is kinematically valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringCommand {
    pub speed: f32,
    pub angle: f32,
}

impl SteeringCommand {
    pub fn new(speed: f32, angle: f32) -> Self {
        Self {
            speed,
            angle: angle.clamp(-MAX_STEER_ANGLE, MAX_STEER_ANGLE),
        }
    }

    /// Safe default: no motion, wheels straight
    pub const fn stop() -> Self {
        Self {
            speed: 0.0,
            angle: 0.0,
        }
    }
}

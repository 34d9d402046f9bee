//! Obstacle-avoidance interpreter
//!
//! Maps the latest forward distance to a binary speed scalar: full stop
//! inside the minimum clearance, full speed outside it. The scalar can only
//! attenuate the commanded speed, never raise it, so this pipeline is safe
//! to run beside any steering producer.

use embassy_time::Duration;

use crate::system::clearance;
use crate::system::mailbox::Mailbox;
use crate::system::range;
use crate::system::termination;
use crate::task::scheduled::run_scheduled;

/// Time between interpretations
const INTERPRET_INTERVAL: Duration = Duration::from_millis(50);

/// Task-local failure flag
pub static FAULT: Mailbox<bool> = Mailbox::new();

/// Tuning for the obstacle guard
#[derive(Debug, Clone, Copy)]
pub struct ObstacleGuardConfig {
    /// Distances below this command a stop (cm)
    pub min_clearance_cm: f64,
}

impl Default for ObstacleGuardConfig {
    fn default() -> Self {
        Self {
            min_clearance_cm: 30.0,
        }
    }
}

/// Obstacle-avoidance interpreter task
#[embassy_executor::task]
pub async fn obstacle_guard(config: ObstacleGuardConfig) {
    run_scheduled(
        "obstacle_guard",
        INTERPRET_INTERVAL,
        &termination::SHUTDOWN,
        &FAULT,
        move || {
            if let Some(distance_cm) = range::latest() {
                clearance::update(speed_scalar(distance_cm, config.min_clearance_cm));
            }
            Ok(())
        },
    )
    .await;
}

/// Speed scalar for a measured distance: 0 below the clearance, else 1
pub fn speed_scalar(distance_cm: f64, min_clearance_cm: f64) -> f32 {
    if distance_cm < min_clearance_cm {
        0.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_obstacle_commands_a_stop() {
        assert_eq!(speed_scalar(5.0, 30.0), 0.0);
    }

    #[test]
    fn clear_path_commands_full_speed() {
        assert_eq!(speed_scalar(120.0, 30.0), 1.0);
    }

    #[test]
    fn exactly_at_clearance_keeps_driving() {
        assert_eq!(speed_scalar(30.0, 30.0), 1.0);
    }
}

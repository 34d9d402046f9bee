//! Drive arbitration
//!
//! The single serialization point between the control pipelines and the
//! drivetrain. Line following and obstacle avoidance both want a say in how
//! fast the robot moves; letting each call the hardware directly is a race
//! where the last writer wins by accident. Instead both publish into their
//! own mailboxes and this task, the only one allowed to touch the
//! drivetrain, composes them deterministically every cycle:
//!
//! - obstacle avoidance contributes a speed scalar in [0, 1] that
//!   multiplies the commanded speed, so it can only slow the robot down
//! - line following (or a camera perception module wired in its place)
//!   contributes the full steering command, whose angle passes through
//!   untouched
//!
//! # Startup defaults
//! A pipeline that has not produced a value yet is no reason to misbehave:
//! a missing speed scalar means no attenuation, a missing steering command
//! means a safe stop.
//!
//! # Failure policy
//! An actuator that rejects a command is degraded to commanding zero power
//! on both wheels; failing toward "stopped" beats failing toward
//! "uncontrolled". When the loop exits, however it exits, the drivetrain is
//! stopped and the steering recentered before the hardware handle is let
//! go.

use embassy_time::Duration;

use crate::error::Result;
use crate::hal::{Hardware, Side};
use crate::system::calibration::CalibrationState;
use crate::system::clearance;
use crate::system::kinematics::{self, DriveGeometry, TurnModel};
use crate::system::mailbox::Mailbox;
use crate::system::servos;
use crate::system::steering::{self, SteeringCommand};
use crate::system::termination;
use crate::task::scheduled::run_scheduled;

/// Time between actuation cycles
const ACTUATE_INTERVAL: Duration = Duration::from_millis(50);

/// Task-local failure flag
pub static FAULT: Mailbox<bool> = Mailbox::new();

/// Tuning for the arbiter's kinematics
#[derive(Debug, Clone, Copy, Default)]
pub struct ArbiterConfig {
    pub turn_model: TurnModel,
    pub geometry: DriveGeometry,
}

/// Drive arbitration task, the only caller of the drivetrain interface
#[embassy_executor::task]
pub async fn drive_arbiter(
    hal: &'static dyn Hardware,
    calibration: CalibrationState,
    config: ArbiterConfig,
) {
    run_scheduled(
        "drive_arbiter",
        ACTUATE_INTERVAL,
        &termination::SHUTDOWN,
        &FAULT,
        move || {
            let command = combine(steering::latest(), clearance::latest());
            apply(hal, &calibration, config, command);
            Ok(())
        },
    )
    .await;

    // However the loop ended, leave the drivetrain stopped and the wheels
    // pointing straight.
    halt(hal);
    if let Err(e) = servos::set_steering_angle(hal, &calibration, 0.0) {
        log::error!("failed to recenter steering on exit: {e}");
    }
}

/// Composes the concurrent pipeline outputs into one chassis command
pub fn combine(steering: Option<SteeringCommand>, speed_scalar: Option<f32>) -> SteeringCommand {
    let steering = steering.unwrap_or(SteeringCommand::stop());
    let scalar = speed_scalar.unwrap_or(1.0);
    SteeringCommand::new(steering.speed * scalar, steering.angle)
}

/// Actuates one composed command, degrading failures to a stop
fn apply(
    hal: &dyn Hardware,
    calibration: &CalibrationState,
    config: ArbiterConfig,
    command: SteeringCommand,
) {
    if let Err(e) = actuate(hal, calibration, config, command) {
        log::error!("actuation failed, commanding stop: {e}");
        halt(hal);
    }
}

fn actuate(
    hal: &dyn Hardware,
    calibration: &CalibrationState,
    config: ArbiterConfig,
    command: SteeringCommand,
) -> Result<()> {
    servos::set_steering_angle(hal, calibration, command.angle)?;
    let wheels = kinematics::apply_calibration(
        kinematics::mix(
            command.speed,
            command.angle,
            config.turn_model,
            &config.geometry,
        ),
        calibration,
    );
    hal.set_wheel_duty(Side::Left, wheels.left)?;
    hal.set_wheel_duty(Side::Right, wheels.right)
}

fn halt(hal: &dyn Hardware) {
    for side in [Side::Left, Side::Right] {
        if let Err(e) = hal.set_wheel_duty(side, 0.0) {
            log::error!("failed to stop {side:?} wheel: {e}");
        }
    }
}

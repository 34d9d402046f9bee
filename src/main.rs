//! Robot control entry point
//!
//! Wires the line-following and obstacle-avoidance pipelines against the
//! simulated hardware and runs them for a fixed duration:
//!
//! reflectance source -> line interpreter -> steering mailbox
//! range source       -> obstacle guard   -> speed-scalar mailbox
//! both mailboxes     -> drive arbiter    -> drivetrain
//!
//! The watchdog requests cooperative shutdown when the run duration
//! elapses; every task observes it within one polling interval.

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

use line_rover::hal::sim::SimHardware;
use line_rover::hal::Hardware;
use line_rover::system::calibration::CalibrationState;
use line_rover::system::termination;
use line_rover::task::{
    drive_arbiter::{drive_arbiter, ArbiterConfig},
    line_follow::{line_follow, LineFollowConfig},
    obstacle_guard::{obstacle_guard, ObstacleGuardConfig},
    range_measure::range_measure,
    reflectance_read::{reflectance_read, ReflectanceTrims},
    shutdown_timer::shutdown_timer,
};

/// Simulated robot hardware backing the demo pipeline
static SIM: SimHardware = SimHardware::new();

/// How long the demo runs before cooperative shutdown
const RUN_DURATION: Duration = Duration::from_secs(10);

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Scene: a bright line slightly right of center, nothing in range.
    SIM.set_analog(0, 240);
    SIM.set_analog(1, 820);
    SIM.set_analog(2, 460);
    SIM.set_range(120.0);

    let hal: &'static dyn Hardware = &SIM;

    // Refuse to drive with nonsensical trims.
    let calibration = match CalibrationState::load(hal) {
        Ok(calibration) => calibration,
        Err(e) => {
            log::error!("refusing to start: {e}");
            std::process::exit(1);
        }
    };

    spawner
        .spawn(reflectance_read(hal, ReflectanceTrims::default()))
        .unwrap();
    spawner.spawn(range_measure(hal)).unwrap();
    spawner
        .spawn(line_follow(LineFollowConfig::default()))
        .unwrap();
    spawner
        .spawn(obstacle_guard(ObstacleGuardConfig::default()))
        .unwrap();
    spawner
        .spawn(drive_arbiter(hal, calibration, ArbiterConfig::default()))
        .unwrap();
    spawner.spawn(shutdown_timer(RUN_DURATION)).unwrap();
    spawner.spawn(exit_after_shutdown()).unwrap();
}

/// Ends the process once every task has had a full polling interval to
/// observe the termination signal
#[embassy_executor::task]
async fn exit_after_shutdown() {
    while !termination::shutdown_requested() {
        Timer::after(Duration::from_millis(100)).await;
    }
    Timer::after(Duration::from_millis(250)).await;
    log::info!("all tasks stopped, exiting");
    std::process::exit(0);
}

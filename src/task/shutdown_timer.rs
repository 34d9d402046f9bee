//! Bounded-run watchdog
//!
//! Requests cooperative shutdown once the configured run duration elapses.
//! Every scheduled task observes the signal within one polling interval.

use embassy_time::{Duration, Timer};

use crate::system::termination;

/// Watchdog task
#[embassy_executor::task]
pub async fn shutdown_timer(run_duration: Duration) {
    Timer::after(run_duration).await;
    log::info!("run duration elapsed, requesting shutdown");
    termination::request_shutdown();
}

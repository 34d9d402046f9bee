//! Forward range source
//!
//! Samples the forward-facing ranging sensor at a fixed rate, median-filters
//! the result and publishes the distance.
//!
//! # Signal processing
//! A moving median over 3 samples knocks out the single-ping outliers these
//! sensors produce without adding much latency.
//!
//! # Error handling
//! The hardware collaborator enforces its own read timeout and reports a
//! timed-out ping as the maximum-range sentinel, so this task never blocks
//! on a lost echo. A hard read failure substitutes the previous known-good
//! distance (maximum range before the first success) and keeps the task
//! alive.

use embassy_time::Duration;
use moving_median::MovingMedian;

use crate::hal::Hardware;
use crate::system::mailbox::Mailbox;
use crate::system::range::{self, MAX_RANGE_CM};
use crate::system::termination;
use crate::task::scheduled::run_scheduled;

/// Time between measurements
const MEASUREMENT_INTERVAL: Duration = Duration::from_millis(50);

/// Median filter window (3 samples balances outlier rejection vs. latency)
const MEDIAN_WINDOW_SIZE: usize = 3;

/// Task-local failure flag
pub static FAULT: Mailbox<bool> = Mailbox::new();

/// Range source task
#[embassy_executor::task]
pub async fn range_measure(hal: &'static dyn Hardware) {
    let mut median_filter = MovingMedian::<f64, MEDIAN_WINDOW_SIZE>::new();
    let mut last_good = MAX_RANGE_CM;
    run_scheduled(
        "range_measure",
        MEASUREMENT_INTERVAL,
        &termination::SHUTDOWN,
        &FAULT,
        move || {
            let distance = match hal.read_range() {
                Ok(distance_cm) => {
                    last_good = distance_cm.max(0.0);
                    last_good
                }
                Err(e) => {
                    log::warn!("range read failed, keeping previous distance: {e}");
                    last_good
                }
            };
            median_filter.add_value(distance);
            range::update(median_filter.median());
            Ok(())
        },
    )
    .await;
}

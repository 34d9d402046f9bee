//! Fixed-period task execution
//!
//! Every pipeline stage runs the same loop: check the stop signal, do one
//! unit of work, sleep one period. Checking before sleeping bounds the
//! worst-case shutdown latency to one period plus one work invocation.
//!
//! # Failure isolation
//! A work invocation that returns an error terminates only its own task:
//! the error is logged, the task-local fault flag is raised, and siblings
//! keep running. A supervising layer watching the fault flag may decide to
//! request shutdown; this loop never does so on its own.

use embassy_time::{Duration, Timer};

use crate::error::Result;
use crate::system::mailbox::Mailbox;

/// Runs `work` every `period` until `stop` reads `true` or `work` fails
pub async fn run_scheduled<W>(
    name: &'static str,
    period: Duration,
    stop: &Mailbox<bool>,
    fault: &Mailbox<bool>,
    mut work: W,
) where
    W: FnMut() -> Result<()>,
{
    log::info!("{name} started");
    loop {
        if stop.read().unwrap_or(false) {
            log::info!("{name} observed shutdown, exiting");
            return;
        }
        if let Err(e) = work() {
            log::error!("{name} failed: {e}");
            fault.write(true);
            return;
        }
        Timer::after(period).await;
    }
}

//! Cooperative shutdown signal
//!
//! A single boolean mailbox observed by every scheduled task between
//! iterations. Writing `true` stops all tasks within one polling interval
//! plus one work invocation. The value is monotone for the lifetime of a
//! pipeline run: there is no API to write `false`.
//!
//! Any task may request shutdown, as may the run-duration watchdog. This is
//! the one mailbox with many writers by design.

use crate::system::mailbox::Mailbox;

/// Signal observed by every task's run loop
pub static SHUTDOWN: Mailbox<bool> = Mailbox::new();

/// Requests cooperative shutdown of all tasks
pub fn request_shutdown() {
    SHUTDOWN.write(true);
}

/// Returns whether shutdown has been requested; empty reads as `false`
pub fn shutdown_requested() -> bool {
    SHUTDOWN.read().unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requesting_twice_is_the_same_as_once() {
        request_shutdown();
        assert!(shutdown_requested());
        request_shutdown();
        assert!(shutdown_requested());
    }
}

//! Single-slot mailboxes for inter-task signals
//!
//! A `Mailbox` holds the most recent value of one typed signal. Writes
//! overwrite unconditionally; reads never block and return the last written
//! value, or `None` before the first write. There is no queuing and no
//! backpressure, which is the right trade for control loops sampling a
//! continuously varying physical quantity: a slow reader skips stale values,
//! a fast reader sees the same value twice.
//!
//! # Wiring rules
//! - Exactly one writer task per mailbox. Fan-out to any number of readers
//!   is fine; fan-in is reserved for the termination signal and the drive
//!   arbiter's inputs, which are designed for it.
//! - Mailboxes are `const`-constructible so they can live in statics next to
//!   the signal type they carry, one module per signal.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// Shared cell carrying the most recent value of one signal
pub struct Mailbox<T> {
    slot: Mutex<CriticalSectionRawMutex, RefCell<Option<T>>>,
}

impl<T: Clone> Mailbox<T> {
    /// Creates an empty mailbox
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(RefCell::new(None)),
        }
    }

    /// Replaces the stored value, atomically with respect to concurrent reads
    pub fn write(&self, value: T) {
        self.slot.lock(|slot| {
            slot.replace(Some(value));
        });
    }

    /// Returns the most recent value, or `None` if nothing was written yet
    pub fn read(&self) -> Option<T> {
        self.slot.lock(|slot| slot.borrow().clone())
    }
}

impl<T: Clone> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_until_first_write() {
        let mailbox: Mailbox<i32> = Mailbox::new();
        assert_eq!(mailbox.read(), None);
    }

    #[test]
    fn read_returns_last_written_value() {
        let mailbox = Mailbox::new();
        mailbox.write(42);
        assert_eq!(mailbox.read(), Some(42));
    }

    #[test]
    fn writes_overwrite() {
        let mailbox = Mailbox::new();
        mailbox.write(1);
        mailbox.write(2);
        mailbox.write(3);
        assert_eq!(mailbox.read(), Some(3));
    }

    #[test]
    fn reads_do_not_consume() {
        let mailbox = Mailbox::new();
        mailbox.write((50.0_f32, -12.5_f32));
        assert_eq!(mailbox.read(), Some((50.0, -12.5)));
        assert_eq!(mailbox.read(), Some((50.0, -12.5)));
    }

    #[test]
    fn shared_across_threads() {
        static SHARED: Mailbox<u64> = Mailbox::new();

        let writer = std::thread::spawn(|| {
            for i in 0..1000 {
                SHARED.write(i);
            }
        });
        // Readers must only ever observe fully written values.
        while !writer.is_finished() {
            if let Some(v) = SHARED.read() {
                assert!(v < 1000);
            }
        }
        writer.join().unwrap();
        assert_eq!(SHARED.read(), Some(999));
    }
}

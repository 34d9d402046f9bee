//! Control core for a small line-following, obstacle-avoiding wheeled robot
//!
//! The crate is organized as a set of cooperating fixed-period tasks that
//! communicate through single-slot mailboxes:
//!
//! - sources read physical sensors and publish calibrated readings
//! - interpreters derive steering and clearance signals from them
//! - the drive arbiter composes the concurrent control outputs and is the
//!   only task allowed to command the drivetrain
//!
//! Hardware access goes through the [`hal::Hardware`] capability trait;
//! [`hal::sim::SimHardware`] stands in when no robot is attached.

pub mod error;
pub mod hal;
pub mod system;
pub mod task;

// Re-export commonly used types
pub use error::{Error, Result};
pub use hal::Hardware;

//! Core system components for robot operation
pub mod calibration;
pub mod clearance;
pub mod kinematics;
pub mod mailbox;
pub mod range;
pub mod reflectance;
pub mod servos;
pub mod steering;
pub mod termination;

//! Flight Watch: scheduled flight status monitor.
//!
//! A library for polling a flight tracking page on a schedule, detecting
//! meaningful changes between successive snapshots, and ending the run
//! according to independent stopping rules.

pub mod config;
pub mod flight;
pub mod monitor;
pub mod report;
pub mod source;
pub mod time;

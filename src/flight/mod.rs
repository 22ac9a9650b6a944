//! Flight data model.
//!
//! This module provides types for:
//! - Identifying and scheduling a monitored flight ([`TargetId`], [`Target`])
//! - Representing one observation of its state ([`Snapshot`])
//! - Landing times tagged as actual or estimated ([`LandingTime`], [`LandingKind`])

mod snapshot;
mod target;

pub use snapshot::{LandingKind, LandingTime, Snapshot};
pub use target::{MAX_LEAD_TIME, Target, TargetId, parse_civil_time};

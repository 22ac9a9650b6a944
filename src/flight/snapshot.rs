//! One observation of a flight's state.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};

/// Whether a landing time was observed or is a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandingKind {
    /// The aircraft has landed at this time.
    Actual,
    /// The tracker's current forecast.
    Estimated,
}

/// A landing time tagged with its [`LandingKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandingTime {
    /// Civil time, minute precision.
    pub time: NaiveTime,
    /// Actual or estimated.
    pub kind: LandingKind,
}

impl LandingTime {
    /// Creates an actual landing time.
    #[must_use]
    pub const fn actual(time: NaiveTime) -> Self {
        Self {
            time,
            kind: LandingKind::Actual,
        }
    }

    /// Creates an estimated landing time.
    #[must_use]
    pub const fn estimated(time: NaiveTime) -> Self {
        Self {
            time,
            kind: LandingKind::Estimated,
        }
    }

    /// Returns true if this is an observed landing.
    #[must_use]
    pub const fn is_actual(&self) -> bool {
        matches!(self.kind, LandingKind::Actual)
    }
}

impl fmt::Display for LandingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LandingKind::Actual => write!(f, "{}", self.time.format("%H:%M")),
            LandingKind::Estimated => write!(f, "{} (est)", self.time.format("%H:%M")),
        }
    }
}

/// A timestamped record of the fields observed for a flight.
///
/// Snapshots are immutable once produced and ordered by `fetched_at`.
/// Every observed field is optional: the tracker omits what it does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// When this snapshot was fetched.
    pub fetched_at: DateTime<FixedOffset>,
    /// Tracker-specific flight identifier.
    pub flight_id: Option<String>,
    /// Actual departure time.
    pub takeoff: Option<NaiveTime>,
    /// Scheduled departure time.
    pub takeoff_scheduled: Option<NaiveTime>,
    /// Actual or estimated arrival time.
    pub landing: Option<LandingTime>,
    /// Scheduled arrival time.
    pub landing_scheduled: Option<NaiveTime>,
    /// Coarse status string (e.g. "En Route", "Landed").
    pub status: Option<String>,
    /// Origin airport.
    pub origin: Option<String>,
    /// Destination airport.
    pub destination: Option<String>,
    /// Equipment description.
    pub aircraft: Option<String>,
}

impl Snapshot {
    /// Creates an empty snapshot fetched at the given time.
    #[must_use]
    pub const fn new(fetched_at: DateTime<FixedOffset>) -> Self {
        Self {
            fetched_at,
            flight_id: None,
            takeoff: None,
            takeoff_scheduled: None,
            landing: None,
            landing_scheduled: None,
            status: None,
            origin: None,
            destination: None,
            aircraft: None,
        }
    }

    /// Sets the flight identifier.
    #[must_use]
    pub fn with_flight_id(mut self, flight_id: impl Into<String>) -> Self {
        self.flight_id = Some(flight_id.into());
        self
    }

    /// Sets the actual departure time.
    #[must_use]
    pub const fn with_takeoff(mut self, time: NaiveTime) -> Self {
        self.takeoff = Some(time);
        self
    }

    /// Sets the scheduled departure time.
    #[must_use]
    pub const fn with_takeoff_scheduled(mut self, time: NaiveTime) -> Self {
        self.takeoff_scheduled = Some(time);
        self
    }

    /// Sets the arrival time.
    #[must_use]
    pub const fn with_landing(mut self, landing: LandingTime) -> Self {
        self.landing = Some(landing);
        self
    }

    /// Sets the scheduled arrival time.
    #[must_use]
    pub const fn with_landing_scheduled(mut self, time: NaiveTime) -> Self {
        self.landing_scheduled = Some(time);
        self
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets origin and destination.
    #[must_use]
    pub fn with_route(mut self, origin: impl Into<String>, destination: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self.destination = Some(destination.into());
        self
    }

    /// Sets the equipment description.
    #[must_use]
    pub fn with_aircraft(mut self, aircraft: impl Into<String>) -> Self {
        self.aircraft = Some(aircraft.into());
        self
    }

    /// Returns true if the aircraft is reported as landed (actual landing time known).
    #[must_use]
    pub fn has_landed(&self) -> bool {
        self.landing.is_some_and(|l| l.is_actual())
    }

    /// Fills every field missing from `self` with its value in `earlier`.
    ///
    /// The result carries the last known value of each field, stamped with
    /// `self.fetched_at`. A field that drops out of one fetch therefore keeps
    /// its value for the next comparison.
    #[must_use]
    pub fn merged_over(self, earlier: &Self) -> Self {
        Self {
            fetched_at: self.fetched_at,
            flight_id: self.flight_id.or_else(|| earlier.flight_id.clone()),
            takeoff: self.takeoff.or(earlier.takeoff),
            takeoff_scheduled: self.takeoff_scheduled.or(earlier.takeoff_scheduled),
            landing: self.landing.or(earlier.landing),
            landing_scheduled: self.landing_scheduled.or(earlier.landing_scheduled),
            status: self.status.or_else(|| earlier.status.clone()),
            origin: self.origin.or_else(|| earlier.origin.clone()),
            destination: self.destination.or_else(|| earlier.destination.clone()),
            aircraft: self.aircraft.or_else(|| earlier.aircraft.clone()),
        }
    }
}

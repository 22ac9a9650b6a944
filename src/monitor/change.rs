//! Flight change detection types and functions.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::flight::Snapshot;

/// Placeholder rendered for a previous value that was never observed.
pub const UNKNOWN: &str = "unknown";

/// A compared snapshot field.
///
/// Declaration order is the order in which changes are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Actual departure time.
    Takeoff,
    /// Scheduled departure time.
    TakeoffScheduled,
    /// Actual or estimated arrival time.
    Landing,
    /// Scheduled arrival time.
    LandingScheduled,
    /// Coarse status.
    Status,
    /// Origin airport.
    Origin,
    /// Destination airport.
    Destination,
}

impl Field {
    /// Returns the machine-readable field name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Takeoff => "takeoff",
            Self::TakeoffScheduled => "takeoff_scheduled",
            Self::Landing => "landing",
            Self::LandingScheduled => "landing_scheduled",
            Self::Status => "status",
            Self::Origin => "origin",
            Self::Destination => "destination",
        }
    }

    /// Returns a human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Takeoff => "Takeoff",
            Self::TakeoffScheduled => "Takeoff (scheduled)",
            Self::Landing => "Landing",
            Self::LandingScheduled => "Landing (scheduled)",
            Self::Status => "Status",
            Self::Origin => "Origin",
            Self::Destination => "Destination",
        }
    }

    /// Reads this field's comparable value from a snapshot.
    ///
    /// Times compare at minute precision. Landing compares its time only,
    /// so an estimate confirmed as actual at the same minute is not a change.
    #[must_use]
    pub fn read(self, snapshot: &Snapshot) -> Option<String> {
        match self {
            Self::Takeoff => snapshot.takeoff.map(hh_mm),
            Self::TakeoffScheduled => snapshot.takeoff_scheduled.map(hh_mm),
            Self::Landing => snapshot.landing.map(|l| hh_mm(l.time)),
            Self::LandingScheduled => snapshot.landing_scheduled.map(hh_mm),
            Self::Status => snapshot.status.clone(),
            Self::Origin => snapshot.origin.clone(),
            Self::Destination => snapshot.destination.clone(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn hh_mm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Which fields the detector compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSet {
    /// Times and status.
    #[default]
    Core,
    /// Times, status, origin and destination.
    WithRoute,
}

const CORE_FIELDS: [Field; 5] = [
    Field::Takeoff,
    Field::TakeoffScheduled,
    Field::Landing,
    Field::LandingScheduled,
    Field::Status,
];

const ROUTE_FIELDS: [Field; 7] = [
    Field::Takeoff,
    Field::TakeoffScheduled,
    Field::Landing,
    Field::LandingScheduled,
    Field::Status,
    Field::Origin,
    Field::Destination,
];

impl FieldSet {
    /// Returns the compared fields in reporting order.
    #[must_use]
    pub const fn fields(self) -> &'static [Field] {
        match self {
            Self::Core => &CORE_FIELDS,
            Self::WithRoute => &ROUTE_FIELDS,
        }
    }
}

/// A single field change between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    /// The field that changed.
    pub field: Field,
    /// The previous value, or `None` if it was never observed.
    pub previous: Option<String>,
    /// The new value.
    pub current: String,
    /// Fetch time of the snapshot that carried the new value.
    pub detected_at: DateTime<FixedOffset>,
}

impl Change {
    /// Creates a new change event.
    #[must_use]
    pub fn new(
        field: Field,
        previous: Option<String>,
        current: impl Into<String>,
        detected_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            field,
            previous,
            current: current.into(),
            detected_at,
        }
    }

    /// Returns the previous value, or [`UNKNOWN`].
    #[must_use]
    pub fn previous_or_unknown(&self) -> &str {
        self.previous.as_deref().unwrap_or(UNKNOWN)
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {}",
            self.field.label(),
            self.previous_or_unknown(),
            self.current
        )
    }
}

/// Compares two snapshots and returns the changed fields.
///
/// This is a pure function. A change is reported for a field iff its value
/// in `current` is known and differs from `previous`. A value that becomes
/// unknown is never reported; once observed, a field is only reported again
/// when it changes to a new known value.
///
/// # Arguments
///
/// * `previous` - The last known-good snapshot, or `None` for the baseline
/// * `current` - The newly fetched snapshot
/// * `fields` - Which fields to compare
///
/// # Returns
///
/// Changes in the fixed order of [`FieldSet::fields`], each stamped with
/// `current.fetched_at`. Empty when `previous` is `None`.
#[must_use]
pub fn detect(previous: Option<&Snapshot>, current: &Snapshot, fields: FieldSet) -> Vec<Change> {
    let Some(previous) = previous else {
        return Vec::new();
    };

    fields
        .fields()
        .iter()
        .filter_map(|&field| {
            let new_value = field.read(current)?;
            let old_value = field.read(previous);

            (old_value.as_deref() != Some(new_value.as_str()))
                .then(|| Change::new(field, old_value, new_value, current.fetched_at))
        })
        .collect()
}

#[cfg(test)]
#[path = "change_tests.rs"]
mod tests;

//! Start-time resolution for a scheduled target.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveTime, TimeDelta};

use crate::flight::Target;

/// How long after today's scheduled event time it still counts as today's.
///
/// Past this, the event is taken to be tomorrow's occurrence (the schedule
/// crosses midnight relative to invocation time).
pub const ROLL_FORWARD_THRESHOLD: Duration = Duration::from_secs(60);

/// When to begin polling for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartPlan {
    /// The resolved scheduled event time.
    pub event_at: DateTime<FixedOffset>,
    /// `event_at - lead_time`.
    pub start_at: DateTime<FixedOffset>,
    /// Whether the event was moved to the next civil day.
    pub rolled_forward: bool,
}

impl StartPlan {
    /// Resolves the plan for `target` as seen at `now`.
    ///
    /// The scheduled time is placed on `now`'s civil date. If that event is
    /// more than [`ROLL_FORWARD_THRESHOLD`] in the past it is moved one day
    /// forward. A `start_at` already in the past is not rolled: it means the
    /// lead window has begun and polling should start immediately.
    ///
    /// A target without a scheduled time is due at `now`.
    #[must_use]
    pub fn resolve(target: &Target, now: DateTime<FixedOffset>) -> Self {
        let Some(scheduled) = target.scheduled else {
            return Self {
                event_at: now,
                start_at: now,
                rolled_forward: false,
            };
        };

        let mut event_at = civil_on_date_of(now, scheduled);
        let mut rolled_forward = false;

        if now - event_at > threshold() {
            event_at += TimeDelta::days(1);
            rolled_forward = true;
        }

        // Lead time is bounded by `MAX_LEAD_TIME`, so conversion cannot fail.
        let lead = TimeDelta::from_std(target.lead_time).unwrap_or(TimeDelta::zero());

        Self {
            event_at,
            start_at: event_at - lead,
            rolled_forward,
        }
    }

    /// Returns true once polling should be running.
    #[must_use]
    pub fn is_due(&self, now: DateTime<FixedOffset>) -> bool {
        now >= self.start_at
    }

    /// Returns how long to wait from `now` (zero when due).
    #[must_use]
    pub fn wait_from(&self, now: DateTime<FixedOffset>) -> Duration {
        (self.start_at - now).to_std().unwrap_or(Duration::ZERO)
    }
}

fn threshold() -> TimeDelta {
    TimeDelta::seconds(i64::try_from(ROLL_FORWARD_THRESHOLD.as_secs()).unwrap_or(i64::MAX))
}

/// Places a civil time on the same civil date as `now`, in `now`'s offset.
fn civil_on_date_of(now: DateTime<FixedOffset>, time: NaiveTime) -> DateTime<FixedOffset> {
    let offset = *now.offset();
    let local = now.date_naive().and_time(time);
    let utc = local - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(utc, offset)
}

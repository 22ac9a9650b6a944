//! Tests for flight change detection.

use super::*;
use crate::flight::LandingTime;
use chrono::TimeZone;

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn fetched(minute: u32) -> DateTime<FixedOffset> {
    FixedOffset::west_opt(3 * 3600)
        .unwrap()
        .with_ymd_and_hms(2026, 3, 10, 14, minute, 0)
        .unwrap()
}

/// A fully populated en-route snapshot.
fn en_route(minute: u32) -> Snapshot {
    Snapshot::new(fetched(minute))
        .with_takeoff(at(13, 5))
        .with_takeoff_scheduled(at(13, 0))
        .with_landing(LandingTime::estimated(at(14, 30)))
        .with_landing_scheduled(at(14, 30))
        .with_status("En Route")
        .with_route("Campinas", "Belo Horizonte")
        .with_aircraft("Embraer Phenom 300")
}

mod field {
    use super::*;

    #[test]
    fn names_are_snake_case() {
        assert_eq!(Field::TakeoffScheduled.name(), "takeoff_scheduled");
        assert_eq!(Field::Landing.to_string(), "landing");
    }

    #[test]
    fn serializes_with_name() {
        let json = serde_json::to_string(&Field::LandingScheduled).unwrap();
        assert_eq!(json, "\"landing_scheduled\"");
    }

    #[test]
    fn landing_reads_time_only() {
        let snapshot = Snapshot::new(fetched(0)).with_landing(LandingTime::estimated(at(14, 32)));
        assert_eq!(Field::Landing.read(&snapshot).as_deref(), Some("14:32"));
    }

    #[test]
    fn missing_field_reads_none() {
        let snapshot = Snapshot::new(fetched(0));
        for field in FieldSet::WithRoute.fields() {
            assert!(field.read(&snapshot).is_none(), "{field} should be unknown");
        }
    }
}

mod field_set {
    use super::*;

    #[test]
    fn core_excludes_route() {
        let fields = FieldSet::Core.fields();
        assert_eq!(fields.len(), 5);
        assert!(!fields.contains(&Field::Origin));
        assert!(!fields.contains(&Field::Destination));
    }

    #[test]
    fn with_route_appends_route_fields() {
        let fields = FieldSet::WithRoute.fields();
        assert_eq!(&fields[..5], FieldSet::Core.fields());
        assert_eq!(&fields[5..], &[Field::Origin, Field::Destination]);
    }

    #[test]
    fn default_is_core() {
        assert_eq!(FieldSet::default(), FieldSet::Core);
    }
}

mod change {
    use super::*;

    #[test]
    fn unknown_previous_renders_placeholder() {
        let change = Change::new(Field::Landing, None, "14:32", fetched(0));
        assert_eq!(change.previous_or_unknown(), UNKNOWN);
        assert_eq!(change.to_string(), "Landing: unknown -> 14:32");
    }

    #[test]
    fn known_previous_renders_value() {
        let change = Change::new(
            Field::Status,
            Some("En Route".to_string()),
            "Landed",
            fetched(0),
        );
        assert_eq!(change.to_string(), "Status: En Route -> Landed");
    }
}

mod detect {
    use super::*;

    #[test]
    fn baseline_yields_no_changes() {
        assert!(detect(None, &en_route(0), FieldSet::WithRoute).is_empty());
        assert!(detect(None, &Snapshot::new(fetched(0)), FieldSet::Core).is_empty());
    }

    #[test]
    fn identical_snapshots_yield_no_changes() {
        let changes = detect(Some(&en_route(0)), &en_route(1), FieldSet::WithRoute);
        assert!(changes.is_empty());
    }

    #[test]
    fn identical_empty_snapshots_yield_no_changes() {
        let a = Snapshot::new(fetched(0));
        let b = Snapshot::new(fetched(1));
        assert!(detect(Some(&a), &b, FieldSet::WithRoute).is_empty());
    }

    #[test]
    fn status_transition_is_single_change() {
        let previous = en_route(0);
        let current = en_route(1).with_status("Landed");

        let changes = detect(Some(&previous), &current, FieldSet::Core);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, Field::Status);
        assert_eq!(changes[0].previous.as_deref(), Some("En Route"));
        assert_eq!(changes[0].current, "Landed");
        assert_eq!(changes[0].detected_at, fetched(1));
    }

    #[test]
    fn known_to_unknown_is_never_reported() {
        let previous = en_route(0);
        let current = Snapshot::new(fetched(1));

        assert!(detect(Some(&previous), &current, FieldSet::WithRoute).is_empty());
    }

    #[test]
    fn unknown_to_known_is_reported_with_unknown_previous() {
        let previous = Snapshot::new(fetched(0)).with_status("En Route");
        let current = previous
            .clone()
            .with_landing(LandingTime::estimated(at(14, 32)));

        let changes = detect(Some(&previous), &current, FieldSet::Core);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, Field::Landing);
        assert!(changes[0].previous.is_none());
        assert_eq!(changes[0].current, "14:32");
    }

    #[test]
    fn estimate_confirmed_at_same_minute_is_not_a_change() {
        let previous = Snapshot::new(fetched(0)).with_landing(LandingTime::estimated(at(14, 32)));
        let current = Snapshot::new(fetched(1)).with_landing(LandingTime::actual(at(14, 32)));

        assert!(detect(Some(&previous), &current, FieldSet::Core).is_empty());
    }

    #[test]
    fn changes_follow_fixed_field_order() {
        let previous = en_route(0);
        let current = en_route(1)
            .with_status("Landed")
            .with_landing(LandingTime::actual(at(14, 41)))
            .with_takeoff(at(13, 7));

        let changes = detect(Some(&previous), &current, FieldSet::Core);
        let fields: Vec<_> = changes.iter().map(|c| c.field).collect();

        assert_eq!(fields, vec![Field::Takeoff, Field::Landing, Field::Status]);
    }

    #[test]
    fn route_changes_need_route_field_set() {
        let previous = en_route(0);
        let current = en_route(1).with_route("Campinas", "Confins");

        assert!(detect(Some(&previous), &current, FieldSet::Core).is_empty());

        let changes = detect(Some(&previous), &current, FieldSet::WithRoute);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, Field::Destination);
        assert_eq!(changes[0].previous_or_unknown(), "Belo Horizonte");
    }

    #[test]
    fn aircraft_and_flight_id_are_not_compared() {
        let previous = en_route(0).with_flight_id("A");
        let current = en_route(1).with_flight_id("B").with_aircraft("Cessna 208");

        assert!(detect(Some(&previous), &current, FieldSet::WithRoute).is_empty());
    }

    #[test]
    fn detection_is_deterministic() {
        let previous = en_route(0);
        let current = en_route(1).with_status("Landed");

        let first = detect(Some(&previous), &current, FieldSet::WithRoute);
        let second = detect(Some(&previous), &current, FieldSet::WithRoute);

        assert_eq!(first, second);
    }
}

mod flicker {
    use super::*;

    fn landing(minute: u32, time: Option<NaiveTime>) -> Snapshot {
        let snapshot = Snapshot::new(fetched(minute)).with_status("En Route");
        match time {
            Some(time) => snapshot.with_landing(LandingTime::estimated(time)),
            None => snapshot,
        }
    }

    /// Runs `detect` over a sequence, carrying last known values forward.
    fn detect_sequence(snapshots: Vec<Snapshot>) -> Vec<Change> {
        let mut baseline: Option<Snapshot> = None;
        let mut changes = Vec::new();

        for snapshot in snapshots {
            changes.extend(detect(baseline.as_ref(), &snapshot, FieldSet::Core));
            baseline = Some(match baseline {
                Some(earlier) => snapshot.merged_over(&earlier),
                None => snapshot,
            });
        }

        changes
    }

    #[test]
    fn known_then_missing_then_same_is_silent() {
        let changes = detect_sequence(vec![
            landing(0, Some(at(14, 32))),
            landing(1, None),
            landing(2, Some(at(14, 32))),
        ]);

        assert!(changes.is_empty(), "unexpected: {changes:?}");
    }

    #[test]
    fn known_then_missing_then_different_reports_last_known() {
        let changes = detect_sequence(vec![
            landing(0, Some(at(14, 32))),
            landing(1, None),
            landing(2, Some(at(14, 40))),
        ]);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].previous.as_deref(), Some("14:32"));
        assert_eq!(changes[0].current, "14:40");
        assert_eq!(changes[0].to_string(), "Landing: 14:32 -> 14:40");
    }
}

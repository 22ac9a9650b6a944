//! Tests for TOML configuration parsing.

use super::toml::{TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [[flight]]
            callsign = "PSCBJ"
            scheduled = "14:30"
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.flights.len(), 1);
        assert_eq!(config.flights[0].callsign, "PSCBJ");
        assert_eq!(config.flights[0].scheduled.as_deref(), Some("14:30"));
        assert!(config.flights[0].lead_minutes.is_none());
    }

    #[test]
    fn flight_without_time_is_unscheduled() {
        let toml = r#"
            [[flight]]
            callsign = "PSCBJ"
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert!(config.flights[0].scheduled.is_none());
    }

    #[test]
    fn parse_multiple_flights_in_order() {
        let toml = r#"
            [[flight]]
            callsign = "PSCBJ"
            scheduled = "14:30"

            [[flight]]
            callsign = "PRXYZ"
            scheduled = "18:05"
            lead_minutes = 30
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.flights[1].callsign, "PRXYZ");
        assert_eq!(config.flights[1].lead_minutes, Some(30));
    }

    #[test]
    fn parse_all_sections() {
        let toml = r#"
            [monitor]
            lead_minutes = 20
            interval = 45
            max_hours = 2.5
            stop_on_change = false
            compare_route = true
            stop_file = "/tmp/stop"
            utc_offset = "-03:00"

            [source]
            base_url = "https://tracker.example/flight/"
            timeout = 10
            user_agent = "flight-watch"

            [report]
            dir = "reports"
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.monitor.lead_minutes, Some(20));
        assert_eq!(config.monitor.interval, Some(45));
        assert_eq!(config.monitor.max_hours, Some(2.5));
        assert_eq!(config.monitor.stop_on_change, Some(false));
        assert!(config.monitor.compare_route);
        assert_eq!(config.monitor.utc_offset.as_deref(), Some("-03:00"));
        assert_eq!(config.source.timeout, Some(10));
        assert_eq!(config.source.user_agent.as_deref(), Some("flight-watch"));
        assert_eq!(
            config.report.dir.as_deref(),
            Some(std::path::Path::new("reports"))
        );
    }

    #[test]
    fn empty_config_is_valid() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.flights.is_empty());
        assert!(config.monitor.interval.is_none());
        assert!(!config.monitor.compare_route);
    }
}

mod errors {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn unknown_field_is_rejected() {
        let toml = r"
            [monitor]
            poll_interval = 60
        ";

        assert!(matches!(
            TomlConfig::parse(toml),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn flight_without_callsign_is_rejected() {
        let toml = r#"
            [[flight]]
            scheduled = "14:30"
        "#;

        assert!(TomlConfig::parse(toml).is_err());
    }

    #[test]
    fn wrong_type_is_rejected() {
        let toml = r#"
            [monitor]
            interval = "thirty"
        "#;

        assert!(TomlConfig::parse(toml).is_err());
    }

    #[test]
    fn missing_file_is_read_error() {
        let result = TomlConfig::load(std::path::Path::new("/nonexistent/flight-watch.toml"));
        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }
}

mod template {
    use super::*;

    #[test]
    fn template_parses() {
        let config = TomlConfig::parse(&default_config_template()).unwrap();

        assert_eq!(config.flights.len(), 1);
        assert_eq!(config.monitor.lead_minutes, Some(15));
        assert_eq!(config.monitor.interval, Some(30));
        assert_eq!(config.monitor.max_hours, Some(4.0));
    }
}

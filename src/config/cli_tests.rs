//! Tests for CLI argument parsing.

use std::path::PathBuf;

use clap::Parser;

use super::cli::{Cli, Command};

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_args() {
        let cli = Cli::parse_from_iter(["flight-watch", "--flight", "PSCBJ@14:30"]);

        assert_eq!(cli.flights, vec!["PSCBJ@14:30".to_string()]);
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn flight_is_repeatable() {
        let cli = Cli::parse_from_iter([
            "flight-watch",
            "--flight",
            "PSCBJ@14:30",
            "--flight",
            "PRXYZ@18:05",
        ]);

        assert_eq!(cli.flights.len(), 2);
        assert_eq!(cli.flights[1], "PRXYZ@18:05");
    }

    #[test]
    fn parse_monitor_options() {
        let cli = Cli::parse_from_iter([
            "flight-watch",
            "--flight",
            "PSCBJ@14:30",
            "--lead",
            "20",
            "--interval",
            "45",
            "--max-hours",
            "2.5",
            "--no-stop-on-change",
            "--compare-route",
            "--stop-file",
            "/tmp/stop",
        ]);

        assert_eq!(cli.lead_minutes, Some(20));
        assert_eq!(cli.interval, Some(45));
        assert_eq!(cli.max_hours, Some(2.5));
        assert!(cli.no_stop_on_change);
        assert!(cli.compare_route);
        assert_eq!(cli.stop_file, Some(PathBuf::from("/tmp/stop")));
    }

    #[test]
    fn negative_offset_is_a_value_not_a_flag() {
        let cli = Cli::parse_from_iter(["flight-watch", "--utc-offset", "-03:00"]);
        assert_eq!(cli.utc_offset.as_deref(), Some("-03:00"));
    }

    #[test]
    fn negative_max_hours_reaches_validation() {
        let cli = Cli::parse_from_iter(["flight-watch", "--max-hours", "-1"]);
        assert_eq!(cli.max_hours, Some(-1.0));
    }

    #[test]
    fn parse_source_and_report_options() {
        let cli = Cli::parse_from_iter([
            "flight-watch",
            "--source-url",
            "https://tracker.example/flight/",
            "--report-dir",
            "reports",
            "-c",
            "watch.toml",
            "-v",
        ]);

        assert_eq!(
            cli.source_url.as_deref(),
            Some("https://tracker.example/flight/")
        );
        assert_eq!(cli.report_dir, Some(PathBuf::from("reports")));
        assert_eq!(cli.config, Some(PathBuf::from("watch.toml")));
        assert!(cli.verbose);
    }

    #[test]
    fn defaults_are_unset() {
        let cli = Cli::parse_from_iter(["flight-watch"]);

        assert!(cli.flights.is_empty());
        assert!(cli.lead_minutes.is_none());
        assert!(cli.interval.is_none());
        assert!(cli.max_hours.is_none());
        assert!(!cli.no_stop_on_change);
        assert!(!cli.compare_route);
    }
}

mod status_command {
    use super::*;

    #[test]
    fn status_takes_callsign() {
        let cli = Cli::parse_from_iter(["flight-watch", "status", "pscbj"]);

        assert_eq!(cli.status_callsign(), Some("pscbj"));
        assert!(!cli.is_init());
    }

    #[test]
    fn global_options_precede_status() {
        let cli = Cli::parse_from_iter([
            "flight-watch",
            "--utc-offset",
            "-03:00",
            "status",
            "PSCBJ",
        ]);

        assert_eq!(cli.status_callsign(), Some("PSCBJ"));
        assert_eq!(cli.utc_offset.as_deref(), Some("-03:00"));
    }

    #[test]
    fn status_requires_callsign() {
        let result = Cli::try_parse_from(["flight-watch", "status"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_mode_has_no_status_callsign() {
        let cli = Cli::parse_from_iter(["flight-watch", "--flight", "PSCBJ"]);

        assert!(cli.status_callsign().is_none());
        assert_eq!(cli.flights, vec!["PSCBJ".to_string()]);
    }
}

mod init_command {
    use super::*;

    #[test]
    fn init_uses_default_output() {
        let cli = Cli::parse_from_iter(["flight-watch", "init"]);

        assert!(cli.is_init());
        match cli.command {
            Some(Command::Init { output }) => {
                assert_eq!(output, PathBuf::from("flight-watch.toml"));
            }
            _ => panic!("expected init command"),
        }
    }

    #[test]
    fn init_accepts_custom_output() {
        let cli = Cli::parse_from_iter(["flight-watch", "init", "-o", "custom.toml"]);

        match cli.command {
            Some(Command::Init { output }) => assert_eq!(output, PathBuf::from("custom.toml")),
            _ => panic!("expected init command"),
        }
    }

    #[test]
    fn run_mode_is_not_init() {
        let cli = Cli::parse_from_iter(["flight-watch", "--flight", "PSCBJ@14:30"]);
        assert!(!cli.is_init());
    }
}

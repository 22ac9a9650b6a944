//! Run reports: a human summary and a JSON file per monitored flight.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{NaiveTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::flight::{Snapshot, TargetId};
use crate::monitor::{RunResult, UNKNOWN};

/// Current report format version.
const REPORT_VERSION: u32 = 1;

/// Errors that can occur while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to serialize the report to JSON.
    #[error("Failed to serialize report: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Failed to write the report file.
    #[error("Failed to write report file: {0}")]
    Write(#[source] io::Error),

    /// The blocking writer task did not complete.
    #[error("Report writer task failed: {0}")]
    Task(#[source] tokio::task::JoinError),
}

/// On-disk report format.
#[derive(Debug, Serialize)]
struct ReportFile<'a> {
    version: u32,
    written_at: String,
    #[serde(flatten)]
    result: &'a RunResult,
}

/// Returns the report path for `target` inside `dir` (`log_{CALLSIGN}.json`).
#[must_use]
pub fn report_path(dir: &Path, target: &TargetId) -> PathBuf {
    dir.join(format!("log_{target}.json"))
}

/// Writes `result` as pretty JSON into `dir`, replacing any previous report.
///
/// Uses write-to-temp-then-rename so a reader never sees a partial file. The
/// directory is created if missing.
///
/// # Errors
///
/// Returns [`ReportError`] if serialization or any file operation fails.
pub async fn write_report(dir: &Path, result: &RunResult) -> Result<PathBuf, ReportError> {
    let path = report_path(dir, &result.target);
    let content = serde_json::to_string_pretty(&ReportFile {
        version: REPORT_VERSION,
        written_at: Utc::now().to_rfc3339(),
        result,
    })
    .map_err(ReportError::Serialize)?;

    let target = path.clone();
    tokio::task::spawn_blocking(move || write_atomic(&target, &content))
        .await
        .map_err(ReportError::Task)??;

    Ok(path)
}

fn write_atomic(path: &Path, content: &str) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(ReportError::Write)?;
        }
    }

    // report.json -> report.json.tmp, so the rename stays within one directory
    let temp_path = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&temp_path, content).map_err(ReportError::Write)?;
    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(ReportError::Write(e));
    }

    Ok(())
}

/// Multi-line human summary of a finished run.
///
/// ```ignore
/// println!("{}", Summary(&result));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Summary<'a>(pub &'a RunResult);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let secs = result.elapsed.as_secs();

        writeln!(f, "Flight {}", result.target)?;
        writeln!(f, "  Stop reason: {}", result.reason)?;
        writeln!(f, "  Duration:    {}m {:02}s", secs / 60, secs % 60)?;
        writeln!(f, "  Ticks:       {}", result.ticks)?;
        writeln!(f, "  Changes:     {}", result.changes.len())?;

        for change in &result.changes {
            writeln!(
                f,
                "    [{}] {change}",
                change.detected_at.format("%H:%M:%S")
            )?;
        }

        if let Some(error) = &result.error {
            writeln!(f, "  Error:       {error}")?;
        }

        match &result.final_snapshot {
            Some(snapshot) => {
                writeln!(f, "  Final state:")?;
                write!(f, "{}", SnapshotView::indented(snapshot, 4))
            }
            None => write!(f, "  Final state: none"),
        }
    }
}

/// Human rendering of one snapshot's observed fields, one per line.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotView<'a> {
    snapshot: &'a Snapshot,
    indent: usize,
}

impl<'a> SnapshotView<'a> {
    /// Renders `snapshot` without indentation.
    #[must_use]
    pub const fn new(snapshot: &'a Snapshot) -> Self {
        Self::indented(snapshot, 0)
    }

    /// Renders `snapshot` with every line indented by `indent` spaces.
    #[must_use]
    pub const fn indented(snapshot: &'a Snapshot, indent: usize) -> Self {
        Self { snapshot, indent }
    }
}

impl fmt::Display for SnapshotView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.snapshot;
        let hh_mm = |t: Option<NaiveTime>| t.map(|t| t.format("%H:%M").to_string());
        let lines = [
            ("Status:", s.status.clone()),
            ("Takeoff:", hh_mm(s.takeoff)),
            ("Sched. takeoff:", hh_mm(s.takeoff_scheduled)),
            ("Landing:", s.landing.map(|l| l.to_string())),
            ("Sched. landing:", hh_mm(s.landing_scheduled)),
            ("Origin:", s.origin.clone()),
            ("Destination:", s.destination.clone()),
            ("Aircraft:", s.aircraft.clone()),
        ];

        for (index, (label, value)) in lines.into_iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{:indent$}{label:<16}{}",
                "",
                value.as_deref().unwrap_or(UNKNOWN),
                indent = self.indent
            )?;
        }

        Ok(())
    }
}

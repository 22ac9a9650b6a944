//! Application execution logic.
//!
//! This module runs one scheduler per configured flight, logs their progress
//! as it is published, and prints a summary for each once all have stopped.
//! It also serves the one-shot `status` lookup.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use chrono::FixedOffset;
use thiserror::Error;
use tokio::signal;
use tokio::task::JoinSet;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;

use flight_watch::config::{LookupConfig, SourceSettings, ValidatedConfig};
use flight_watch::flight::TargetId;
use flight_watch::monitor::{Change, Phase, Progress, RunResult, Scheduler, StopFile};
use flight_watch::report::{ReportError, SnapshotView, Summary, write_report};
use flight_watch::source::{FetchError, FlightAwareSource, ReqwestClient, SnapshotSource};
use flight_watch::time::{Clock, SystemClock};

/// Source type used by the application.
type AppSource = Arc<FlightAwareSource<ReqwestClient>>;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// A monitoring task panicked or was aborted.
    #[error("Monitoring task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The one-shot lookup could not fetch the flight.
    #[error("Failed to fetch flight: {0}")]
    Fetch(#[from] FetchError),

    /// Writing a report file failed.
    #[error("Failed to write report: {0}")]
    Report(#[from] ReportError),

    /// One or more flights could not be monitored.
    #[error("{failed} of {total} flight(s) could not be monitored")]
    Failed {
        /// Runs that ended with an error
        failed: usize,
        /// Runs in total
        total: usize,
    },
}

/// Executes the monitors until every flight has stopped.
///
/// # Errors
///
/// Returns an error if:
/// - A monitoring task panicked
/// - A report could not be written
/// - Any flight's baseline fetch failed
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires:
/// - Network access to the tracking page
/// - Real async runtime with signal handling
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let clock = clock_for(config.utc_offset);
    let source = create_source(&config.source, clock);
    let schedulers = build_schedulers(&config, &source, clock);

    tracing::info!("Monitoring {} flight(s)", schedulers.len());

    let results = run_all(schedulers, shutdown_signal()).await?;

    for result in &results {
        println!("{}", Summary(result));
    }

    if let Some(ref dir) = config.report_dir {
        write_reports(dir, &results).await?;
    }

    check_results(&results)
}

/// Writes one report per result, continuing past failures.
///
/// Every failure is logged; the first one is returned.
async fn write_reports(dir: &Path, results: &[RunResult]) -> Result<(), RunError> {
    let mut first_error = None;

    for result in results {
        match write_report(dir, result).await {
            Ok(path) => {
                tracing::info!("Report for {} written to {}", result.target, path.display());
            }
            Err(e) => {
                tracing::error!("Report for {} not written: {e}", result.target);
                first_error.get_or_insert(e);
            }
        }
    }

    first_error.map_or(Ok(()), |e| Err(RunError::Report(e)))
}

/// Fetches one flight once and prints its current state.
///
/// # Errors
///
/// Returns [`RunError::Fetch`] if the tracking page cannot be fetched or read.
///
/// Excluded from coverage - requires network access.
#[cfg(not(tarpaulin_include))]
pub async fn lookup(config: LookupConfig) -> Result<(), RunError> {
    let clock = clock_for(config.utc_offset);
    let source = create_source(&config.source, clock);

    println!("{}", fetch_status(&source, &config.target).await?);
    Ok(())
}

/// Fetches `target` once and renders it for the terminal.
async fn fetch_status<S: SnapshotSource>(source: &S, target: &TargetId) -> Result<String, RunError> {
    let snapshot = source.fetch(target).await?;
    Ok(format!("Flight {target}\n{}", SnapshotView::indented(&snapshot, 2)))
}

/// Returns the clock for civil times: fixed offset if configured, else local.
fn clock_for(offset: Option<FixedOffset>) -> SystemClock {
    offset.map_or_else(SystemClock::local, SystemClock::with_offset)
}

/// Creates the tracking page source from its settings.
fn create_source(settings: &SourceSettings, clock: SystemClock) -> AppSource {
    let source = FlightAwareSource::with_clock(ReqwestClient::new(), clock, settings.base_url.clone())
        .with_user_agent(settings.user_agent.clone())
        .with_timeout(settings.timeout);

    Arc::new(source)
}

/// Creates one scheduler per configured flight, sharing `source`.
fn build_schedulers<S, C>(config: &ValidatedConfig, source: &S, clock: C) -> Vec<Scheduler<S, C>>
where
    S: SnapshotSource + Clone,
    C: Clock + Clone,
{
    config
        .targets
        .iter()
        .map(|target| {
            let scheduler = Scheduler::with_clock(
                target.clone(),
                source.clone(),
                clock.clone(),
                config.poll,
            );

            match config.stop_file {
                Some(ref path) => scheduler.with_condition(StopFile::new(path)),
                None => scheduler,
            }
        })
        .collect()
}

/// Runs every scheduler concurrently until all have stopped.
///
/// When `shutdown` completes, a stop is requested on every scheduler and the
/// loop keeps collecting their results. Results are returned in input order.
async fn run_all<S, C, F>(
    schedulers: Vec<Scheduler<S, C>>,
    shutdown: F,
) -> Result<Vec<RunResult>, RunError>
where
    S: SnapshotSource + 'static,
    C: Clock + 'static,
    F: Future<Output = ()>,
{
    let total = schedulers.len();
    let mut handles = Vec::with_capacity(total);
    let mut tasks = JoinSet::new();
    let mut followers = JoinSet::new();

    for (index, scheduler) in schedulers.into_iter().enumerate() {
        let handle = scheduler.handle();
        followers.spawn(follow_progress(scheduler.target().id.clone(), handle.updates()));
        handles.push(handle);
        tasks.spawn(async move { (index, scheduler.run().await) });
    }

    let mut results: Vec<Option<RunResult>> = vec![None; total];
    let mut stopping = false;
    tokio::pin!(shutdown);

    while !tasks.is_empty() {
        tokio::select! {
            () = &mut shutdown, if !stopping => {
                tracing::info!("Shutdown signal received, stopping...");
                for handle in &handles {
                    handle.request_stop();
                }
                stopping = true;
            }

            joined = tasks.join_next() => {
                let Some(joined) = joined else { break };
                let (index, result) = joined?;
                results[index] = Some(result);
            }
        }
    }

    // Followers end once their scheduler is dropped; drain them so the last
    // progress lines are logged before the summaries.
    while followers.join_next().await.is_some() {}

    Ok(results.into_iter().flatten().collect())
}

/// Maps the finished runs to the process outcome.
fn check_results(results: &[RunResult]) -> Result<(), RunError> {
    let failed = results.iter().filter(|r| r.is_failure()).count();

    if failed == 0 {
        Ok(())
    } else {
        Err(RunError::Failed {
            failed,
            total: results.len(),
        })
    }
}

/// Something worth logging in a newly published [`Progress`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    /// The scheduler entered a new phase.
    Phase(Phase),
    /// A change was detected.
    Change(Change),
    /// A fetch failed (or failed differently than before).
    FetchFailed(String),
    /// A fetch succeeded after failures.
    Recovered,
}

/// Remembers what has already been logged for one flight.
#[derive(Debug)]
struct ProgressLog {
    phase: Phase,
    changes: usize,
    error: Option<String>,
}

impl ProgressLog {
    const fn new() -> Self {
        Self {
            phase: Phase::Scheduled,
            changes: 0,
            error: None,
        }
    }

    /// Returns the events in `progress` not yet seen, in log order.
    fn observe(&mut self, progress: &Progress) -> Vec<Event> {
        let mut events = Vec::new();

        if progress.phase != self.phase {
            self.phase = progress.phase;
            events.push(Event::Phase(progress.phase));
        }

        if let Some(fresh) = progress.changes.get(self.changes..) {
            events.extend(fresh.iter().cloned().map(Event::Change));
        }
        self.changes = progress.changes.len();

        match (&self.error, &progress.last_error) {
            (_, Some(error)) if self.error.as_ref() != Some(error) => {
                events.push(Event::FetchFailed(error.clone()));
            }
            (Some(_), None) => events.push(Event::Recovered),
            _ => {}
        }
        self.error.clone_from(&progress.last_error);

        events
    }
}

/// Logs the progress of one flight until its scheduler is dropped.
async fn follow_progress(target: TargetId, mut updates: WatchStream<Arc<Progress>>) {
    let mut log = ProgressLog::new();

    while let Some(progress) = updates.next().await {
        for event in log.observe(&progress) {
            match event {
                Event::Phase(Phase::Scheduled) => {}
                Event::Phase(Phase::Waiting { start_at }) => {
                    tracing::info!("{target}: waiting until {}", start_at.format("%Y-%m-%d %H:%M"));
                }
                Event::Phase(Phase::Running) => {
                    tracing::info!("{target}: polling started");
                }
                Event::Phase(Phase::Stopped(reason)) => {
                    tracing::info!("{target}: stopped ({reason}) after {} tick(s)", progress.ticks);
                }
                Event::Change(change) => {
                    tracing::warn!("{target}: CHANGE {change}");
                }
                Event::FetchFailed(error) => {
                    tracing::warn!("{target}: fetch failed: {error}");
                }
                Event::Recovered => {
                    tracing::info!("{target}: fetch recovered");
                }
            }
        }
    }
}

/// Returns a future that completes when a shutdown signal is received.
///
/// If a handler cannot be installed the corresponding signal is ignored.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

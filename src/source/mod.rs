//! Source layer: where snapshots come from.
//!
//! This module provides types and traits for:
//! - Fetching one snapshot of a flight ([`SnapshotSource`])
//! - The FlightAware tracking page implementation ([`FlightAwareSource`])
//! - A minimal HTTP abstraction ([`HttpClient`], [`ReqwestClient`])
//! - Error handling ([`FetchError`], [`HttpError`])

mod client;
mod error;
mod flightaware;
mod http;

use std::future::Future;
use std::sync::Arc;

pub use client::ReqwestClient;
pub use error::{FetchError, HttpError};
pub use flightaware::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, FlightAwareSource, parse_page};
pub use http::{HttpClient, HttpRequest, HttpResponse};

use crate::flight::{Snapshot, TargetId};

/// Trait for fetching the current state of a monitored flight.
///
/// # Design
///
/// - The scheduler depends only on this trait, never on a concrete source
/// - A fetch either yields a complete [`Snapshot`] or a [`FetchError`];
///   retrying is the scheduler's decision, not the source's
/// - Implementations stamp the snapshot with their own clock reading
///
/// # Example
///
/// ```ignore
/// use flight_watch::flight::{Snapshot, TargetId};
/// use flight_watch::source::{FetchError, SnapshotSource};
///
/// struct Fixed(Snapshot);
///
/// impl SnapshotSource for Fixed {
///     async fn fetch(&self, _target: &TargetId) -> Result<Snapshot, FetchError> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
pub trait SnapshotSource: Send + Sync {
    /// Fetches one snapshot of `target`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the source is unreachable, answers with an
    /// error, or its payload cannot be interpreted.
    fn fetch(&self, target: &TargetId) -> impl Future<Output = Result<Snapshot, FetchError>> + Send;
}

impl<T: SnapshotSource> SnapshotSource for Arc<T> {
    fn fetch(&self, target: &TargetId) -> impl Future<Output = Result<Snapshot, FetchError>> + Send {
        (**self).fetch(target)
    }
}

/// Scripted sources for tests.
#[cfg(test)]
pub mod mock {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::{FetchError, SnapshotSource};
    use crate::flight::{Snapshot, TargetId};

    /// A source that replays a fixed script of results.
    ///
    /// Uses `Mutex<VecDeque>` because `FetchError` is not `Clone`. Once the
    /// script runs out, the fallback snapshot is returned if set, otherwise
    /// every call fails with [`FetchError::Unavailable`].
    #[derive(Debug, Default)]
    pub struct ScriptedSource {
        script: Mutex<VecDeque<Result<Snapshot, FetchError>>>,
        fallback: Option<Snapshot>,
        calls: AtomicU32,
    }

    impl ScriptedSource {
        /// Creates a source replaying `script` in order.
        pub fn new(script: Vec<Result<Snapshot, FetchError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                fallback: None,
                calls: AtomicU32::new(0),
            }
        }

        /// Creates a source that always returns `snapshot`.
        pub fn repeating(snapshot: Snapshot) -> Self {
            Self::new(vec![]).then_repeat(snapshot)
        }

        /// Sets the snapshot returned once the script is exhausted.
        #[must_use]
        pub fn then_repeat(mut self, snapshot: Snapshot) -> Self {
            self.fallback = Some(snapshot);
            self
        }

        /// Returns how many times `fetch` was called.
        pub fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SnapshotSource for ScriptedSource {
        async fn fetch(&self, _target: &TargetId) -> Result<Snapshot, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or_else(|| {
                self.fallback.clone().ok_or_else(|| FetchError::Unavailable {
                    message: "script exhausted".to_string(),
                })
            })
        }
    }

    /// Shorthand for a failed fetch.
    pub fn unavailable() -> Result<Snapshot, FetchError> {
        Err(FetchError::Unavailable {
            message: "scripted failure".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{ScriptedSource, unavailable};
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn snapshot(status: &str) -> Snapshot {
        let at = FixedOffset::west_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 3, 10, 14, 0, 0)
            .unwrap();
        Snapshot::new(at).with_status(status)
    }

    fn target() -> TargetId {
        TargetId::new("PSCBJ").unwrap()
    }

    #[tokio::test]
    async fn scripted_source_replays_in_order() {
        let source = ScriptedSource::new(vec![Ok(snapshot("Scheduled")), unavailable()]);

        let first = source.fetch(&target()).await.unwrap();
        let second = source.fetch(&target()).await;

        assert_eq!(first.status.as_deref(), Some("Scheduled"));
        assert!(second.is_err());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn exhausted_script_falls_back_to_repeat() {
        let source = ScriptedSource::new(vec![]).then_repeat(snapshot("En Route"));

        for _ in 0..3 {
            let fetched = source.fetch(&target()).await.unwrap();
            assert_eq!(fetched.status.as_deref(), Some("En Route"));
        }
    }

    #[tokio::test]
    async fn exhausted_script_without_fallback_fails() {
        let source = ScriptedSource::default();
        let result = source.fetch(&target()).await;
        assert!(matches!(result, Err(FetchError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn arc_source_delegates() {
        let source = Arc::new(ScriptedSource::repeating(snapshot("Landed")));
        let shared = Arc::clone(&source);

        let fetched = shared.fetch(&target()).await.unwrap();

        assert_eq!(fetched.status.as_deref(), Some("Landed"));
        assert_eq!(source.calls(), 1);
    }
}

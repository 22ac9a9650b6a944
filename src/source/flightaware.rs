//! FlightAware tracking page source.
//!
//! The public flight page embeds its data as a JavaScript assignment
//! (`var trackpollBootstrap = {...};`). The source fetches the page, cuts out
//! that object, and maps the first flight entry onto a [`Snapshot`].

use std::sync::LazyLock;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveTime, Timelike};
use regex::Regex;
use serde::Deserialize;
use url::Url;

use super::{FetchError, HttpClient, HttpError, HttpRequest, SnapshotSource};
use crate::flight::{LandingTime, Snapshot, TargetId};
use crate::time::{Clock, SystemClock};

/// Default tracking page prefix; the callsign is appended.
pub const DEFAULT_BASE_URL: &str = "https://www.flightaware.com/live/flight/";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Browser user agent; the page is not served to unknown clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

static BOOTSTRAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)var\s+trackpollBootstrap\s*=\s*(\{.*?\});")
        .expect("bootstrap pattern is a valid regex")
});

/// Snapshot source backed by the FlightAware public flight page.
///
/// # Type Parameters
///
/// * `H` - The [`HttpClient`] used to fetch pages
/// * `C` - The [`Clock`] stamping snapshots and choosing the display offset
#[derive(Debug, Clone)]
pub struct FlightAwareSource<H, C = SystemClock> {
    client: H,
    clock: C,
    base_url: Url,
    user_agent: http::HeaderValue,
    timeout: Duration,
}

impl<H: HttpClient> FlightAwareSource<H, SystemClock> {
    /// Creates a source using the system's local time.
    #[must_use]
    pub fn new(client: H, base_url: Url) -> Self {
        Self::with_clock(client, SystemClock::local(), base_url)
    }
}

impl<H: HttpClient, C: Clock> FlightAwareSource<H, C> {
    /// Creates a source with a custom clock.
    ///
    /// A missing trailing `/` is added to `base_url` so the callsign is
    /// appended rather than replacing the last path segment.
    #[must_use]
    pub fn with_clock(client: H, clock: C, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            client,
            clock,
            base_url,
            user_agent: http::HeaderValue::from_static(DEFAULT_USER_AGENT),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the `User-Agent` header sent with every request.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: http::HeaderValue) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the page URL for `target`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidUrl`] if the URL cannot be formed.
    pub fn page_url(&self, target: &TargetId) -> Result<Url, HttpError> {
        self.base_url
            .join(target.as_str())
            .map_err(|e| HttpError::InvalidUrl(e.to_string()))
    }
}

impl<H: HttpClient, C: Clock> SnapshotSource for FlightAwareSource<H, C> {
    async fn fetch(&self, target: &TargetId) -> Result<Snapshot, FetchError> {
        let url = self.page_url(target)?;
        tracing::debug!(%target, %url, "Fetching flight page");

        let request = HttpRequest::get(url)
            .with_header(http::header::USER_AGENT, self.user_agent.clone())
            .with_timeout(self.timeout);

        let response = self.client.request(request).await?;
        if !response.is_success() {
            return Err(FetchError::Status {
                status: response.status,
            });
        }

        parse_page(&response.body_text(), self.clock.now())
    }
}

/// Extracts a snapshot from a tracking page.
///
/// Times are rendered in `fetched_at`'s offset and truncated to the minute.
///
/// # Errors
///
/// - [`FetchError::MissingPayload`] if the page has no bootstrap object
/// - [`FetchError::Parse`] if the object is not valid JSON of the expected shape
/// - [`FetchError::NoFlight`] if it lists no flights
pub fn parse_page(html: &str, fetched_at: DateTime<FixedOffset>) -> Result<Snapshot, FetchError> {
    let payload = BOOTSTRAP
        .captures(html)
        .and_then(|c| c.get(1))
        .ok_or(FetchError::MissingPayload)?;

    let bootstrap: Bootstrap = serde_json::from_str(payload.as_str())?;
    let (flight_id, entry) = bootstrap
        .flights
        .into_iter()
        .next()
        .ok_or(FetchError::NoFlight)?;
    let entry: FlightEntry = serde_json::from_value(entry)?;

    Ok(entry.into_snapshot(flight_id, fetched_at))
}

#[derive(Debug, Deserialize)]
struct Bootstrap {
    #[serde(default)]
    flights: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FlightEntry {
    takeoff_times: Option<EventTimes>,
    landing_times: Option<EventTimes>,
    origin: Option<Airport>,
    destination: Option<Airport>,
    aircraft: Option<Aircraft>,
    flight_status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EventTimes {
    scheduled: Option<i64>,
    estimated: Option<i64>,
    actual: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Airport {
    friendly_name: Option<String>,
    icao: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Aircraft {
    friendly_type: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl Airport {
    fn label(self) -> Option<String> {
        non_empty(self.friendly_name).or_else(|| non_empty(self.icao))
    }
}

impl Aircraft {
    fn label(self) -> Option<String> {
        non_empty(self.friendly_type).or_else(|| non_empty(self.kind))
    }
}

impl FlightEntry {
    fn into_snapshot(self, flight_id: String, fetched_at: DateTime<FixedOffset>) -> Snapshot {
        let offset = *fetched_at.offset();
        let civil = |epoch: Option<i64>| epoch.and_then(|e| civil_minute(e, offset));

        let takeoff = self.takeoff_times.unwrap_or_default();
        let landing = self.landing_times.unwrap_or_default();

        let landing_time = civil(landing.actual)
            .map(LandingTime::actual)
            .or_else(|| civil(landing.estimated).map(LandingTime::estimated));

        Snapshot {
            fetched_at,
            flight_id: non_empty(Some(flight_id)),
            takeoff: civil(takeoff.actual),
            takeoff_scheduled: civil(takeoff.scheduled),
            landing: landing_time,
            landing_scheduled: civil(landing.scheduled),
            status: non_empty(self.flight_status),
            origin: self.origin.and_then(Airport::label),
            destination: self.destination.and_then(Airport::label),
            aircraft: self.aircraft.and_then(Aircraft::label),
        }
    }
}

/// Converts epoch seconds to a civil time in `offset`, dropping seconds.
fn civil_minute(epoch: i64, offset: FixedOffset) -> Option<NaiveTime> {
    let time = DateTime::from_timestamp(epoch, 0)?
        .with_timezone(&offset)
        .time();
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "flightaware_tests.rs"]
mod tests;

//! HTTP request/response types and client trait.

use std::time::Duration;

use super::HttpError;

/// An HTTP request to be sent.
///
/// A value type that any [`HttpClient`] implementation accepts. It uses the
/// `http` crate's method and header types.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: http::Method,
    /// Target URL
    pub url: url::Url,
    /// HTTP headers to send
    pub headers: http::HeaderMap,
    /// Per-request timeout, overriding the client default
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Creates a GET request to the given URL with no headers.
    #[must_use]
    pub fn get(url: url::Url) -> Self {
        Self {
            method: http::Method::GET,
            url,
            headers: http::HeaderMap::new(),
            timeout: None,
        }
    }

    /// Adds a header to the request.
    ///
    /// If the header name already exists, the value is appended.
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// An HTTP response received from a server.
///
/// The body is fully buffered into memory.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: http::StatusCode,
    /// Response headers
    pub headers: http::HeaderMap,
    /// Response body (fully buffered)
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a new HTTP response.
    #[must_use]
    pub const fn new(status: http::StatusCode, headers: http::HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the body as text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Trait for making HTTP requests.
///
/// Abstracts the HTTP library so sources can be tested with scripted
/// responses.
///
/// # Example
///
/// ```ignore
/// use flight_watch::source::{HttpClient, HttpRequest, HttpResponse, HttpError};
///
/// struct CannedClient {
///     response: HttpResponse,
/// }
///
/// impl HttpClient for CannedClient {
///     async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
///         Ok(self.response.clone())
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Sends an HTTP request and returns the response.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when:
    /// - Network connection fails ([`HttpError::Connection`])
    /// - Request times out ([`HttpError::Timeout`])
    /// - URL is invalid ([`HttpError::InvalidUrl`])
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_starts_without_headers_or_timeout() {
        let url = url::Url::parse("https://example.com/live/flight/PSCBJ").unwrap();
        let req = HttpRequest::get(url.clone());

        assert_eq!(req.method, http::Method::GET);
        assert_eq!(req.url, url);
        assert!(req.headers.is_empty());
        assert!(req.timeout.is_none());
    }

    #[test]
    fn builder_sets_header_and_timeout() {
        let url = url::Url::parse("https://example.com/").unwrap();
        let req = HttpRequest::get(url)
            .with_header(
                http::header::USER_AGENT,
                http::HeaderValue::from_static("flight-watch"),
            )
            .with_timeout(Duration::from_secs(15));

        assert_eq!(req.headers.get(http::header::USER_AGENT).unwrap(), "flight-watch");
        assert_eq!(req.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn response_success_covers_2xx_only() {
        let ok = HttpResponse::new(http::StatusCode::OK, http::HeaderMap::new(), vec![]);
        let missing = HttpResponse::new(http::StatusCode::NOT_FOUND, http::HeaderMap::new(), vec![]);

        assert!(ok.is_success());
        assert!(!missing.is_success());
    }

    #[test]
    fn body_text_tolerates_invalid_utf8() {
        let response = HttpResponse::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            vec![b'o', b'k', 0xFF],
        );
        assert!(response.body_text().starts_with("ok"));
    }
}

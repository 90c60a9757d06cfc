//! HTTP client port
//!
//! Capability set used by network gateways. Implementations decide which
//! status codes are failures; the bundled adapter treats anything outside
//! 2xx as [`NetworkError::Http`].

use std::collections::BTreeMap;

use thiserror::Error;

/// Header map: keys stored as given, last write wins
pub type Headers = BTreeMap<String, String>;

/// Query parameters, serialised in lexicographic key order
pub type QueryParams = BTreeMap<String, String>;

/// Default connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default read timeout in seconds
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Default POST content type
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Transport-layer failures
///
/// Match on the enum to handle every network failure, or on a variant to
/// handle one kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// The connection could not be established
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server answered with a status the client treats as failure
    #[error("HTTP {status_code}: {message}")]
    Http { status_code: u16, message: String },

    /// Connect or read deadline exceeded
    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The response arrived but could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    /// HTTP status code, for `Http` errors only
    pub fn status_code(&self) -> Option<u16> {
        match self {
            NetworkError::Http { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

/// A completed HTTP exchange
pub trait HttpResponse: Send {
    fn status_code(&self) -> u16;
    fn body(&self) -> &str;
    fn headers(&self) -> &Headers;
    /// Header lookup, ASCII case-insensitive as HTTP field names are
    fn header(&self, name: &str) -> Option<&str>;
}

/// Blocking HTTP client with per-instance defaults
pub trait HttpClient: Send + Sync {
    /// Replace the headers sent with every request
    fn set_default_headers(&mut self, headers: Headers);

    fn set_connect_timeout(&mut self, seconds: u64);

    fn set_read_timeout(&mut self, seconds: u64);

    /// GET `url` with `params` appended as an encoded query string
    fn get(&self, url: &str, params: &QueryParams) -> Result<Box<dyn HttpResponse>, NetworkError>;

    /// POST `body`; `content_type` defaults to [`DEFAULT_CONTENT_TYPE`]
    fn post(
        &self,
        url: &str,
        body: &str,
        content_type: Option<&str>,
    ) -> Result<Box<dyn HttpResponse>, NetworkError>;
}

/// In-memory response, filled by adapters once the body has been read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedResponse {
    status_code: u16,
    body: String,
    headers: Headers,
}

impl BufferedResponse {
    pub fn new(status_code: u16, body: impl Into<String>, headers: Headers) -> Self {
        Self {
            status_code,
            body: body.into(),
            headers,
        }
    }
}

impl HttpResponse for BufferedResponse {
    fn status_code(&self) -> u16 {
        self.status_code
    }

    fn body(&self) -> &str {
        &self.body
    }

    fn headers(&self) -> &Headers {
        &self.headers
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str).or_else(|| {
            self.headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_only_for_http_errors() {
        let err = NetworkError::Http {
            status_code: 500,
            message: "boom".into(),
        };
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(err.to_string(), "HTTP 500: boom");
        assert_eq!(NetworkError::Timeout("x".into()).status_code(), None);
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let mut headers = Headers::new();
        headers.insert("content-type".into(), "text/plain".into());
        let response = BufferedResponse::new(200, "ok", headers);
        assert_eq!(response.header("content-type"), Some("text/plain"));
        assert_eq!(response.header("Content-Type"), Some("text/plain"));
        assert_eq!(response.header("CONTENT-TYPE"), Some("text/plain"));
        assert_eq!(response.header("content-length"), None);
    }
}

//! Blocking [`HttpClient`] backed by reqwest

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use tracing::{debug, warn};
use url::Url;

use crate::ports::http::{
    BufferedResponse, Headers, HttpClient, HttpResponse, NetworkError, QueryParams,
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_CONTENT_TYPE, DEFAULT_READ_TIMEOUT_SECS,
};

/// An absolute URL split into origin and request target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    /// `scheme://host[:port]`
    pub scheme_host: String,
    /// Path plus any query already present, `/` at minimum
    pub path: String,
}

impl ParsedUrl {
    /// Reassemble with `query` appended (`?` or `&` as appropriate)
    pub fn with_query(&self, query: &str) -> String {
        if query.is_empty() {
            return format!("{}{}", self.scheme_host, self.path);
        }
        let separator = if self.path.contains('?') { '&' } else { '?' };
        format!("{}{}{}{}", self.scheme_host, self.path, separator, query)
    }
}

/// Split an absolute http(s) URL; fragments are dropped
pub fn split_url(raw: &str) -> Result<ParsedUrl, NetworkError> {
    let url = Url::parse(raw).map_err(|e| NetworkError::InvalidUrl(format!("{}: {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(NetworkError::InvalidUrl(format!(
            "{}: unsupported scheme '{}'",
            raw,
            url.scheme()
        )));
    }

    let host = url
        .host_str()
        .ok_or_else(|| NetworkError::InvalidUrl(format!("{}: missing host", raw)))?;

    let scheme_host = match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    };

    let mut path = if url.path().is_empty() {
        "/".to_string()
    } else {
        url.path().to_string()
    };
    if let Some(query) = url.query() {
        path.push('?');
        path.push_str(query);
    }

    Ok(ParsedUrl { scheme_host, path })
}

/// Form-encode `params` as `k=v&k=v` in key order
pub fn build_query_string(params: &QueryParams) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

/// reqwest-backed client
///
/// A fresh reqwest client is built per request so timeout changes through
/// the setters take effect immediately.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    default_headers: Headers,
    connect_timeout_secs: u64,
    read_timeout_secs: u64,
    use_system_proxy: bool,
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            default_headers: Headers::new(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            use_system_proxy: true,
        }
    }

    /// Ignore `HTTP_PROXY` and friends, always connecting directly
    pub fn without_proxy(mut self) -> Self {
        self.use_system_proxy = false;
        self
    }

    pub fn connect_timeout_secs(&self) -> u64 {
        self.connect_timeout_secs
    }

    pub fn read_timeout_secs(&self) -> u64 {
        self.read_timeout_secs
    }

    fn build_client(&self) -> Result<Client, NetworkError> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .timeout(Duration::from_secs(self.read_timeout_secs));
        if !self.use_system_proxy {
            builder = builder.no_proxy();
        }
        builder
            .build()
            .map_err(|e| NetworkError::Connection(format!("Failed to create HTTP client: {}", e)))
    }

    fn header_map(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in &self.default_headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    map.insert(name, value);
                }
                _ => warn!(header = %name, "skipping invalid default header"),
            }
        }
        map
    }

    fn map_request_error(error: reqwest::Error, method: &str, url: &str) -> NetworkError {
        if error.is_timeout() {
            NetworkError::Timeout(format!("{} {} timed out", method, url))
        } else if error.is_connect() {
            NetworkError::Connection(format!("Failed to connect: {} {}: {}", method, url, error))
        } else if error.is_builder() {
            NetworkError::InvalidUrl(format!("{}: {}", url, error))
        } else {
            NetworkError::Connection(format!("{} {} failed: {}", method, url, error))
        }
    }

    fn send(
        &self,
        request: RequestBuilder,
        method: &str,
        url: &str,
    ) -> Result<Box<dyn HttpResponse>, NetworkError> {
        let response = request
            .send()
            .map_err(|e| Self::map_request_error(e, method, url))?;

        let status = response.status().as_u16();
        let mut headers = Headers::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str().to_string(), value.to_string());
            }
        }

        let body = response
            .text()
            .map_err(|e| Self::map_request_error(e, method, url))?;

        debug!(method, url, status, "http request completed");

        if !(200..=299).contains(&status) {
            return Err(NetworkError::Http {
                status_code: status,
                message: body,
            });
        }

        Ok(Box::new(BufferedResponse::new(status, body, headers)))
    }
}

impl HttpClient for ReqwestHttpClient {
    fn set_default_headers(&mut self, headers: Headers) {
        self.default_headers = headers;
    }

    fn set_connect_timeout(&mut self, seconds: u64) {
        self.connect_timeout_secs = seconds;
    }

    fn set_read_timeout(&mut self, seconds: u64) {
        self.read_timeout_secs = seconds;
    }

    fn get(&self, url: &str, params: &QueryParams) -> Result<Box<dyn HttpResponse>, NetworkError> {
        let parsed = split_url(url)?;
        let target = parsed.with_query(&build_query_string(params));

        let request = self.build_client()?.get(&target).headers(self.header_map());
        self.send(request, "GET", &target)
    }

    fn post(
        &self,
        url: &str,
        body: &str,
        content_type: Option<&str>,
    ) -> Result<Box<dyn HttpResponse>, NetworkError> {
        let parsed = split_url(url)?;
        let target = parsed.with_query("");

        let content_type = content_type.unwrap_or(DEFAULT_CONTENT_TYPE);
        let mut headers = self.header_map();
        let value = HeaderValue::from_str(content_type).map_err(|_| {
            NetworkError::InvalidResponse(format!("invalid content type '{}'", content_type))
        })?;
        headers.insert(CONTENT_TYPE, value);

        let request = self
            .build_client()?
            .post(&target)
            .headers(headers)
            .body(body.to_string());
        self.send(request, "POST", &target)
    }
}

//! Responses returned by endpoints
//!
//! A deliberately small response type: status, headers and a text body. It
//! converts into an `http::Response` for whatever transport sits in front of
//! the router.

use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, StatusCode};

/// Header telling an outer application that no route handled the request
pub const CASCADE_HEADER: &str = "x-cascade";

/// Response produced by an endpoint or by the router itself
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl Response {
    /// Create new response with OK status
    pub fn new() -> Self {
        Self::with_status(StatusCode::OK)
    }

    /// Create response with specific status code
    pub fn with_status(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: String::new(),
        }
    }

    /// Create 200 OK response
    pub fn ok() -> Self {
        Self::with_status(StatusCode::OK)
    }

    /// The response the router gives when nothing matched: `404`,
    /// `X-Cascade: pass` and a `Not Found` body
    pub fn not_found() -> Self {
        Self::with_status(StatusCode::NOT_FOUND)
            .with_header(
                HeaderName::from_static(CASCADE_HEADER),
                HeaderValue::from_static("pass"),
            )
            .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .text("Not Found")
    }

    /// Set response status code (consuming)
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Get a header value as a string, if present and visible ASCII
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the text body
    pub fn text<S: Into<String>>(mut self, text: S) -> Self {
        self.body = text.into();
        self
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Whether the response asks an outer application to try its own routes
    pub fn is_cascade(&self) -> bool {
        self.get_header(CASCADE_HEADER) == Some("pass")
    }

    /// Convert into an `http::Response`
    pub fn into_http(self) -> http::Response<String> {
        let mut response = http::Response::new(self.body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Response> for http::Response<String> {
    fn from(response: Response) -> Self {
        response.into_http()
    }
}

//! Request and response values exchanged with the transport
//!
//! `AdminRequest` is immutable: adding a header returns a modified copy, so
//! a base request can be re-signed without carrying stale `Date` or
//! `Authorization` headers from an earlier attempt.

use std::fmt;
use std::str::FromStr;

use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::{Method, StatusCode};
use url::Url;

use crate::error::{Error, Result};

/// HTTP verbs accepted by the admin API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    /// All supported verbs
    pub const ALL: [Verb; 4] = [Verb::Get, Verb::Post, Verb::Put, Verb::Delete];

    /// Uppercase wire name
    pub const fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }

    /// Convert to an `http::Method`
    pub fn method(self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
        }
    }
}

impl FromStr for Verb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Verb::Get),
            "post" => Ok(Verb::Post),
            "put" => Ok(Verb::Put),
            "delete" => Ok(Verb::Delete),
            _ => Err(Error::Usage(format!(
                "Unsupported HTTP method specified: {s}"
            ))),
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outgoing admin API request
#[derive(Debug, Clone)]
pub struct AdminRequest {
    method: Method,
    uri: Url,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl AdminRequest {
    /// Create a request with no headers and an empty body
    pub fn new(method: Method, uri: Url) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Copy of this request with `name` set to `value`, replacing prior values
    pub fn with_header(&self, name: &str, value: &str) -> Result<Self> {
        let (name, value) = parse_header(name, value)?;
        let mut request = self.clone();
        request.headers.insert(name, value);
        Ok(request)
    }

    /// Copy of this request with `value` appended to the values of `name`
    pub fn with_added_header(&self, name: &str, value: &str) -> Result<Self> {
        let (name, value) = parse_header(name, value)?;
        let mut request = self.clone();
        request.headers.append(name, value);
        Ok(request)
    }

    /// Copy of this request with the given body
    pub fn with_body(&self, body: impl Into<Vec<u8>>) -> Self {
        let mut request = self.clone();
        request.body = body.into();
        request
    }

    /// All values of a header joined with `", "`; empty if absent
    pub fn header_line(&self, name: &str) -> String {
        self.headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| Error::Usage(format!("Invalid header name '{name}': {e}")))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|e| Error::Usage(format!("Invalid value for header '{name}': {e}")))?;
    Ok((header_name, header_value))
}

/// Body of a response as delivered by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// Body bytes were read completely
    Readable(Vec<u8>),
    /// Body could not be read; carries the reason
    Unreadable(String),
}

/// A response received from the transport
#[derive(Debug, Clone)]
pub struct AdminResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: ResponseBody,
}

impl AdminResponse {
    /// Create a response with a readable body
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: ResponseBody::Readable(body.into()),
        }
    }

    /// Create a response whose body could not be read
    pub fn unreadable(status: StatusCode, reason: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: ResponseBody::Unreadable(reason.into()),
        }
    }

    /// Replace the response headers
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// Whether the body can be read
    pub fn is_readable(&self) -> bool {
        matches!(self.body, ResponseBody::Readable(_))
    }

    /// Body as text, lossily decoded; empty when unreadable
    pub fn text(&self) -> String {
        match &self.body {
            ResponseBody::Readable(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            ResponseBody::Unreadable(_) => String::new(),
        }
    }
}

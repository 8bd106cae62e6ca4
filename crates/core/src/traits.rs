//! Collaborator traits
//!
//! The client talks to the network only through `HttpTransport` and builds
//! URIs only through `UriFactory`. Both are injected, which keeps this crate
//! independent of any HTTP library and lets tests substitute mocks.

use async_trait::async_trait;
use url::Url;

use crate::error::Result;
use crate::request::{AdminRequest, AdminResponse};

/// Sends a fully prepared request and returns the raw response
///
/// Implementations report network failures as `Error::Network` and must
/// return HTTP error statuses as ordinary responses; mapping them to errors
/// is the client's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a request
    async fn send_request(&self, request: AdminRequest) -> Result<AdminResponse>;
}

/// Turns a URI string into a parsed URL
#[cfg_attr(test, mockall::automock)]
pub trait UriFactory: Send + Sync {
    /// Parse `uri`
    fn create_uri(&self, uri: &str) -> Result<Url>;
}

/// `UriFactory` backed by the `url` crate parser
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlFactory;

impl UriFactory for UrlFactory {
    fn create_uri(&self, uri: &str) -> Result<Url> {
        Ok(Url::parse(uri)?)
    }
}

//! Request middleware
//!
//! A `Pipeline` wraps a transport with an ordered list of middleware. Each
//! middleware receives the request and an explicit `Next` handle; calling
//! `next.run(request)` passes control to the following middleware, and the
//! last one hands the request to the transport. The first middleware in the
//! list is the outermost: it sees the request first and the response last.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::request::{AdminRequest, AdminResponse, ResponseBody};
use crate::signer;
use crate::traits::HttpTransport;

/// A step in the request pipeline
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Handle `request`, usually by delegating to `next`
    async fn handle(&self, request: AdminRequest, next: Next<'_>) -> Result<AdminResponse>;
}

/// The remainder of a pipeline
#[derive(Clone, Copy)]
pub struct Next<'a> {
    transport: &'a dyn HttpTransport,
    middleware: &'a [Arc<dyn Middleware>],
}

impl<'a> Next<'a> {
    /// Run the rest of the pipeline
    pub async fn run(self, request: AdminRequest) -> Result<AdminResponse> {
        match self.middleware.split_first() {
            Some((current, rest)) => {
                let next = Next {
                    transport: self.transport,
                    middleware: rest,
                };
                current.handle(request, next).await
            }
            None => self.transport.send_request(request).await,
        }
    }
}

/// A transport wrapped in middleware
///
/// The pipeline is itself an `HttpTransport`.
pub struct Pipeline {
    transport: Arc<dyn HttpTransport>,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl Pipeline {
    /// Compose `middleware` (outermost first) around `transport`
    pub fn new(transport: Arc<dyn HttpTransport>, middleware: Vec<Arc<dyn Middleware>>) -> Self {
        Self {
            transport,
            middleware,
        }
    }

    /// The standard admin API pipeline: error mapping, then authentication
    pub fn admin(transport: Arc<dyn HttpTransport>, credentials: Arc<Credentials>) -> Self {
        Self::new(
            transport,
            vec![
                Arc::new(ErrorMapping),
                Arc::new(Authentication::new(credentials)),
            ],
        )
    }

    /// Number of middleware in the pipeline
    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    /// Whether the pipeline has no middleware
    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }
}

#[async_trait]
impl HttpTransport for Pipeline {
    async fn send_request(&self, request: AdminRequest) -> Result<AdminResponse> {
        let next = Next {
            transport: self.transport.as_ref(),
            middleware: &self.middleware,
        };
        next.run(request).await
    }
}

/// Turns 4xx and 5xx responses into `Error::Http`
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorMapping;

#[async_trait]
impl Middleware for ErrorMapping {
    async fn handle(&self, request: AdminRequest, next: Next<'_>) -> Result<AdminResponse> {
        let response = next.run(request).await?;
        let status = response.status();

        if status.is_client_error() || status.is_server_error() {
            warn!(status = status.as_u16(), "Admin API returned an error status");
            let body = match response.body() {
                ResponseBody::Readable(_) => response.text(),
                ResponseBody::Unreadable(reason) => reason.clone(),
            };
            return Err(Error::Http { status, body });
        }

        Ok(response)
    }
}

/// Signs every outgoing request with SigV2
#[derive(Debug, Clone)]
pub struct Authentication {
    credentials: Arc<Credentials>,
}

impl Authentication {
    pub fn new(credentials: Arc<Credentials>) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl Middleware for Authentication {
    async fn handle(&self, request: AdminRequest, next: Next<'_>) -> Result<AdminResponse> {
        let signed = signer::authenticate(&request, &self.credentials)?;
        next.run(signed).await
    }
}

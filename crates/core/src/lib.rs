//! rgw-core: Core library for the RADOS Gateway admin API client
//!
//! This crate provides:
//! - AWS Signature V2 request signing
//! - The `AdminClient` verb surface (`get`, `post`, `put`, `delete`)
//! - A middleware pipeline for error mapping and authentication
//! - Configuration validation and profile files
//!
//! It does not depend on any HTTP library. Requests leave through the
//! `HttpTransport` trait; `rgw-http` provides the reqwest implementation.

pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod request;
pub mod signer;
pub mod traits;

pub use client::{AdminClient, AdminClientBuilder, Params, TransportFactory};
pub use config::{ClientConfig, ConfigFile, Credentials, ValidatedConfig};
pub use error::{Error, ErrorKind, Result};
pub use middleware::{Authentication, ErrorMapping, Middleware, Next, Pipeline};
pub use request::{AdminRequest, AdminResponse, ResponseBody, Verb};
pub use traits::{HttpTransport, UriFactory, UrlFactory};

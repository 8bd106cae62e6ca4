//! rgw-http: reqwest transport for the RADOS Gateway admin API client
//!
//! This is the only crate in the workspace that depends on `reqwest`. It
//! supplies the default `HttpTransport` and a `connect` shortcut that wires
//! it into an `AdminClient`.

pub mod transport;

use std::sync::Arc;

use rgw_core::{AdminClient, ClientConfig, HttpTransport, Result};

pub use transport::{ReqwestTransport, ReqwestTransportBuilder};

/// The transport used when the caller does not supply one
pub fn default_transport() -> Result<Arc<dyn HttpTransport>> {
    Ok(Arc::new(ReqwestTransport::new()?))
}

/// Create an admin client backed by the default transport
///
/// The config is validated immediately. The transport itself is only built
/// when the first request is sent.
pub fn connect(config: ClientConfig) -> Result<AdminClient> {
    AdminClient::builder()
        .config(config)
        .transport_factory(default_transport)
        .build()
}

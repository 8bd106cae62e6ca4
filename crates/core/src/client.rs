//! Admin API client
//!
//! `AdminClient` turns verb calls into signed admin API requests. Requests
//! go through a middleware pipeline (error mapping, then SigV2
//! authentication) around an injected transport; the pipeline is composed on
//! first use and reused for the lifetime of the client.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::debug;
use url::Url;
use url::form_urlencoded;

use crate::config::{ClientConfig, Credentials};
use crate::error::{Error, Result};
use crate::middleware::Pipeline;
use crate::request::{AdminRequest, AdminResponse, ResponseBody, Verb};
use crate::traits::{HttpTransport, UriFactory, UrlFactory};

/// Key/value query parameters, in order
pub type Params<'a> = &'a [(&'a str, &'a str)];

/// Lazily invoked constructor for a transport
pub type TransportFactory = Box<dyn Fn() -> Result<Arc<dyn HttpTransport>> + Send + Sync>;

/// Query parameter forced on every request
const FORMAT_PARAM: (&str, &str) = ("format", "json");

enum TransportSource {
    Ready(Arc<dyn HttpTransport>),
    Deferred(TransportFactory),
}

/// Builder for [`AdminClient`]
#[derive(Default)]
pub struct AdminClientBuilder {
    config: ClientConfig,
    transport: Option<TransportSource>,
    uri_factory: Option<Arc<dyn UriFactory>>,
}

impl AdminClientBuilder {
    /// Use all settings from `config`
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.config.api_url = Some(api_url.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(api_key.into());
        self
    }

    pub fn secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.config.secret_key = Some(secret_key.into());
        self
    }

    /// Send requests through `transport`
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(TransportSource::Ready(transport));
        self
    }

    /// Construct the transport on first use with `factory`
    pub fn transport_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn HttpTransport>> + Send + Sync + 'static,
    {
        self.transport = Some(TransportSource::Deferred(Box::new(factory)));
        self
    }

    /// Build URIs with `uri_factory` instead of the `url` parser
    pub fn uri_factory(mut self, uri_factory: Arc<dyn UriFactory>) -> Self {
        self.uri_factory = Some(uri_factory);
        self
    }

    /// Validate the settings and create the client
    pub fn build(self) -> Result<AdminClient> {
        let validated = self.config.validate()?;

        let transport = self.transport.ok_or_else(|| {
            Error::Config(
                "No HTTP transport configured; supply one or use rgw_http::connect".into(),
            )
        })?;

        Ok(AdminClient {
            api_url: validated.api_url.trim_end_matches('/').to_string(),
            credentials: Arc::new(validated.credentials),
            uri_factory: self.uri_factory.unwrap_or_else(|| Arc::new(UrlFactory)),
            transport,
            pipeline: OnceCell::new(),
        })
    }
}

/// Admin API client for RADOS Gateway
pub struct AdminClient {
    api_url: String,
    credentials: Arc<Credentials>,
    uri_factory: Arc<dyn UriFactory>,
    transport: TransportSource,
    pipeline: OnceCell<Pipeline>,
}

impl AdminClient {
    /// Start building a client
    pub fn builder() -> AdminClientBuilder {
        AdminClientBuilder::default()
    }

    /// Create a client from `config` sending through `transport`
    pub fn new(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        Self::builder().config(config).transport(transport).build()
    }

    /// Base URL of the admin API, without trailing slash
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Access key used to sign requests
    pub fn access_key(&self) -> &str {
        self.credentials.access_key()
    }

    /// The URI factory in use
    pub fn uri_factory(&self) -> &dyn UriFactory {
        self.uri_factory.as_ref()
    }

    /// The transport wrapped in the admin middleware
    ///
    /// Composed once, on first use. A deferred transport factory is invoked
    /// at that point and never again once it succeeds.
    pub async fn http_client(&self) -> Result<&Pipeline> {
        self.pipeline
            .get_or_try_init(|| async {
                let transport = match &self.transport {
                    TransportSource::Ready(transport) => transport.clone(),
                    TransportSource::Deferred(factory) => factory()?,
                };
                debug!(api_url = %self.api_url, "Composed admin API pipeline");
                Ok::<_, Error>(Pipeline::admin(transport, self.credentials.clone()))
            })
            .await
    }

    /// Build the URI for `resource`
    ///
    /// All `params` are sent except `format`, which is always `json` and
    /// always last.
    pub fn build_uri(&self, resource: &str, params: Params<'_>) -> Result<Url> {
        let mut query = form_urlencoded::Serializer::new(String::new());
        for (key, value) in params.iter().filter(|(key, _)| *key != FORMAT_PARAM.0) {
            query.append_pair(key, value);
        }
        query.append_pair(FORMAT_PARAM.0, FORMAT_PARAM.1);

        let uri = format!("{}/{}?{}", self.api_url, resource, query.finish());
        self.uri_factory.create_uri(&uri)
    }

    /// Create an unsent, unsigned request
    pub fn create_request(
        &self,
        resource: &str,
        verb: Verb,
        params: Params<'_>,
    ) -> Result<AdminRequest> {
        let uri = self.build_uri(resource, params)?;
        Ok(AdminRequest::new(verb.method(), uri))
    }

    /// Send a request through the pipeline and parse the JSON response
    pub async fn send_request(&self, request: AdminRequest) -> Result<Value> {
        debug!(method = %request.method(), uri = %request.uri(), "Sending admin API request");

        let response = self.http_client().await?.send_request(request).await?;
        Self::parse_response(&response)
    }

    /// Decode a response body as JSON
    ///
    /// No schema is applied. Literal `null` and an empty or whitespace-only
    /// body both yield `Value::Null`; the gateway answers some successful
    /// calls, such as removing a user, with no body at all.
    pub fn parse_response(response: &AdminResponse) -> Result<Value> {
        match response.body() {
            ResponseBody::Unreadable(reason) => {
                tracing::warn!(%reason, "Response body is not readable");
                Err(Error::ResponseParse(format!("body is not readable: {reason}")))
            }
            ResponseBody::Readable(bytes) if bytes.trim_ascii().is_empty() => Ok(Value::Null),
            ResponseBody::Readable(bytes) => Ok(serde_json::from_slice(bytes)?),
        }
    }

    /// Call the admin API by verb name
    ///
    /// `verb` is one of `get`, `post`, `put`, `delete` in any case. Unknown
    /// verbs and a missing or empty resource are rejected before anything is
    /// sent.
    pub async fn call(
        &self,
        verb: &str,
        resource: Option<&str>,
        params: Option<Params<'_>>,
    ) -> Result<Value> {
        let verb: Verb = verb.parse()?;
        let resource = resource.ok_or_else(|| Error::Usage("No resource specified.".into()))?;
        self.execute(verb, resource, params).await
    }

    /// Build, send and parse one request
    pub async fn execute(
        &self,
        verb: Verb,
        resource: &str,
        params: Option<Params<'_>>,
    ) -> Result<Value> {
        if resource.is_empty() {
            return Err(Error::Usage("No resource specified.".into()));
        }

        let request = self.create_request(resource, verb, params.unwrap_or_default())?;
        self.send_request(request).await
    }

    pub async fn get(&self, resource: &str, params: Option<Params<'_>>) -> Result<Value> {
        self.execute(Verb::Get, resource, params).await
    }

    pub async fn post(&self, resource: &str, params: Option<Params<'_>>) -> Result<Value> {
        self.execute(Verb::Post, resource, params).await
    }

    pub async fn put(&self, resource: &str, params: Option<Params<'_>>) -> Result<Value> {
        self.execute(Verb::Put, resource, params).await
    }

    pub async fn delete(&self, resource: &str, params: Option<Params<'_>>) -> Result<Value> {
        self.execute(Verb::Delete, resource, params).await
    }
}

impl fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminClient")
            .field("api_url", &self.api_url)
            .field("credentials", &self.credentials)
            .field("pipeline_ready", &self.pipeline.initialized())
            .finish()
    }
}

//! reqwest-backed transport
//!
//! Sends `AdminRequest`s as-is. HTTP error statuses come back as ordinary
//! responses; the client's error-mapping middleware turns them into errors.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rgw_core::{AdminRequest, AdminResponse, Error, HttpTransport, Result};
use tracing::{debug, warn};

/// HTTP transport built on `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: Client,
}

impl ReqwestTransport {
    /// Create a transport with default settings
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Start configuring a transport
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    /// Wrap an already configured `reqwest::Client`
    pub fn from_client(http_client: Client) -> Self {
        Self { http_client }
    }
}

/// Builder for [`ReqwestTransport`]
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransportBuilder {
    timeout: Option<Duration>,
    insecure: bool,
}

impl ReqwestTransportBuilder {
    /// Total timeout per request; none by default
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Accept invalid TLS certificates
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn build(self) -> Result<ReqwestTransport> {
        let mut builder = Client::builder().danger_accept_invalid_certs(self.insecure);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let http_client = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(ReqwestTransport { http_client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send_request(&self, request: AdminRequest) -> Result<AdminResponse> {
        let mut request_builder = self
            .http_client
            .request(request.method().clone(), request.uri().clone())
            .headers(request.headers().clone());

        if !request.body().is_empty() {
            request_builder = request_builder.body(request.body().to_vec());
        }

        let response = request_builder
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request failed: {e}")))?;

        let status = response.status();
        let headers = response.headers().clone();
        debug!(status = status.as_u16(), "Received admin API response");

        let response = match response.bytes().await {
            Ok(bytes) => AdminResponse::new(status, bytes.to_vec()),
            Err(e) => {
                warn!(error = %e, "Failed to read response body");
                AdminResponse::unreadable(status, e.to_string())
            }
        };

        Ok(response.with_headers(headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, StatusCode};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;
    use url::Url;

    fn local_transport() -> ReqwestTransport {
        ReqwestTransport::from_client(Client::builder().no_proxy().build().unwrap())
    }

    /// Serve one canned HTTP response and hand back the raw request text
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            String::from_utf8_lossy(&raw).into_owned()
        });

        (base_url, handle)
    }

    #[tokio::test]
    async fn test_send_request_forwards_headers() {
        let (base_url, server) = serve_once("200 OK", r#"{"ok":true}"#).await;

        let request = AdminRequest::new(
            Method::GET,
            Url::parse(&format!("{base_url}/admin/info?format=json")).unwrap(),
        )
        .with_header("x-amz-test", "yes")
        .unwrap();

        let response = local_transport().send_request(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.text(), r#"{"ok":true}"#);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );

        let raw = server.await.unwrap().to_ascii_lowercase();
        assert!(raw.starts_with("get /admin/info?format=json http/1.1"));
        assert!(raw.contains("x-amz-test: yes"));
    }

    #[tokio::test]
    async fn test_error_status_is_returned_as_response() {
        let (base_url, server) = serve_once("404 Not Found", r#"{"Code":"NoSuchKey"}"#).await;

        let request = AdminRequest::new(
            Method::DELETE,
            Url::parse(&format!("{base_url}/admin/user?uid=x&format=json")).unwrap(),
        );

        let response = local_transport().send_request(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.text(), r#"{"Code":"NoSuchKey"}"#);

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let request = AdminRequest::new(
            Method::GET,
            Url::parse(&format!("http://{addr}/admin/user?format=json")).unwrap(),
        );

        let err = local_transport().send_request(request).await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[test]
    fn test_builder_options() {
        let transport = ReqwestTransport::builder()
            .timeout(Duration::from_secs(5))
            .insecure(true)
            .build();
        assert!(transport.is_ok());
    }
}

//! Outbound HTTP to the provider.
//!
//! [`HttpTransport`] is the capability the callback handler talks through;
//! [`HyperTransport`] is the production implementation built on a pooled
//! hyper client with rustls and transparent gzip/deflate decoding.

use crate::config::HttpClientConfig;
use crate::error::TransportError;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{ACCEPT, CONTENT_TYPE, HeaderValue, USER_AGENT};
use hyper::{Method, Request, StatusCode};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use once_cell::sync::OnceCell;
use rustls::{ClientConfig, RootCertStore};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tower::ServiceExt;
use tower_http::decompression::Decompression;

/// Status and fully-read body of a provider response.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Body as text for diagnostics.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub trait HttpTransport: Send + Sync {
    /// POST `form` as `application/x-www-form-urlencoded` to `url`.
    fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;

    /// GET `url`; the query string is already part of it.
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

static TLS_CONFIG: OnceCell<Arc<ClientConfig>> = OnceCell::new();

/// Shared TLS client configuration with the webpki root store, built once per process.
pub fn shared_tls_config() -> Result<Arc<ClientConfig>, TransportError> {
    TLS_CONFIG
        .get_or_try_init(|| {
            let mut root_cert_store = RootCertStore::empty();
            root_cert_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

            let config = ClientConfig::builder_with_provider(Arc::new(
                rustls::crypto::ring::default_provider(),
            ))
            .with_safe_default_protocol_versions()
            .map_err(|e| TransportError::InvalidRequest(format!("TLS setup failed: {e}")))?
            .with_root_certificates(root_cert_store)
            .with_no_client_auth();

            Ok(Arc::new(config))
        })
        .cloned()
}

type HttpsClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

#[derive(Clone)]
pub struct HyperTransport {
    client: Decompression<HttpsClient>,
    timeout: Duration,
    user_agent: HeaderValue,
}

impl HyperTransport {
    pub fn new(config: &HttpClientConfig) -> Result<Self, TransportError> {
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| TransportError::InvalidRequest(format!("invalid user agent: {e}")))?;
        let tls = shared_tls_config()?;
        let connector = HttpsConnectorBuilder::new()
            .with_tls_config((*tls).clone())
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            client: Decompression::new(client),
            timeout: config.timeout(),
            user_agent,
        })
    }

    async fn send(&self, request: Request<Full<Bytes>>) -> Result<HttpResponse, TransportError> {
        let client = self.client.clone();
        let exchange = async move {
            let response = client
                .oneshot(request)
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;
            let status = response.status();
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?
                .to_bytes();
            Ok(HttpResponse { status, body })
        };

        timeout(self.timeout, exchange)
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))?
    }
}

impl HttpTransport for HyperTransport {
    #[tracing::instrument(name = "provider_post", level = "debug", skip(self, form))]
    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<HttpResponse, TransportError> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form)
            .finish();
        let request = Request::builder()
            .method(Method::POST)
            .uri(url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, self.user_agent.clone())
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        self.send(request).await
    }

    // The URL carries the access token, so it is kept out of the span.
    #[tracing::instrument(name = "provider_get", level = "debug", skip_all)]
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, self.user_agent.clone())
            .body(Full::new(Bytes::new()))
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        self.send(request).await
    }
}

//! HTTP transport
//!
//! Sends JSON requests to `{origin}/api/...`, unwraps the
//! `{success, data, message}` envelope and folds every failure into
//! [`TransportError`].

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::ApiResponse;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, TransportError};

/// Body of a failed response. Matches both the envelope and the
/// framework's default error document, which also carries `message`.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client trait
///
/// Every method returns the envelope's `data`, which is `None` when the
/// backend sends `null` (deletes).
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<Option<T>>;
    async fn post<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<Option<T>>;
    async fn put<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<Option<T>>;
    async fn delete<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<Option<T>>;
}

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
}

impl NetworkHttpClient {
    /// Build a client for `config.base_url` + `/api`.
    ///
    /// Requests carry JSON headers, share a cookie store (session cookies
    /// survive across calls) and are bounded by `config.timeout`.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base(),
        })
    }

    /// Base URL, including the `/api` prefix
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<Option<T>> {
        let url = self.url(path);
        tracing::debug!(%method, %url, "Sending request");

        let mut req = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| {
            let err = transport_error(&e);
            tracing::warn!(%method, %url, error = %err, "Request failed");
            err
        })?;

        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> ClientResult<Option<T>> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::from(transport_error(&e)))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %detail, "Backend rejected request");
            return Err(TransportError::rejected(status.as_u16(), detail).into());
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&text)
            .map_err(|e| ClientError::InvalidResponse(format!("malformed envelope: {e}")))?;

        if !envelope.success {
            let detail = envelope.message().unwrap_or_default().to_string();
            tracing::warn!(status = status.as_u16(), %detail, "Backend reported failure");
            return Err(TransportError::rejected(status.as_u16(), detail).into());
        }

        Ok(envelope.data)
    }
}

/// Map a reqwest failure onto the transport taxonomy
fn transport_error(err: &reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::timeout("Request timed out")
    } else if let Some(status) = err.status() {
        TransportError::rejected(status.as_u16(), String::new())
    } else {
        TransportError::network_unreachable(format!("Cannot connect to server: {err}"))
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<Option<T>> {
        self.send::<T, ()>(Method::GET, path, None).await
    }

    async fn post<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<Option<T>> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn put<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<Option<T>> {
        self.send(Method::PUT, path, Some(body)).await
    }

    async fn delete<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<Option<T>> {
        self.send::<T, ()>(Method::DELETE, path, None).await
    }
}

//! HTTP client for network-based API calls

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::ApiErrorBody;

use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client trait
///
/// Paths are relative to the configured base URL (`/cajero/pedidos`).
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn post<T: DeserializeOwned, B: serde::Serialize + std::marker::Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    /// GET returning the raw body (rendered reports)
    async fn get_bytes(&self, path: &str) -> ClientResult<Vec<u8>>;
    fn token(&self) -> Option<&str>;
}

/// Network HTTP client backed by reqwest
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Turn a non-success status into `ClientError::Api`, keeping the
    /// backend message when the body carries one.
    async fn check_status(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        let body = ApiErrorBody::parse(&text);
        tracing::warn!(
            path = %path,
            status = status.as_u16(),
            message = body.message().unwrap_or("-"),
            "API request failed"
        );
        Err(ClientError::Api {
            status: status.as_u16(),
            message: body.message().map(str::to_string),
        })
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let response = self.check_status(path, response).await?;
        let text = response.text().await?;
        // Command endpoints may answer with an empty body
        let payload = if text.trim().is_empty() {
            "null"
        } else {
            text.as_str()
        };
        serde_json::from_str(payload).map_err(|e| {
            tracing::warn!(path = %path, error = %e, "Malformed response body");
            ClientError::InvalidResponse(format!("{}: {}", path, e))
        })
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        tracing::debug!(path = %path, "GET");
        let req = self.authorize(self.client.get(self.url(path)));
        let response = req.send().await?;
        self.handle_response(path, response).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize + std::marker::Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        tracing::debug!(path = %path, "POST");
        let req = self.authorize(self.client.post(self.url(path)).json(body));
        let response = req.send().await?;
        self.handle_response(path, response).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        tracing::debug!(path = %path, "POST (no body)");
        let req = self.authorize(self.client.post(self.url(path)));
        let response = req.send().await?;
        self.handle_response(path, response).await
    }

    async fn get_bytes(&self, path: &str) -> ClientResult<Vec<u8>> {
        tracing::debug!(path = %path, "GET (binary)");
        let req = self.authorize(self.client.get(self.url(path)));
        let response = req.send().await?;
        let response = self.check_status(path, response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

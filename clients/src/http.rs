//! Shared REST plumbing for the service clients.

use serde::Serialize;
use serde::de::DeserializeOwned;

use swappr_common::error::ApiError;

/// A thin wrapper over [`reqwest::Client`] rooted at one service's base URL,
/// translating every failure mode into [`ApiError`].
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    http: reqwest::Client,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        RestClient {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn check(endpoint: &str, response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let endpoint = self.url(path);
        let response = self
            .http
            .get(&endpoint)
            .send()
            .await
            .map_err(|err| ApiError::transport(&endpoint, err))?;
        Self::check(&endpoint, response)
            .await?
            .json()
            .await
            .map_err(|err| ApiError::response(&endpoint, err))
    }

    /// GET that reports a missing resource as `None` instead of an error.
    pub async fn get_json_opt<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, ApiError> {
        let endpoint = self.url(path);
        let response = self
            .http
            .get(&endpoint)
            .send()
            .await
            .map_err(|err| ApiError::transport(&endpoint, err))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::check(&endpoint, response)
            .await?
            .json()
            .await
            .map(Some)
            .map_err(|err| ApiError::response(&endpoint, err))
    }

    pub async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let endpoint = self.url(path);
        let response = self
            .http
            .post(&endpoint)
            .json(body)
            .send()
            .await
            .map_err(|err| ApiError::transport(&endpoint, err))?;
        Self::check(&endpoint, response).await.map(|_| ())
    }

    pub async fn post_json_response<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let endpoint = self.url(path);
        let response = self
            .http
            .post(&endpoint)
            .json(body)
            .send()
            .await
            .map_err(|err| ApiError::transport(&endpoint, err))?;
        Self::check(&endpoint, response)
            .await?
            .json()
            .await
            .map_err(|err| ApiError::response(&endpoint, err))
    }

    pub async fn patch_json<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let endpoint = self.url(path);
        let response = self
            .http
            .patch(&endpoint)
            .json(body)
            .send()
            .await
            .map_err(|err| ApiError::transport(&endpoint, err))?;
        Self::check(&endpoint, response).await.map(|_| ())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let endpoint = self.url(path);
        let response = self
            .http
            .delete(&endpoint)
            .send()
            .await
            .map_err(|err| ApiError::transport(&endpoint, err))?;
        Self::check(&endpoint, response).await.map(|_| ())
    }
}

//! Shared HTTP plumbing
//!
//! Every remote (task tracker, chat API, scraped sites) goes through one
//! [`ApiClient`] carrying the same request policy: 10 second timeout,
//! redirect following, identifying User-Agent, optional bearer auth, and
//! uniform mapping of error statuses to [`Error::Request`].

use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::error;

use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("EpisodeTracker/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client bound to one API base URL
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_bearer_token(base_url, None)
    }

    pub fn with_bearer_token(
        base_url: impl Into<String>,
        bearer_token: Option<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            bearer_token,
        })
    }

    /// GET a path and return the response body as text (used by the
    /// site scrapers)
    pub async fn get_text(&self, path: &str) -> Result<String> {
        let response = self.send(Method::GET, path, &[], None::<&()>).await?;
        response.text().await.map_err(Error::Http)
    }

    /// GET a path with query parameters and decode the JSON response
    pub async fn get_json<R: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<R> {
        let response = self.send(Method::GET, path, params, None::<&()>).await?;
        response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))
    }

    /// GET a path with query parameters, discarding the response body
    pub async fn get_ok(&self, path: &str, params: &[(&str, &str)]) -> Result<()> {
        self.send(Method::GET, path, params, None::<&()>).await?;
        Ok(())
    }

    /// POST a JSON body and decode the JSON response
    pub async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let response = self.send(Method::POST, path, &[], Some(body)).await?;
        response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.client.request(method.clone(), &url);
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(Error::Http)?;
        let status = response.status();
        if status.as_u16() >= 400 {
            let body = response.text().await.unwrap_or_default();
            error!(
                method = %method,
                url = %url,
                status = status.as_u16(),
                body = %body,
                "Error sending HTTP request"
            );
            return Err(Error::Request {
                url,
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

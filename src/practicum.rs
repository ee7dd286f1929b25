use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::fmt;
use tracing::debug;

use crate::config::{Config, ConfigError};
use crate::error::PollError;
use crate::model::Watermark;

/// Anything that can answer "what changed since `since`?".
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self, since: Watermark) -> Result<Value, PollError>;
}

#[derive(Clone)]
pub struct PracticumClient {
    http: Client,
    endpoint: Url,
    token: String,
}

impl fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl PracticumClient {
    pub fn new(token: String, endpoint: Url) -> Self {
        let http = Client::builder()
            .user_agent(concat!("hw-watchbot/", env!("CARGO_PKG_VERSION")))
            .no_proxy()
            .build()
            .unwrap_or_default();
        Self {
            http,
            endpoint,
            token,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(cfg.practicum.token.clone(), cfg.endpoint_url()?))
    }

    pub fn build_request(&self, since: Watermark) -> Result<reqwest::Request, PollError> {
        self.http
            .get(self.endpoint.clone())
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", since.timestamp())])
            .build()
            .map_err(PollError::Transport)
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    async fn fetch(&self, since: Watermark) -> Result<Value, PollError> {
        let request = self.build_request(since)?;
        debug!(url = %request.url(), "requesting homework statuses");
        let res = self
            .http
            .execute(request)
            .await
            .map_err(PollError::Transport)?;

        let status = res.status();
        if status != StatusCode::OK {
            debug!(%status, "status API answered with an error");
            return Err(PollError::BadStatus(status.as_u16()));
        }

        let body = res.text().await.map_err(PollError::Transport)?;
        serde_json::from_str(&body)
            .map_err(|err| PollError::shape(format!("response body is not JSON: {err}")))
    }
}

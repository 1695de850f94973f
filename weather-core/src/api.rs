use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::fmt::Debug;
use tracing::{debug, warn};

use crate::{config::ApiConfig, error::TransportError, model::WeatherModel};

/// What came back from a completed HTTP exchange.
///
/// `body` is `None` for non-2xx responses and for 2xx bodies that did not
/// decode into a complete [`WeatherModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<WeatherModel>,
}

impl ApiResponse {
    pub fn ok(model: WeatherModel) -> Self {
        Self { status: 200, body: Some(model) }
    }

    pub fn failed(status: u16) -> Self {
        Self { status, body: None }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP + decode capability the store is built on.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    async fn current(&self, city: &str) -> Result<ApiResponse, TransportError>;
}

/// WeatherAPI.com `current.json` over reqwest.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    config: ApiConfig,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { config, http })
    }

    /// The city goes out exactly as typed; reqwest handles the encoding.
    fn request(&self, city: &str) -> RequestBuilder {
        self.http
            .get(self.config.current_url())
            .query(&[("key", self.config.api_key.as_str()), ("q", city)])
    }
}

#[async_trait]
impl WeatherApi for WeatherApiClient {
    async fn current(&self, city: &str) -> Result<ApiResponse, TransportError> {
        debug!(city, url = %self.config.current_url(), "requesting current conditions");

        let res = self.request(city).send().await?;
        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(%status, body = %truncate_body(&body), "WeatherAPI current request failed");
            return Ok(ApiResponse::failed(status.as_u16()));
        }

        let body = res.text().await?;
        let model = match WeatherModel::from_json(&body) {
            Ok(model) => Some(model),
            Err(err) => {
                warn!(error = %err, body = %truncate_body(&body), "Failed to decode WeatherAPI response");
                None
            }
        };

        Ok(ApiResponse { status: status.as_u16(), body: model })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

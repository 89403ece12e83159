//! National Weather Service client.
//!
//! A forecast takes two calls: `/points/{lat},{lon}` names the forecast
//! URL for that grid cell, then that URL returns the forecast itself.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use userdesk_core::{NetworkError, ReqwestErrorExt, WeatherConfig};

use crate::error::{WeatherError, WeatherResult};
use crate::regions::Coordinates;

/// Upstream forecast body, passed through uninterpreted.
pub type ForecastData = serde_json::Value;

/// Characters of an error body kept in the failure detail.
const MAX_ERROR_BODY: usize = 500;

#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Look up the forecast URL for a coordinate pair.
    async fn resolve_forecast_locator(&self, coords: Coordinates) -> WeatherResult<String>;

    /// Fetch the forecast at a URL returned by `resolve_forecast_locator`.
    async fn fetch_forecast(&self, locator: &str) -> WeatherResult<ForecastData>;

    /// Both calls in sequence. A failure in either fails the whole fetch;
    /// nothing is retried.
    async fn forecast_at(&self, coords: Coordinates) -> WeatherResult<ForecastData> {
        let locator = self.resolve_forecast_locator(coords).await?;
        self.fetch_forecast(&locator).await
    }
}

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: PointsProperties,
}

#[derive(Debug, Deserialize)]
struct PointsProperties {
    #[serde(default)]
    forecast: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NwsClient {
    client: Client,
    base_url: String,
}

impl NwsClient {
    pub fn new(config: &WeatherConfig) -> WeatherResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| WeatherError::ClientSetup(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// NWS redirects anything past four decimal places, so round first.
    fn points_url(&self, coords: Coordinates) -> String {
        format!(
            "{}/points/{},{}",
            self.base_url,
            round4(coords.latitude),
            round4(coords.longitude)
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> WeatherResult<T> {
        tracing::debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/geo+json")
            .send()
            .await
            .map_err(|e| WeatherError::upstream(e.into_network_error().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message: String = body.chars().take(MAX_ERROR_BODY).collect();
            let err = NetworkError::ServerError {
                status: status.as_u16(),
                message: if message.is_empty() {
                    status.to_string()
                } else {
                    message
                },
            };
            return Err(WeatherError::upstream(err.to_string()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| WeatherError::upstream(e.into_network_error().to_string()))
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[async_trait]
impl ForecastSource for NwsClient {
    async fn resolve_forecast_locator(&self, coords: Coordinates) -> WeatherResult<String> {
        let url = self.points_url(coords);
        let points: PointsResponse = self.get_json(&url).await?;

        points.properties.forecast.ok_or_else(|| {
            WeatherError::upstream(
                NetworkError::InvalidResponse(format!("no forecast URL in {}", url)).to_string(),
            )
        })
    }

    async fn fetch_forecast(&self, locator: &str) -> WeatherResult<ForecastData> {
        self.get_json(locator).await
    }
}

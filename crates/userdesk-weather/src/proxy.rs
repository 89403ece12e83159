//! Cache-fronted forecast lookup with stale-on-error fallback.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::cache::ForecastCache;
use crate::clock::Clock;
use crate::error::WeatherResult;
use crate::provider::{ForecastData, ForecastSource};
use crate::regions::RegionTable;

/// Attached to payloads served from an outdated entry after a failed refresh.
pub const STALE_WARNING: &str = "Stale data due to fetch error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Fresh cache hit, no upstream call.
    Cached,
    /// Fetched upstream during this request.
    Fetched,
    /// Upstream failed; served from an older entry.
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResponse {
    pub payload: ForecastData,
    pub freshness: Freshness,
}

impl ForecastResponse {
    /// JSON body for the client. Stale payloads gain a `warning` field;
    /// a non-object payload is wrapped as `{"data": ...}` first.
    pub fn into_body(self) -> Value {
        if self.freshness != Freshness::Stale {
            return self.payload;
        }

        let mut body = match self.payload {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        body.insert("warning".to_string(), Value::String(STALE_WARNING.to_string()));
        Value::Object(body)
    }
}

pub struct WeatherProxy {
    regions: RegionTable,
    cache: ForecastCache,
    source: Arc<dyn ForecastSource>,
    clock: Arc<dyn Clock>,
}

impl WeatherProxy {
    pub fn new(
        regions: RegionTable,
        cache: ForecastCache,
        source: Arc<dyn ForecastSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            regions,
            cache,
            source,
            clock,
        }
    }

    pub fn cache(&self) -> &ForecastCache {
        &self.cache
    }

    /// Forecast for a state code (any case).
    ///
    /// Unknown codes fail before any upstream call. A fresh entry is served
    /// as is. Otherwise upstream is asked; on success the entry is replaced,
    /// on failure any entry for the code is served as stale, and only when
    /// there is none does the upstream error come back.
    pub async fn forecast(&self, raw_code: &str) -> WeatherResult<ForecastResponse> {
        let (code, coords) = self.regions.resolve(raw_code)?;
        let now = self.clock.now();
        let cached = self.cache.get(code);

        if let Some(entry) = &cached {
            if self.cache.is_fresh(entry, now) {
                tracing::debug!("Weather cache hit for {}", code);
                return Ok(ForecastResponse {
                    payload: entry.payload.clone(),
                    freshness: Freshness::Cached,
                });
            }
        }

        tracing::debug!(
            "Weather cache {} for {}, fetching",
            if cached.is_some() { "stale" } else { "miss" },
            code
        );

        match self.source.forecast_at(coords).await {
            Ok(payload) => {
                self.cache.put(code, payload.clone(), now);
                tracing::info!("Refreshed forecast for {}", code);
                Ok(ForecastResponse {
                    payload,
                    freshness: Freshness::Fetched,
                })
            }
            Err(e) => match cached {
                Some(entry) => {
                    tracing::warn!(
                        "Forecast fetch for {} failed, serving entry from {}: {}",
                        code,
                        entry.fetched_at,
                        e
                    );
                    Ok(ForecastResponse {
                        payload: entry.payload,
                        freshness: Freshness::Stale,
                    })
                }
                None => {
                    tracing::warn!("Forecast fetch for {} failed with nothing cached: {}", code, e);
                    Err(e)
                }
            },
        }
    }
}

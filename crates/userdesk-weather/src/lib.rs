//! Weather proxy for Userdesk
//!
//! Resolves US state codes to coordinates, fetches forecasts from the
//! National Weather Service and caches them per state for an hour. When a
//! refresh fails, the last cached forecast is served with a warning.

pub mod cache;
pub mod clock;
pub mod error;
pub mod provider;
pub mod proxy;
pub mod regions;

pub use cache::{CacheEntry, ForecastCache, CACHE_TTL_SECS};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{WeatherError, WeatherResult};
pub use provider::{ForecastData, ForecastSource, NwsClient};
pub use proxy::{ForecastResponse, Freshness, WeatherProxy, STALE_WARNING};
pub use regions::{Coordinates, RegionCode, RegionTable};

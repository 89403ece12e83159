use std::sync::Arc;

use userdesk_core::{AppError, Config};
use userdesk_users::{SqliteUserStore, UserClient, UserStoreError};
use userdesk_weather::{ForecastCache, NwsClient, RegionTable, SystemClock, WeatherProxy};

/// Shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub users: UserClient,
    pub weather: Arc<WeatherProxy>,
}

impl AppState {
    pub fn new(users: UserClient, weather: WeatherProxy) -> Self {
        Self {
            users,
            weather: Arc::new(weather),
        }
    }

    /// Open the user database and build the weather proxy against NWS.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let store = SqliteUserStore::new(&config.database.path).map_err(|e| match e {
            UserStoreError::Storage(db) => AppError::Database(db),
            other => AppError::Other(anyhow::anyhow!(other)),
        })?;
        tracing::info!("Opened user database at {}", config.database.path.display());

        let source = NwsClient::new(&config.weather).map_err(|e| anyhow::anyhow!(e))?;
        let weather = WeatherProxy::new(
            RegionTable::us_states(),
            ForecastCache::new(),
            Arc::new(source),
            Arc::new(SystemClock),
        );

        Ok(Self::new(UserClient::new(store), weather))
    }
}

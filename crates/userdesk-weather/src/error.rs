use thiserror::Error;

/// Weather proxy errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The code is not in the coordinate table. Never retried.
    #[error("Unsupported state code: {0}")]
    InvalidRegion(String),

    /// Either upstream call failed; carries the underlying cause.
    #[error("{0}")]
    Upstream(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientSetup(String),
}

impl WeatherError {
    pub fn upstream(detail: impl Into<String>) -> Self {
        Self::Upstream(detail.into())
    }
}

pub type WeatherResult<T> = Result<T, WeatherError>;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use userdesk_weather::WeatherError;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/weather/:state_code`
pub async fn forecast(
    State(state): State<AppState>,
    Path(state_code): Path<String>,
) -> Result<Json<Value>, ApiError> {
    match state.weather.forecast(&state_code).await {
        Ok(response) => Ok(Json(response.into_body())),
        Err(WeatherError::InvalidRegion(_)) => Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Unsupported state code",
        )),
        Err(e) => Err(
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch weather data")
                .with_details(e.to_string()),
        ),
    }
}

//! JSON error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use userdesk_users::UserStoreError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

/// A failed request: status, a fixed summary, and optional detail.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    details: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str) -> Self {
        Self {
            status,
            error,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Map a store failure under the given summary. Input problems are 400,
    /// everything else 500.
    pub fn from_store(error: &'static str, err: UserStoreError) -> Self {
        let status = if err.is_client_error() {
            tracing::debug!("{}: {}", error, err);
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!("{}: {}", error, err);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self::new(status, error).with_details(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.error,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use userdesk_core::DatabaseError;

    #[test]
    fn test_store_errors_split_by_cause() {
        let err = ApiError::from_store("Failed", UserStoreError::validation("bad email"));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = ApiError::from_store(
            "Failed",
            UserStoreError::Storage(DatabaseError::QueryFailed("disk".into())),
        );
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}

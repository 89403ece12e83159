use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use userdesk_users::{parse_min_count, DuplicateName, NewUser, User};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ActiveQuery {
    active: Option<String>,
}

impl ActiveQuery {
    /// `true` selects active users, any other value inactive ones.
    fn filter(&self) -> Option<bool> {
        self.active.as_deref().map(|v| v == "true")
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DuplicateQuery {
    count: Option<String>,
    active: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DuplicatesResponse {
    duplicates: Vec<DuplicateName>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    message: &'static str,
    deleted: usize,
}

/// `POST /api/users`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    const FAILED: &str = "Failed to create user";

    let Json(request) = payload.map_err(|rejection| {
        ApiError::new(StatusCode::BAD_REQUEST, FAILED).with_details(rejection.body_text())
    })?;

    let user = state
        .users
        .create_user(request)
        .await
        .map_err(|e| ApiError::from_store(FAILED, e))?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /api/users`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ActiveQuery>,
) -> Result<Json<Vec<User>>, ApiError> {
    state
        .users
        .list_users(query.filter())
        .await
        .map(Json)
        .map_err(|e| ApiError::from_store("Failed to fetch users", e))
}

/// `DELETE /api/users`
pub async fn delete_all(State(state): State<AppState>) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = state
        .users
        .delete_all()
        .await
        .map_err(|e| ApiError::from_store("Failed to delete users", e))?;

    tracing::info!("Deleted {} users", deleted);
    Ok(Json(DeletedResponse {
        message: "All users deleted successfully",
        deleted,
    }))
}

/// `GET /api/users/by-country/:code`
pub async fn by_country(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<ActiveQuery>,
) -> Result<Json<Vec<User>>, ApiError> {
    state
        .users
        .list_by_country(&code, query.filter())
        .await
        .map(Json)
        .map_err(|e| ApiError::from_store("Failed to fetch users by country", e))
}

/// `GET /api/users/duplicate-names`
pub async fn duplicate_names(
    State(state): State<AppState>,
    Query(query): Query<DuplicateQuery>,
) -> Result<Json<DuplicatesResponse>, ApiError> {
    let min_count = parse_min_count(query.count.as_deref());
    let active = ActiveQuery {
        active: query.active,
    }
    .filter();

    let duplicates = state
        .users
        .duplicate_names(min_count, active)
        .await
        .map_err(|e| ApiError::from_store("Failed to fetch duplicate names", e))?;

    Ok(Json(DuplicatesResponse { duplicates }))
}

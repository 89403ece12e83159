pub mod users;
pub mod weather;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Logs `METHOD URI` for every request.
pub async fn log_requests(req: Request, next: Next) -> Response {
    tracing::info!("{} {}", req.method(), req.uri());
    next.run(req).await
}

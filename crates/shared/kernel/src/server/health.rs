use super::ApiState;
use axum::extract::State;
use axum::http::header;
use axum::{Json, response::IntoResponse};
use folio_derive::{api_handler, api_model};
use folio_domain::constants::TAG_SYSTEM;

#[api_model]
/// Health check response
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    /// RFC 3339 time of the probe
    pub timestamp: String,
    /// Uptime in seconds
    pub uptime: u64,
    pub version: String,
    /// `connected` or `disconnected`
    pub database: String,
}

#[api_handler(
    get,
    path = "/health",
    responses((status = OK, description = "Healthcheck endpoint", body = HealthResponse)),
    tag = TAG_SYSTEM,
)]
pub(super) async fn health_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let database = if state.database.is_healthy().await { "connected" } else { "disconnected" };
    let body = HealthResponse {
        success: true,
        message: "Server is running".to_owned(),
        timestamp: crate::timestamp(),
        uptime: state.started_at.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        database: database.to_owned(),
    };

    (
        [
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(body),
    )
}

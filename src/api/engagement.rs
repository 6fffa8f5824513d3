use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::error_response;
use crate::domain::NewAnalyticsEvent;
use crate::infrastructure::AppState;

#[utoipa::path(
    get,
    path = "/api/profiles/{id}",
    params(("id" = String, Path, description = "Profile id")),
    responses(
        (status = 200, description = "Profile found"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.analytics.get_profile(&id).await {
        Ok(Some(profile)) => (StatusCode::OK, Json(profile)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Profile not found" })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
pub struct SubscribeRequest {
    email: String,
}

#[utoipa::path(
    post,
    path = "/api/newsletter",
    responses(
        (status = 201, description = "Subscribed"),
        (status = 400, description = "Invalid or already subscribed email")
    )
)]
pub async fn subscribe_newsletter(
    State(state): State<AppState>,
    Json(payload): Json<SubscribeRequest>,
) -> impl IntoResponse {
    match state.analytics.subscribe_newsletter(&payload.email).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(json!({ "message": "Subscribed" })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/events",
    responses(
        (status = 204, description = "Event recorded"),
        (status = 400, description = "Missing event_type")
    )
)]
pub async fn track_event(
    State(state): State<AppState>,
    Json(payload): Json<NewAnalyticsEvent>,
) -> impl IntoResponse {
    match state.analytics.track_event(payload).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

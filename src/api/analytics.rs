//! Dashboard analytics handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use super::error_response;
use crate::infrastructure::AppState;

#[utoipa::path(
    get,
    path = "/api/analytics/overview",
    responses(
        (status = 200, description = "Top-level counts"),
        (status = 500, description = "A backend query failed")
    )
)]
pub async fn get_overview(State(state): State<AppState>) -> impl IntoResponse {
    match state.analytics.get_overview_stats().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/analytics/categories",
    responses((status = 200, description = "Article count per category"))
)]
pub async fn get_categories(State(state): State<AppState>) -> impl IntoResponse {
    match state.analytics.get_category_distribution().await {
        Ok(distribution) => (StatusCode::OK, Json(distribution)).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/analytics/activity",
    responses((status = 200, description = "Articles and comments per day for the last 7 days"))
)]
pub async fn get_activity(State(state): State<AppState>) -> impl IntoResponse {
    match state.analytics.get_content_activity().await {
        Ok(days) => (StatusCode::OK, Json(days)).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/analytics/recent",
    responses((status = 200, description = "Five newest articles and comments"))
)]
pub async fn get_recent(State(state): State<AppState>) -> impl IntoResponse {
    match state.analytics.get_recent_activity_feed().await {
        Ok(feed) => (StatusCode::OK, Json(feed)).into_response(),
        Err(e) => error_response(e),
    }
}

pub mod analytics;
pub mod campaigns;
pub mod engagement;
pub mod gamification;
pub mod health;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::domain::DomainError;
use crate::infrastructure::AppState;

/// Map a domain error onto an HTTP response with a JSON `error` body
pub fn error_response(error: DomainError) -> Response {
    let status = match &error {
        DomainError::NotFound => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Network(_) => StatusCode::BAD_GATEWAY,
        DomainError::Database(_) | DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!("Request failed: {}", error);
    }

    (status, Json(json!({ "error": error.to_string() }))).into_response()
}

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Dashboard analytics
        .route("/analytics/overview", get(analytics::get_overview))
        .route("/analytics/categories", get(analytics::get_categories))
        .route("/analytics/activity", get(analytics::get_activity))
        .route("/analytics/recent", get(analytics::get_recent))
        // Profiles, newsletter and events
        .route("/profiles/:id", get(engagement::get_profile))
        .route("/newsletter", post(engagement::subscribe_newsletter))
        .route("/events", post(engagement::track_event))
        // Campaign microsites
        .route("/campaigns", get(campaigns::list_campaigns))
        .route(
            "/campaigns/:slug/donations",
            get(campaigns::list_donations).post(campaigns::create_donation),
        )
        .route("/campaigns/:slug/payments", post(campaigns::record_payment))
        .route("/campaigns/:slug/volunteers", post(campaigns::sign_up_volunteer))
        // Gamification
        .route("/gamification", get(gamification::get_user_status))
        .route("/gamification/xp", post(gamification::award_xp))
        .route("/gamification/streak", post(gamification::update_streak))
        .route("/gamification/badges", post(gamification::unlock_badge))
        .route(
            "/gamification/achievements/:id",
            post(gamification::update_achievement),
        )
        .with_state(state)
}

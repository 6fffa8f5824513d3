use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error_response;
use crate::infrastructure::AppState;
use crate::services::gamification_service::{Badge, GamificationState};

#[derive(Serialize)]
pub struct UserStatus {
    #[serde(flatten)]
    pub state: GamificationState,
    pub current_level: u32,
    pub xp_to_next_level: u64,
}

impl From<GamificationState> for UserStatus {
    fn from(state: GamificationState) -> Self {
        Self {
            current_level: state.current_level(),
            xp_to_next_level: state.xp_to_next_level(),
            state,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/gamification",
    responses((status = 200, description = "XP, level, streak, badges and achievements"))
)]
pub async fn get_user_status(State(state): State<AppState>) -> impl IntoResponse {
    match state.gamification.state().await {
        Ok(snapshot) => (StatusCode::OK, Json(UserStatus::from(snapshot))).into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
pub struct AwardXpRequest {
    amount: u32,
    source: String,
}

#[utoipa::path(
    post,
    path = "/api/gamification/xp",
    responses(
        (status = 200, description = "New XP total and level"),
        (status = 400, description = "Zero amount")
    )
)]
pub async fn award_xp(
    State(state): State<AppState>,
    Json(payload): Json<AwardXpRequest>,
) -> impl IntoResponse {
    match state
        .gamification
        .award_xp(payload.amount, &payload.source)
        .await
    {
        Ok(award) => (StatusCode::OK, Json(award)).into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
pub struct StreakRequest {
    /// The visitor's local calendar date; the server date is used when absent
    today: Option<NaiveDate>,
}

#[utoipa::path(
    post,
    path = "/api/gamification/streak",
    responses((status = 200, description = "Streak outcome: unchanged, extended or reset"))
)]
pub async fn update_streak(
    State(state): State<AppState>,
    payload: Option<Json<StreakRequest>>,
) -> impl IntoResponse {
    let today = payload.and_then(|Json(req)| req.today);
    let result = match today {
        Some(date) => state.gamification.update_streak_on(date).await,
        None => state.gamification.update_streak().await,
    };

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => return error_response(e),
    };

    match state.gamification.state().await {
        Ok(snapshot) => Json(serde_json::json!({
            "outcome": outcome,
            "streak": snapshot.streak,
            "longest_streak": snapshot.longest_streak,
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/gamification/badges",
    responses(
        (status = 201, description = "Badge newly unlocked"),
        (status = 200, description = "Badge was already unlocked")
    )
)]
pub async fn unlock_badge(
    State(state): State<AppState>,
    Json(badge): Json<Badge>,
) -> impl IntoResponse {
    match state.gamification.unlock_badge(badge).await {
        Ok(true) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "unlocked": true })),
        )
            .into_response(),
        Ok(false) => Json(serde_json::json!({ "unlocked": false })).into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
pub struct AchievementProgressRequest {
    #[serde(default = "one")]
    progress: u32,
}

fn one() -> u32 {
    1
}

#[utoipa::path(
    post,
    path = "/api/gamification/achievements/{id}",
    params(("id" = String, Path, description = "Achievement id")),
    responses(
        (status = 200, description = "Updated achievement"),
        (status = 404, description = "Unknown achievement")
    )
)]
pub async fn update_achievement(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AchievementProgressRequest>,
) -> impl IntoResponse {
    match state
        .gamification
        .update_achievement(&id, payload.progress)
        .await
    {
        Ok(achievement) => Json(achievement).into_response(),
        Err(e) => error_response(e),
    }
}

//! Campaign microsite handlers: donation feed, payments and volunteers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use super::error_response;
use crate::infrastructure::AppState;
use crate::services::donation_service::{total_of, NewDonation, NewVolunteer, PaymentCapture};
use crate::services::DonationLedger;

fn find_campaign(state: &AppState, slug: &str) -> Result<Arc<DonationLedger>, Response> {
    state.campaign(slug).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Unknown campaign '{}'", slug) })),
        )
            .into_response()
    })
}

#[utoipa::path(
    get,
    path = "/api/campaigns",
    responses((status = 200, description = "Configured campaign slugs"))
)]
pub async fn list_campaigns(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "campaigns": state.campaign_slugs() }))
}

#[utoipa::path(
    get,
    path = "/api/campaigns/{slug}/donations",
    params(("slug" = String, Path, description = "Campaign slug")),
    responses(
        (status = 200, description = "Donators newest first, with the exact total in cents"),
        (status = 404, description = "Unknown campaign")
    )
)]
pub async fn list_donations(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    let ledger = match find_campaign(&state, &slug) {
        Ok(ledger) => ledger,
        Err(resp) => return resp,
    };

    let donators = match ledger.get_donators().await {
        Ok(donators) => donators,
        Err(e) => return error_response(e),
    };
    // Computed from the same list so the total always matches what is shown
    let total = match total_of(&donators) {
        Ok(total) => total,
        Err(e) => return error_response(e),
    };

    Json(json!({
        "campaign": slug,
        "donators": donators,
        "total": total,
        "total_display": total.to_string(),
    }))
    .into_response()
}

#[utoipa::path(
    post,
    path = "/api/campaigns/{slug}/donations",
    params(("slug" = String, Path, description = "Campaign slug")),
    responses(
        (status = 201, description = "Donation recorded"),
        (status = 400, description = "Non-positive amount, blank name, or a total the ledger cannot hold"),
        (status = 404, description = "Unknown campaign")
    )
)]
pub async fn create_donation(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<NewDonation>,
) -> impl IntoResponse {
    let ledger = match find_campaign(&state, &slug) {
        Ok(ledger) => ledger,
        Err(resp) => return resp,
    };

    match ledger.add_donation(payload).await {
        Ok(donator) => (StatusCode::CREATED, Json(donator)).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/campaigns/{slug}/payments",
    params(("slug" = String, Path, description = "Campaign slug")),
    responses(
        (status = 201, description = "Captured payment recorded as a donation"),
        (status = 400, description = "Invalid payment payload"),
        (status = 404, description = "Unknown campaign")
    )
)]
pub async fn record_payment(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<PaymentCapture>,
) -> impl IntoResponse {
    let ledger = match find_campaign(&state, &slug) {
        Ok(ledger) => ledger,
        Err(resp) => return resp,
    };

    match ledger.record_payment(payload).await {
        Ok(donator) => (StatusCode::CREATED, Json(donator)).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/campaigns/{slug}/volunteers",
    params(("slug" = String, Path, description = "Campaign slug")),
    responses(
        (status = 201, description = "Sign-up stored; `backend` names the store that accepted it"),
        (status = 400, description = "Missing name or invalid email"),
        (status = 404, description = "Unknown campaign")
    )
)]
pub async fn sign_up_volunteer(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<NewVolunteer>,
) -> impl IntoResponse {
    let ledger = match find_campaign(&state, &slug) {
        Ok(ledger) => ledger,
        Err(resp) => return resp,
    };

    match ledger.sign_up_volunteer(payload).await {
        Ok(receipt) => (StatusCode::CREATED, Json(receipt)).into_response(),
        Err(e) => error_response(e),
    }
}

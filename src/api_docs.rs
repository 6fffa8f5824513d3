use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::analytics::get_overview,
        api::analytics::get_categories,
        api::analytics::get_activity,
        api::analytics::get_recent,
        api::engagement::get_profile,
        api::engagement::subscribe_newsletter,
        api::engagement::track_event,
        api::campaigns::list_campaigns,
        api::campaigns::list_donations,
        api::campaigns::create_donation,
        api::campaigns::record_payment,
        api::campaigns::sign_up_volunteer,
        api::gamification::get_user_status,
        api::gamification::award_xp,
        api::gamification::update_streak,
        api::gamification::unlock_badge,
        api::gamification::update_achievement,
    ),
    tags(
        (name = "veritus", description = "Veritus engagement API")
    )
)]
pub struct ApiDoc;

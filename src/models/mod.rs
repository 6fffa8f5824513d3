pub mod analytics_event;
pub mod article;
pub mod campaign_signup;
pub mod comment;
pub mod local_store_entry;
pub mod newsletter_subscriber;
pub mod profile;
pub mod reel;
pub mod story;
pub mod support_ticket;

//! Services Layer
//!
//! This module contains pure business logic extracted from HTTP handlers.
//! Services receive their stores through constructors and never reach for globals.

pub mod analytics_service;
pub mod donation_service;
pub mod gamification_service;

// Re-export for convenience
pub use analytics_service::AnalyticsService;
pub use donation_service::DonationLedger;
pub use gamification_service::GamificationEngine;

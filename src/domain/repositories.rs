//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DomainError;

/// Backend tables that the dashboard counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Profiles,
    Articles,
    Reels,
    Comments,
    SupportTickets,
    Stories,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Profiles => "profiles",
            Table::Articles => "articles",
            Table::Reels => "reels",
            Table::Comments => "comments",
            Table::SupportTickets => "support_tickets",
            Table::Stories => "stories",
        }
    }
}

/// A row reduced to what the activity feed shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentRow {
    pub id: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

/// Read-side access to content tables for analytics
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Exact row count of a table
    async fn count(&self, table: Table) -> Result<u64, DomainError>;

    /// View counter of every article
    async fn article_views(&self) -> Result<Vec<i64>, DomainError>;

    /// Category of every article (None when unset)
    async fn article_categories(&self) -> Result<Vec<Option<String>>, DomainError>;

    /// Creation timestamps of rows created at or after `since`
    async fn created_since(
        &self,
        table: Table,
        since: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, DomainError>;

    /// Newest articles first, at most `limit`
    async fn recent_articles(&self, limit: u64) -> Result<Vec<RecentRow>, DomainError>;

    /// Newest comments first, at most `limit`
    async fn recent_comments(&self, limit: u64) -> Result<Vec<RecentRow>, DomainError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Reader,
    Author,
    Admin,
    PendingAuthor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Reader => "reader",
            Role::Author => "author",
            Role::Admin => "admin",
            Role::PendingAuthor => "pending_author",
        }
    }

    /// Unknown roles fall back to the least privileged one
    pub fn parse(value: &str) -> Self {
        match value {
            "author" => Role::Author,
            "admin" => Role::Admin,
            "pending_author" => Role::PendingAuthor,
            _ => Role::Reader,
        }
    }
}

/// Profile data for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub created_at: String,
}

/// Repository trait for user profiles
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find a profile by ID, `DomainError::NotFound` when absent
    async fn find_by_id(&self, id: &str) -> Result<Profile, DomainError>;
}

/// Volunteer sign-up for a campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolunteerSignup {
    pub campaign: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub zip_code: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Remote store for campaign sign-ups
#[async_trait]
pub trait SignupRepository: Send + Sync {
    async fn insert(&self, signup: &VolunteerSignup) -> Result<(), DomainError>;
}

/// Input for recording an analytics event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAnalyticsEvent {
    pub event_type: String,
    pub path: Option<String>,
    pub user_id: Option<String>,
}

/// Write-side access for newsletter and event capture
#[async_trait]
pub trait EngagementRepository: Send + Sync {
    /// Add a newsletter subscriber, `Validation` when the email is already present
    async fn subscribe(&self, email: &str) -> Result<(), DomainError>;

    async fn record_event(&self, event: NewAnalyticsEvent) -> Result<(), DomainError>;
}

/// Local persisted key-value storage holding JSON blobs
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    async fn set(&self, key: &str, value: String) -> Result<(), DomainError>;
}

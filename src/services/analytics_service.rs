//! Analytics Service - dashboard aggregates over the content tables
//!
//! Nothing is cached: every call re-reads the backend.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{
    ContentRepository, DomainError, EngagementRepository, NewAnalyticsEvent, Profile,
    ProfileRepository, RecentRow, Table,
};

pub const UNCATEGORIZED: &str = "Uncategorized";
pub const ACTIVITY_WINDOW_DAYS: i64 = 7;
pub const RECENT_FEED_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewStats {
    pub users: u64,
    pub articles: u64,
    pub reels: u64,
    pub comments: u64,
    pub tickets: u64,
    pub stories: u64,
    pub total_views: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityDay {
    pub date: NaiveDate,
    /// Display label, e.g. "Oct 16"
    pub label: String,
    pub articles: u64,
    pub comments: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Article,
    Comment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentActivity {
    pub kind: ActivityKind,
    pub id: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

impl RecentActivity {
    fn from_row(kind: ActivityKind, row: RecentRow) -> Self {
        Self {
            kind,
            id: row.id,
            summary: row.summary,
            created_at: row.created_at,
        }
    }
}

pub struct AnalyticsService {
    content: Arc<dyn ContentRepository>,
    profiles: Arc<dyn ProfileRepository>,
    engagement: Arc<dyn EngagementRepository>,
}

impl AnalyticsService {
    pub fn new(
        content: Arc<dyn ContentRepository>,
        profiles: Arc<dyn ProfileRepository>,
        engagement: Arc<dyn EngagementRepository>,
    ) -> Self {
        Self {
            content,
            profiles,
            engagement,
        }
    }

    /// Top-level counts. Queries run concurrently; the first failure fails the whole snapshot.
    pub async fn get_overview_stats(&self) -> Result<OverviewStats, DomainError> {
        let repo = &self.content;
        let (users, articles, reels, comments, tickets, stories, views) = futures::try_join!(
            repo.count(Table::Profiles),
            repo.count(Table::Articles),
            repo.count(Table::Reels),
            repo.count(Table::Comments),
            repo.count(Table::SupportTickets),
            repo.count(Table::Stories),
            repo.article_views(),
        )?;

        // Negative counters are data errors; they never reduce the total
        let total_views = views
            .into_iter()
            .fold(0u64, |acc, v| acc.saturating_add(v.max(0) as u64));

        Ok(OverviewStats {
            users,
            articles,
            reels,
            comments,
            tickets,
            stories,
            total_views,
        })
    }

    pub async fn get_category_distribution(&self) -> Result<Vec<CategoryCount>, DomainError> {
        let categories = self.content.article_categories().await?;

        let mut counts: HashMap<String, u64> = HashMap::new();
        for category in categories {
            let name = category
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| UNCATEGORIZED.to_string());
            *counts.entry(name).or_insert(0) += 1;
        }

        let mut distribution: Vec<CategoryCount> = counts
            .into_iter()
            .map(|(name, count)| CategoryCount { name, count })
            .collect();
        distribution.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        Ok(distribution)
    }

    pub async fn get_content_activity(&self) -> Result<Vec<ActivityDay>, DomainError> {
        self.get_content_activity_at(Utc::now()).await
    }

    /// Dense seven-day series ending on the UTC date of `now`, oldest first
    pub async fn get_content_activity_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<ActivityDay>, DomainError> {
        let today = now.date_naive();
        let first_day = today - Duration::days(ACTIVITY_WINDOW_DAYS - 1);
        let since = first_day.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();

        let mut days: Vec<ActivityDay> = (0..ACTIVITY_WINDOW_DAYS)
            .map(|offset| {
                let date = first_day + Duration::days(offset);
                ActivityDay {
                    date,
                    label: date.format("%b %-d").to_string(),
                    articles: 0,
                    comments: 0,
                }
            })
            .collect();

        let (articles, comments) = futures::try_join!(
            self.content.created_since(Table::Articles, since),
            self.content.created_since(Table::Comments, since),
        )?;

        for ts in articles {
            if let Some(day) = day_slot(&mut days, first_day, ts) {
                day.articles += 1;
            }
        }
        for ts in comments {
            if let Some(day) = day_slot(&mut days, first_day, ts) {
                day.comments += 1;
            }
        }

        Ok(days)
    }

    /// Newest five items across articles and comments.
    ///
    /// Each source is limited to five before merging, so when one source is
    /// uniformly newer the other does not appear at all.
    pub async fn get_recent_activity_feed(&self) -> Result<Vec<RecentActivity>, DomainError> {
        let limit = RECENT_FEED_LIMIT as u64;
        let (articles, comments) = futures::try_join!(
            self.content.recent_articles(limit),
            self.content.recent_comments(limit),
        )?;

        let mut feed: Vec<RecentActivity> = articles
            .into_iter()
            .map(|row| RecentActivity::from_row(ActivityKind::Article, row))
            .chain(
                comments
                    .into_iter()
                    .map(|row| RecentActivity::from_row(ActivityKind::Comment, row)),
            )
            .collect();

        feed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        feed.truncate(RECENT_FEED_LIMIT);
        Ok(feed)
    }

    /// Look up a profile; a missing profile is not an error
    pub async fn get_profile(&self, id: &str) -> Result<Option<Profile>, DomainError> {
        match self.profiles.find_by_id(id).await {
            Ok(profile) => Ok(Some(profile)),
            Err(DomainError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn subscribe_newsletter(&self, email: &str) -> Result<(), DomainError> {
        let email = email.trim().to_lowercase();
        if !is_plausible_email(&email) {
            return Err(DomainError::Validation("A valid email is required".to_string()));
        }

        self.engagement.subscribe(&email).await?;
        tracing::info!("Newsletter subscription added");
        Ok(())
    }

    pub async fn track_event(&self, event: NewAnalyticsEvent) -> Result<(), DomainError> {
        if event.event_type.trim().is_empty() {
            return Err(DomainError::Validation("event_type is required".to_string()));
        }

        tracing::debug!("Tracking {} on {:?}", event.event_type, event.path);
        self.engagement.record_event(event).await
    }
}

fn day_slot(
    days: &mut [ActivityDay],
    first_day: NaiveDate,
    ts: DateTime<Utc>,
) -> Option<&mut ActivityDay> {
    let offset = (ts.date_naive() - first_day).num_days();
    usize::try_from(offset).ok().and_then(|i| days.get_mut(i))
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_plausible_email() {
        assert!(is_plausible_email("ada@veritus.news"));
        assert!(!is_plausible_email("ada"));
        assert!(!is_plausible_email("@veritus.news"));
        assert!(!is_plausible_email("ada@localhost"));
    }

    #[test]
    fn test_day_slot_ignores_out_of_window() {
        let first = NaiveDate::from_ymd_opt(2026, 10, 10).unwrap();
        let mut days: Vec<ActivityDay> = (0..7)
            .map(|i| ActivityDay {
                date: first + Duration::days(i),
                label: String::new(),
                articles: 0,
                comments: 0,
            })
            .collect();

        let before = first.and_hms_opt(23, 59, 59).unwrap().and_utc() - Duration::days(1);
        let after = first.and_hms_opt(0, 0, 0).unwrap().and_utc() + Duration::days(7);
        assert!(day_slot(&mut days, first, before).is_none());
        assert!(day_slot(&mut days, first, after).is_none());

        let last = first.and_hms_opt(12, 0, 0).unwrap().and_utc() + Duration::days(6);
        assert_eq!(
            day_slot(&mut days, first, last).map(|d| d.date),
            Some(first + Duration::days(6))
        );
    }
}

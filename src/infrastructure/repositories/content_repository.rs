//! SeaORM implementation of ContentRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::domain::{ContentRepository, DomainError, RecentRow, Table};
use crate::models::{article, comment, profile, reel, story, support_ticket};
use crate::utils::time::parse_timestamp;

/// Parsed `created_at`, or `None` with a warning when the stored value is unreadable
fn readable(table: Table, value: &str) -> Option<DateTime<Utc>> {
    match parse_timestamp(value) {
        Ok(ts) => Some(ts),
        Err(e) => {
            tracing::warn!("Skipping {} row: {}", table.as_str(), e);
            None
        }
    }
}

/// SeaORM-based implementation of ContentRepository
pub struct SeaOrmContentRepository {
    db: DatabaseConnection,
}

impl SeaOrmContentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// `created_at` strings on or after the calendar date of `since`.
    ///
    /// Both stored forms (`2026-10-16T..` and `2026-10-16 ..`) sort after their
    /// bare date, so the prefix bound never drops a row inside the window.
    async fn created_at_values<E>(
        &self,
        column: E::Column,
        since: DateTime<Utc>,
    ) -> Result<Vec<String>, DomainError>
    where
        E: EntityTrait,
    {
        let lower_bound = since.format("%Y-%m-%d").to_string();
        let values = E::find()
            .select_only()
            .column(column)
            .filter(column.gte(lower_bound))
            .into_tuple::<String>()
            .all(&self.db)
            .await?;
        Ok(values)
    }
}

#[async_trait]
impl ContentRepository for SeaOrmContentRepository {
    async fn count(&self, table: Table) -> Result<u64, DomainError> {
        let count = match table {
            Table::Profiles => profile::Entity::find().count(&self.db).await?,
            Table::Articles => article::Entity::find().count(&self.db).await?,
            Table::Reels => reel::Entity::find().count(&self.db).await?,
            Table::Comments => comment::Entity::find().count(&self.db).await?,
            Table::SupportTickets => support_ticket::Entity::find().count(&self.db).await?,
            Table::Stories => story::Entity::find().count(&self.db).await?,
        };
        Ok(count)
    }

    async fn article_views(&self) -> Result<Vec<i64>, DomainError> {
        let views = article::Entity::find()
            .select_only()
            .column(article::Column::Views)
            .into_tuple::<i64>()
            .all(&self.db)
            .await?;
        Ok(views)
    }

    async fn article_categories(&self) -> Result<Vec<Option<String>>, DomainError> {
        let categories = article::Entity::find()
            .select_only()
            .column(article::Column::Category)
            .into_tuple::<Option<String>>()
            .all(&self.db)
            .await?;
        Ok(categories)
    }

    async fn created_since(
        &self,
        table: Table,
        since: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, DomainError> {
        let raw = match table {
            Table::Profiles => {
                self.created_at_values::<profile::Entity>(profile::Column::CreatedAt, since)
                    .await?
            }
            Table::Articles => {
                self.created_at_values::<article::Entity>(article::Column::CreatedAt, since)
                    .await?
            }
            Table::Reels => {
                self.created_at_values::<reel::Entity>(reel::Column::CreatedAt, since)
                    .await?
            }
            Table::Comments => {
                self.created_at_values::<comment::Entity>(comment::Column::CreatedAt, since)
                    .await?
            }
            Table::SupportTickets => {
                self.created_at_values::<support_ticket::Entity>(support_ticket::Column::CreatedAt, since)
                    .await?
            }
            Table::Stories => {
                self.created_at_values::<story::Entity>(story::Column::CreatedAt, since)
                    .await?
            }
        };

        // Exact window check on parsed values; unreadable rows are skipped
        let timestamps = raw
            .iter()
            .filter_map(|value| readable(table, value))
            .filter(|ts| *ts >= since)
            .collect();
        Ok(timestamps)
    }

    async fn recent_articles(&self, limit: u64) -> Result<Vec<RecentRow>, DomainError> {
        let articles = article::Entity::find()
            .order_by_desc(article::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(articles
            .into_iter()
            .filter_map(|a| {
                let created_at = readable(Table::Articles, &a.created_at)?;
                Some(RecentRow {
                    created_at,
                    id: a.id,
                    summary: a.title,
                })
            })
            .collect())
    }

    async fn recent_comments(&self, limit: u64) -> Result<Vec<RecentRow>, DomainError> {
        let comments = comment::Entity::find()
            .order_by_desc(comment::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(comments
            .into_iter()
            .filter_map(|c| {
                let created_at = readable(Table::Comments, &c.created_at)?;
                Some(RecentRow {
                    created_at,
                    id: c.id,
                    summary: c.content,
                })
            })
            .collect())
    }
}

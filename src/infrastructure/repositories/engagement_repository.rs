//! SeaORM implementation of EngagementRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, SqlErr};

use crate::domain::{DomainError, EngagementRepository, NewAnalyticsEvent};
use crate::models::{analytics_event, newsletter_subscriber};
use crate::utils::time::format_timestamp;

pub struct SeaOrmEngagementRepository {
    db: DatabaseConnection,
}

impl SeaOrmEngagementRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EngagementRepository for SeaOrmEngagementRepository {
    async fn subscribe(&self, email: &str) -> Result<(), DomainError> {
        let subscriber = newsletter_subscriber::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            email: Set(email.to_string()),
            created_at: Set(format_timestamp(chrono::Utc::now())),
        };

        // UNIQUE(email) is the duplicate check
        match subscriber.insert(&self.db).await {
            Ok(_) => Ok(()),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Err(
                DomainError::Validation("Email already subscribed".to_string()),
            ),
            Err(e) => Err(e.into()),
        }
    }

    async fn record_event(&self, event: NewAnalyticsEvent) -> Result<(), DomainError> {
        let row = analytics_event::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            event_type: Set(event.event_type),
            path: Set(event.path),
            user_id: Set(event.user_id),
            created_at: Set(format_timestamp(chrono::Utc::now())),
        };
        row.insert(&self.db).await?;
        Ok(())
    }
}

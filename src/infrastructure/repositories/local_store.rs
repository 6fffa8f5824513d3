//! Local key-value stores holding JSON blobs

use async_trait::async_trait;
use dashmap::DashMap;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};

use crate::domain::{DomainError, LocalStore};
use crate::models::local_store_entry::{self, Entity as LocalStoreEntry};
use crate::utils::time::format_timestamp;

/// Process-local store, lost on restart
#[derive(Default)]
pub struct MemoryLocalStore {
    entries: DashMap<String, String>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalStore for MemoryLocalStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), DomainError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by the `local_store` table
pub struct SeaOrmLocalStore {
    db: DatabaseConnection,
}

impl SeaOrmLocalStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LocalStore for SeaOrmLocalStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let entry = LocalStoreEntry::find_by_id(key.to_string())
            .one(&self.db)
            .await?;
        Ok(entry.map(|e| e.value))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), DomainError> {
        let entry = local_store_entry::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value),
            updated_at: Set(format_timestamp(chrono::Utc::now())),
        };

        // Last write wins
        LocalStoreEntry::insert(entry)
            .on_conflict(
                OnConflict::column(local_store_entry::Column::Key)
                    .update_columns([
                        local_store_entry::Column::Value,
                        local_store_entry::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }
}

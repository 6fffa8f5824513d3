//! SeaORM implementation of ProfileRepository

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::domain::{DomainError, Profile, ProfileRepository};
use crate::models::profile::Entity as ProfileEntity;

pub struct SeaOrmProfileRepository {
    db: DatabaseConnection,
}

impl SeaOrmProfileRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileRepository for SeaOrmProfileRepository {
    async fn find_by_id(&self, id: &str) -> Result<Profile, DomainError> {
        ProfileEntity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .map(Profile::from)
            .ok_or(DomainError::NotFound)
    }
}

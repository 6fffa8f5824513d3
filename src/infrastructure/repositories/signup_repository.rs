//! SeaORM implementation of SignupRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use crate::domain::{DomainError, SignupRepository, VolunteerSignup};
use crate::models::campaign_signup::ActiveModel;
use crate::utils::time::format_timestamp;

pub struct SeaOrmSignupRepository {
    db: DatabaseConnection,
}

impl SeaOrmSignupRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SignupRepository for SeaOrmSignupRepository {
    async fn insert(&self, signup: &VolunteerSignup) -> Result<(), DomainError> {
        let row = ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            campaign: Set(signup.campaign.clone()),
            name: Set(signup.name.clone()),
            email: Set(signup.email.clone()),
            phone: Set(signup.phone.clone()),
            zip_code: Set(signup.zip_code.clone()),
            interests: Set(serde_json::to_string(&signup.interests)?),
            created_at: Set(format_timestamp(signup.created_at)),
        };

        row.insert(&self.db).await?;
        Ok(())
    }
}

//! Application state containing services and shared resources

use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{
    ContentRepository, DomainError, EngagementRepository, LocalStore, ProfileRepository,
    SignupRepository,
};
use crate::infrastructure::config::Config;
use crate::infrastructure::seed::campaign_seed_donators;
use crate::infrastructure::supabase::SupabaseClient;
use crate::infrastructure::{
    SeaOrmContentRepository, SeaOrmEngagementRepository, SeaOrmLocalStore,
    SeaOrmProfileRepository, SeaOrmSignupRepository,
};
use crate::services::{AnalyticsService, DonationLedger, GamificationEngine};

/// Backend collaborators shared by the services
#[derive(Clone)]
pub struct Backends {
    pub content: Arc<dyn ContentRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub signups: Arc<dyn SignupRepository>,
    pub engagement: Arc<dyn EngagementRepository>,
    pub local_store: Arc<dyn LocalStore>,
}

impl Backends {
    /// Everything backed by the local database
    pub fn sea_orm(db: &DatabaseConnection) -> Self {
        Self {
            content: Arc::new(SeaOrmContentRepository::new(db.clone())),
            profiles: Arc::new(SeaOrmProfileRepository::new(db.clone())),
            signups: Arc::new(SeaOrmSignupRepository::new(db.clone())),
            engagement: Arc::new(SeaOrmEngagementRepository::new(db.clone())),
            local_store: Arc::new(SeaOrmLocalStore::new(db.clone())),
        }
    }

    /// Table store on Supabase; the local key-value store stays in the database
    pub fn supabase(client: SupabaseClient, db: &DatabaseConnection) -> Self {
        let client = Arc::new(client);
        Self {
            content: client.clone(),
            profiles: client.clone(),
            signups: client.clone(),
            engagement: client,
            local_store: Arc::new(SeaOrmLocalStore::new(db.clone())),
        }
    }

    pub fn from_config(config: &Config, db: &DatabaseConnection) -> Result<Self, DomainError> {
        match &config.supabase {
            Some(supabase) => {
                tracing::info!("Using Supabase backend at {}", supabase.url);
                Ok(Self::supabase(SupabaseClient::new(supabase)?, db))
            }
            None => {
                tracing::info!("Using local database backend");
                Ok(Self::sea_orm(db))
            }
        }
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub analytics: Arc<AnalyticsService>,
    pub gamification: Arc<GamificationEngine>,
    campaigns: Arc<HashMap<String, Arc<DonationLedger>>>,
}

impl AppState {
    /// Create a new AppState with one ledger per campaign slug
    pub fn new(backends: Backends, campaigns: &[String]) -> Self {
        let analytics = Arc::new(AnalyticsService::new(
            backends.content.clone(),
            backends.profiles.clone(),
            backends.engagement.clone(),
        ));
        let gamification = Arc::new(GamificationEngine::new(backends.local_store.clone()));

        let campaigns = campaigns
            .iter()
            .map(|slug| {
                let ledger = DonationLedger::new(
                    slug.clone(),
                    backends.local_store.clone(),
                    backends.signups.clone(),
                    campaign_seed_donators(slug),
                );
                (slug.clone(), Arc::new(ledger))
            })
            .collect();

        Self {
            analytics,
            gamification,
            campaigns: Arc::new(campaigns),
        }
    }

    /// Local-database state with the given campaigns
    pub fn from_db(db: &DatabaseConnection, campaigns: &[String]) -> Self {
        Self::new(Backends::sea_orm(db), campaigns)
    }

    pub fn campaign(&self, slug: &str) -> Option<Arc<DonationLedger>> {
        self.campaigns.get(slug).cloned()
    }

    pub fn campaign_slugs(&self) -> Vec<String> {
        let mut slugs: Vec<String> = self.campaigns.keys().cloned().collect();
        slugs.sort();
        slugs
    }
}

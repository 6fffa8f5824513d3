//! Donation Service - per-campaign donation feed and volunteer sign-ups
//!
//! Donations are kept in the local store and merged at read time with the
//! campaign's seed list. Volunteer sign-ups go to the backend first and fall
//! back to the local store when the backend refuses them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::{DomainError, LocalStore, Money, SignupRepository, VolunteerSignup};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donator {
    pub id: String,
    pub name: String,
    pub amount: Money,
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Input for a new donation
#[derive(Debug, Clone, Deserialize)]
pub struct NewDonation {
    pub name: String,
    pub amount: Money,
    pub message: Option<String>,
}

/// Success payload handed back by the payment provider
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentCapture {
    pub payer_name: String,
    pub amount: Money,
    pub message: Option<String>,
}

/// Volunteer form input
#[derive(Debug, Clone, Deserialize)]
pub struct NewVolunteer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub zip_code: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignupBackend {
    Remote,
    LocalFallback,
}

/// Which store accepted a volunteer sign-up
#[derive(Debug, Clone, Serialize)]
pub struct SignupReceipt {
    pub backend: SignupBackend,
    pub signup: VolunteerSignup,
}

pub fn donations_key(campaign: &str) -> String {
    format!("donations:{}", campaign)
}

pub fn volunteers_key(campaign: &str) -> String {
    format!("volunteers:{}", campaign)
}

/// Exact total of a donator list
pub fn total_of(donators: &[Donator]) -> Result<Money, DomainError> {
    Money::checked_sum(donators.iter().map(|d| d.amount)).ok_or_else(|| {
        DomainError::Internal("Donation total exceeds the representable range".to_string())
    })
}

pub struct DonationLedger {
    campaign: String,
    store: Arc<dyn LocalStore>,
    signups: Arc<dyn SignupRepository>,
    seed: Vec<Donator>,
}

impl DonationLedger {
    pub fn new(
        campaign: impl Into<String>,
        store: Arc<dyn LocalStore>,
        signups: Arc<dyn SignupRepository>,
        seed: Vec<Donator>,
    ) -> Self {
        Self {
            campaign: campaign.into(),
            store,
            signups,
            seed,
        }
    }

    pub fn campaign(&self) -> &str {
        &self.campaign
    }

    async fn load_list<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Vec<T>, DomainError> {
        match self.store.get(key).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn local_donations(&self) -> Result<Vec<Donator>, DomainError> {
        self.load_list(&donations_key(&self.campaign)).await
    }

    /// Local donations plus the seed list, newest first
    pub async fn get_donators(&self) -> Result<Vec<Donator>, DomainError> {
        let mut donators = self.local_donations().await?;
        donators.extend(self.seed.iter().cloned());
        // Stable sort keeps prepend order for equal timestamps
        donators.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(donators)
    }

    pub async fn get_total_donations(&self) -> Result<Money, DomainError> {
        let donators = self.get_donators().await?;
        total_of(&donators)
    }

    pub async fn add_donation(&self, donation: NewDonation) -> Result<Donator, DomainError> {
        if !donation.amount.is_positive() {
            return Err(DomainError::Validation(
                "Donation amount must be greater than zero".to_string(),
            ));
        }
        let name = donation.name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("Donor name is required".to_string()));
        }

        // The ledger total must stay representable
        let current = self.get_total_donations().await?;
        if current.checked_add(donation.amount).is_none() {
            return Err(DomainError::Validation(
                "Donation amount exceeds what the campaign ledger can hold".to_string(),
            ));
        }

        let donator = Donator {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            amount: donation.amount,
            message: donation
                .message
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty()),
            timestamp: Utc::now(),
        };

        let mut local = self.local_donations().await?;
        local.insert(0, donator.clone());
        self.store
            .set(&donations_key(&self.campaign), serde_json::to_string(&local)?)
            .await?;

        tracing::info!(
            "Donation of {} recorded for campaign {}",
            donator.amount,
            self.campaign
        );
        Ok(donator)
    }

    /// Record a completed payment from the provider's success callback
    pub async fn record_payment(&self, capture: PaymentCapture) -> Result<Donator, DomainError> {
        self.add_donation(NewDonation {
            name: capture.payer_name,
            amount: capture.amount,
            message: capture.message,
        })
        .await
    }

    /// Volunteers stored locally because the backend was unavailable
    pub async fn local_volunteers(&self) -> Result<Vec<VolunteerSignup>, DomainError> {
        self.load_list(&volunteers_key(&self.campaign)).await
    }

    pub async fn sign_up_volunteer(
        &self,
        volunteer: NewVolunteer,
    ) -> Result<SignupReceipt, DomainError> {
        let name = volunteer.name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("Name is required".to_string()));
        }
        let email = volunteer.email.trim();
        if !email.contains('@') {
            return Err(DomainError::Validation("A valid email is required".to_string()));
        }

        let signup = VolunteerSignup {
            campaign: self.campaign.clone(),
            name: name.to_string(),
            email: email.to_lowercase(),
            phone: volunteer.phone.filter(|p| !p.trim().is_empty()),
            zip_code: volunteer.zip_code.filter(|z| !z.trim().is_empty()),
            interests: volunteer.interests,
            created_at: Utc::now(),
        };

        match self.signups.insert(&signup).await {
            Ok(()) => {
                tracing::info!("Volunteer signed up for campaign {}", self.campaign);
                Ok(SignupReceipt {
                    backend: SignupBackend::Remote,
                    signup,
                })
            }
            Err(e) => {
                tracing::warn!(
                    "Sign-up backend unavailable for campaign {}, storing locally: {}",
                    self.campaign,
                    e
                );
                let mut local = self.local_volunteers().await?;
                local.push(signup.clone());
                self.store
                    .set(&volunteers_key(&self.campaign), serde_json::to_string(&local)?)
                    .await?;
                Ok(SignupReceipt {
                    backend: SignupBackend::LocalFallback,
                    signup,
                })
            }
        }
    }
}

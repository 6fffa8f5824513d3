//! Gamification Service - XP, levels, streaks, badges and achievements
//!
//! State lives in one JSON blob of the injected [`LocalStore`]. Every mutation
//! is load, modify, save; concurrent writers race and the last save wins.

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::{DomainError, LocalStore};

pub const GAMIFICATION_KEY: &str = "veritus-gamification";
pub const XP_PER_LEVEL: u64 = 1000;

/// Level implied by an XP total: `floor(xp / 1000) + 1`
pub fn level_for_xp(xp: u64) -> u32 {
    u32::try_from(xp / XP_PER_LEVEL)
        .unwrap_or(u32::MAX - 1)
        .saturating_add(1)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub unlocked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub progress: u32,
    pub target: u32,
    pub unlocked: bool,
}

impl Achievement {
    fn new(id: &str, title: &str, description: &str, target: u32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            progress: 0,
            target,
            unlocked: false,
        }
    }
}

/// Achievements every reader starts with
pub fn default_achievements() -> Vec<Achievement> {
    vec![
        Achievement::new("first-read", "First Read", "Read your first article", 1),
        Achievement::new("bookworm", "Bookworm", "Read 25 articles", 25),
        Achievement::new("commentator", "Commentator", "Post 10 comments", 10),
        Achievement::new("week-streak", "Regular", "Visit 7 days in a row", 7),
        Achievement::new("sharer", "Town Crier", "Share 5 articles", 5),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamificationState {
    pub xp: u64,
    /// Highest level ever reached; never below `level_for_xp(xp)`
    pub level: u32,
    pub streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    pub last_login_date: Option<NaiveDate>,
    #[serde(default)]
    pub badges: Vec<Badge>,
    #[serde(default = "default_achievements")]
    pub achievements: Vec<Achievement>,
}

impl Default for GamificationState {
    fn default() -> Self {
        Self {
            xp: 0,
            level: 1,
            streak: 0,
            longest_streak: 0,
            last_login_date: None,
            badges: Vec::new(),
            achievements: default_achievements(),
        }
    }
}

impl GamificationState {
    /// Current level, honouring both the XP total and the stored high-water mark
    pub fn current_level(&self) -> u32 {
        self.level.max(level_for_xp(self.xp))
    }

    pub fn xp_to_next_level(&self) -> u64 {
        (u64::from(self.current_level()) * XP_PER_LEVEL).saturating_sub(self.xp)
    }

    pub fn has_badge(&self, id: &str) -> bool {
        self.badges.iter().any(|b| b.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XpAward {
    pub xp: u64,
    pub level: u32,
    pub leveled_up: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakUpdate {
    /// Already counted today
    Unchanged,
    /// Visited yesterday, streak grew by one
    Extended,
    /// First visit or a missed day, streak restarted at one
    Reset,
}

pub struct GamificationEngine {
    store: Arc<dyn LocalStore>,
}

impl GamificationEngine {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Read the persisted state, falling back to defaults when absent or unreadable
    pub async fn load(&self) -> Result<GamificationState, DomainError> {
        let Some(raw) = self.store.get(GAMIFICATION_KEY).await? else {
            return Ok(GamificationState::default());
        };

        match serde_json::from_str::<GamificationState>(&raw) {
            Ok(state) => Ok(state),
            Err(e) => {
                tracing::warn!("Discarding unreadable gamification state: {}", e);
                Ok(GamificationState::default())
            }
        }
    }

    pub async fn save(&self, state: &GamificationState) -> Result<(), DomainError> {
        let raw = serde_json::to_string(state)?;
        self.store.set(GAMIFICATION_KEY, raw).await
    }

    pub async fn state(&self) -> Result<GamificationState, DomainError> {
        self.load().await
    }

    /// Add XP. Zero is rejected, so XP never decreases and neither does the level.
    pub async fn award_xp(&self, amount: u32, source: &str) -> Result<XpAward, DomainError> {
        if amount == 0 {
            return Err(DomainError::Validation(
                "XP amount must be a positive integer".to_string(),
            ));
        }

        let mut state = self.load().await?;
        let previous_level = state.current_level();

        state.xp = state.xp.saturating_add(u64::from(amount));
        state.level = level_for_xp(state.xp).max(previous_level);
        self.save(&state).await?;

        let leveled_up = state.level > previous_level;
        tracing::info!(
            "Awarded {} XP for '{}' (xp={}, level={})",
            amount,
            source,
            state.xp,
            state.level
        );
        if leveled_up {
            tracing::info!("Level up: {} -> {}", previous_level, state.level);
        }

        Ok(XpAward {
            xp: state.xp,
            level: state.level,
            leveled_up,
        })
    }

    /// Count today's visit using the local calendar date
    pub async fn update_streak(&self) -> Result<StreakUpdate, DomainError> {
        self.update_streak_on(Local::now().date_naive()).await
    }

    pub async fn update_streak_on(&self, today: NaiveDate) -> Result<StreakUpdate, DomainError> {
        let mut state = self.load().await?;

        let outcome = match state.last_login_date {
            Some(last) if last == today => return Ok(StreakUpdate::Unchanged),
            Some(last) if last + Duration::days(1) == today => {
                state.streak = state.streak.saturating_add(1);
                StreakUpdate::Extended
            }
            _ => {
                state.streak = 1;
                StreakUpdate::Reset
            }
        };

        state.last_login_date = Some(today);
        state.longest_streak = state.longest_streak.max(state.streak);
        self.save(&state).await?;

        tracing::debug!("Streak {:?} on {} (streak={})", outcome, today, state.streak);
        Ok(outcome)
    }

    /// Add a badge unless one with the same id exists. Returns true when newly unlocked.
    pub async fn unlock_badge(&self, mut badge: Badge) -> Result<bool, DomainError> {
        let mut state = self.load().await?;
        if state.has_badge(&badge.id) {
            return Ok(false);
        }

        badge.unlocked_at.get_or_insert_with(Utc::now);
        tracing::info!("Badge unlocked: {}", badge.id);
        state.badges.push(badge);
        self.save(&state).await?;
        Ok(true)
    }

    pub async fn update_achievement(
        &self,
        id: &str,
        progress_delta: u32,
    ) -> Result<Achievement, DomainError> {
        let mut state = self.load().await?;
        let achievement = state
            .achievements
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(DomainError::NotFound)?;

        achievement.progress = achievement.progress.saturating_add(progress_delta);
        if !achievement.unlocked && achievement.progress >= achievement.target {
            achievement.unlocked = true;
            tracing::info!("Achievement unlocked: {}", achievement.id);
        }

        let updated = achievement.clone();
        self.save(&state).await?;
        Ok(updated)
    }
}

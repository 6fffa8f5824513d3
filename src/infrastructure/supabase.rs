//! Supabase (PostgREST) implementation of the backend repositories
//!
//! Every table is reached through `/rest/v1/<table>`. Counts use
//! `Prefer: count=exact` and are read back from the `Content-Range` header.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::domain::{
    ContentRepository, DomainError, EngagementRepository, NewAnalyticsEvent, Profile,
    ProfileRepository, RecentRow, Role, SignupRepository, Table, VolunteerSignup,
};
use crate::infrastructure::config::SupabaseConfig;
use crate::utils::time::{format_timestamp, parse_timestamp};

const USER_AGENT: &str = concat!("Veritus/", env!("CARGO_PKG_VERSION"));

/// Makes PostgREST answer a single-row select with an object, or 406 when no row matches
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    rest_url: Url,
    anon_key: String,
}

#[derive(Deserialize)]
struct ViewsRow {
    views: Option<i64>,
}

#[derive(Deserialize)]
struct CategoryRow {
    category: Option<String>,
}

#[derive(Deserialize)]
struct CreatedRow {
    created_at: String,
}

#[derive(Deserialize)]
struct ArticleRow {
    id: Value,
    title: Option<String>,
    created_at: String,
}

#[derive(Deserialize)]
struct CommentRow {
    id: Value,
    content: Option<String>,
    created_at: String,
}

#[derive(Deserialize)]
struct ProfileRow {
    id: Value,
    full_name: Option<String>,
    role: Option<String>,
    created_at: Option<String>,
}

#[derive(Serialize)]
struct SignupRow<'a> {
    campaign: &'a str,
    name: &'a str,
    email: &'a str,
    phone: Option<&'a str>,
    zip_code: Option<&'a str>,
    interests: &'a [String],
    created_at: String,
}

impl SupabaseClient {
    pub fn new(config: &SupabaseConfig) -> Result<Self, DomainError> {
        let base = Url::parse(&format!("{}/", config.url.trim_end_matches('/')))
            .map_err(|e| DomainError::Internal(format!("Invalid SUPABASE_URL: {}", e)))?;
        let rest_url = base
            .join("rest/v1/")
            .map_err(|e| DomainError::Internal(format!("Invalid SUPABASE_URL: {}", e)))?;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DomainError::Internal(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            http,
            rest_url,
            anon_key: config.anon_key.clone(),
        })
    }

    fn request(&self, method: Method, table: &str) -> Result<RequestBuilder, DomainError> {
        let url = self
            .rest_url
            .join(table)
            .map_err(|e| DomainError::Internal(format!("Invalid table '{}': {}", table, e)))?;

        Ok(self
            .http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.anon_key)))
    }

    async fn select<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, DomainError> {
        tracing::debug!("Supabase select on {}: {:?}", table, query);
        let resp = self
            .request(Method::GET, table)?
            .query(query)
            .send()
            .await?;
        let resp = ensure_success(table, resp).await?;
        Ok(resp.json::<Vec<T>>().await?)
    }

    async fn insert_row<T>(&self, table: &str, row: &T) -> Result<(), DomainError>
    where
        T: Serialize + ?Sized + Sync,
    {
        let resp = self
            .request(Method::POST, table)?
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;

        if resp.status() == StatusCode::CONFLICT {
            return Err(DomainError::Validation(format!("Duplicate row rejected by {}", table)));
        }

        ensure_success(table, resp).await?;
        Ok(())
    }
}

async fn ensure_success(table: &str, resp: Response) -> Result<Response, DomainError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    Err(DomainError::Network(format!("{} returned {}: {}", table, status, body)))
}

/// Total from a PostgREST `Content-Range` value such as `0-24/3573` or `*/0`
pub fn parse_content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse().ok()
}

/// Supabase ids are uuids or bigints depending on the table
fn id_to_string(id: Value) -> String {
    match id {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[async_trait]
impl ContentRepository for SupabaseClient {
    async fn count(&self, table: Table) -> Result<u64, DomainError> {
        let name = table.as_str();
        let resp = self
            .request(Method::HEAD, name)?
            .header("Prefer", "count=exact")
            .query(&[("select", "id")])
            .send()
            .await?;
        let resp = ensure_success(name, resp).await?;

        resp.headers()
            .get(header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total)
            .ok_or_else(|| DomainError::Network(format!("{} returned no row count", name)))
    }

    async fn article_views(&self) -> Result<Vec<i64>, DomainError> {
        let rows: Vec<ViewsRow> = self
            .select("articles", &[("select", "views".to_string())])
            .await?;
        Ok(rows.into_iter().map(|r| r.views.unwrap_or(0)).collect())
    }

    async fn article_categories(&self) -> Result<Vec<Option<String>>, DomainError> {
        let rows: Vec<CategoryRow> = self
            .select("articles", &[("select", "category".to_string())])
            .await?;
        Ok(rows.into_iter().map(|r| r.category).collect())
    }

    async fn created_since(
        &self,
        table: Table,
        since: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, DomainError> {
        let rows: Vec<CreatedRow> = self
            .select(
                table.as_str(),
                &[
                    ("select", "created_at".to_string()),
                    ("created_at", format!("gte.{}", format_timestamp(since))),
                ],
            )
            .await?;

        rows.iter().map(|r| parse_timestamp(&r.created_at)).collect()
    }

    async fn recent_articles(&self, limit: u64) -> Result<Vec<RecentRow>, DomainError> {
        let rows: Vec<ArticleRow> = self
            .select(
                "articles",
                &[
                    ("select", "id,title,created_at".to_string()),
                    ("order", "created_at.desc".to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        rows.into_iter()
            .map(|r| {
                Ok(RecentRow {
                    created_at: parse_timestamp(&r.created_at)?,
                    id: id_to_string(r.id),
                    summary: r.title.unwrap_or_default(),
                })
            })
            .collect()
    }

    async fn recent_comments(&self, limit: u64) -> Result<Vec<RecentRow>, DomainError> {
        let rows: Vec<CommentRow> = self
            .select(
                "comments",
                &[
                    ("select", "id,content,created_at".to_string()),
                    ("order", "created_at.desc".to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        rows.into_iter()
            .map(|r| {
                Ok(RecentRow {
                    created_at: parse_timestamp(&r.created_at)?,
                    id: id_to_string(r.id),
                    summary: r.content.unwrap_or_default(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl ProfileRepository for SupabaseClient {
    async fn find_by_id(&self, id: &str) -> Result<Profile, DomainError> {
        let resp = self
            .request(Method::GET, "profiles")?
            .header(header::ACCEPT, SINGLE_OBJECT)
            .query(&[
                ("select", "id,full_name,role,created_at".to_string()),
                ("id", format!("eq.{}", id)),
            ])
            .send()
            .await?;

        // PGRST116: the single-object select matched zero rows
        if resp.status() == StatusCode::NOT_ACCEPTABLE {
            return Err(DomainError::NotFound);
        }

        let row: ProfileRow = ensure_success("profiles", resp).await?.json().await?;
        Ok(Profile {
            id: id_to_string(row.id),
            full_name: row.full_name,
            role: row.role.as_deref().map(Role::parse).unwrap_or(Role::Reader),
            created_at: row.created_at.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl SignupRepository for SupabaseClient {
    async fn insert(&self, signup: &VolunteerSignup) -> Result<(), DomainError> {
        let row = SignupRow {
            campaign: &signup.campaign,
            name: &signup.name,
            email: &signup.email,
            phone: signup.phone.as_deref(),
            zip_code: signup.zip_code.as_deref(),
            interests: &signup.interests,
            created_at: format_timestamp(signup.created_at),
        };
        self.insert_row("campaign_signups", &row).await
    }
}

#[async_trait]
impl EngagementRepository for SupabaseClient {
    async fn subscribe(&self, email: &str) -> Result<(), DomainError> {
        self.insert_row("newsletter_subscribers", &serde_json::json!({ "email": email }))
            .await
            .map_err(|e| match e {
                DomainError::Validation(_) => {
                    DomainError::Validation("Email already subscribed".to_string())
                }
                other => other,
            })
    }

    async fn record_event(&self, event: NewAnalyticsEvent) -> Result<(), DomainError> {
        self.insert_row("analytics_events", &event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_range_total() {
        assert_eq!(parse_content_range_total("0-24/3573"), Some(3573));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-24/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }

    #[test]
    fn test_id_to_string() {
        assert_eq!(id_to_string(Value::String("abc".into())), "abc");
        assert_eq!(id_to_string(serde_json::json!(42)), "42");
    }

    #[test]
    fn test_rest_url_keeps_project_path() {
        let client = SupabaseClient::new(&SupabaseConfig {
            url: "https://abc.supabase.co".to_string(),
            anon_key: "key".to_string(),
        })
        .unwrap();
        assert_eq!(client.rest_url.as_str(), "https://abc.supabase.co/rest/v1/");
    }
}

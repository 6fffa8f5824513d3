use std::env;

/// Campaign microsites served when `CAMPAIGNS` is not set
pub const DEFAULT_CAMPAIGNS: [&str; 2] = ["rivera-for-senate", "measure-12"];

/// Credentials for the hosted Supabase backend
#[derive(Clone, Debug)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub profile: String,
    pub supabase: Option<SupabaseConfig>,
    pub campaigns: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let profile = env::var("PROFILE").unwrap_or_else(|_| "default".to_string());

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            if profile == "default" {
                "sqlite://veritus.db?mode=rwc".to_string()
            } else {
                format!("sqlite://veritus_{}.db?mode=rwc", profile)
            }
        });

        // Both values are required to talk to Supabase
        let supabase = match (env::var("SUPABASE_URL"), env::var("SUPABASE_ANON_KEY")) {
            (Ok(url), Ok(anon_key)) if !url.trim().is_empty() && !anon_key.trim().is_empty() => {
                Some(SupabaseConfig {
                    url: url.trim().trim_end_matches('/').to_string(),
                    anon_key: anon_key.trim().to_string(),
                })
            }
            _ => None,
        };

        let campaigns = env::var("CAMPAIGNS")
            .ok()
            .map(|s| split_list(&s))
            .filter(|list| !list.is_empty())
            .unwrap_or_else(|| DEFAULT_CAMPAIGNS.iter().map(|s| s.to_string()).collect());

        Self {
            database_url,
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| split_list(&s))
                .unwrap_or_else(Vec::new),
            profile,
            supabase,
            campaigns,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

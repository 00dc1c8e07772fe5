use serde::Deserialize;

use crate::services::recommendations::MAX_RECOMMENDATION_LIMIT;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB v3 API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL images are served from; a size segment and the file path are appended
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Language passed to every TMDB request
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Web API key of the identity service
    pub identity_api_key: String,

    /// Identity service REST base URL
    #[serde(default = "default_identity_api_url")]
    pub identity_api_url: String,

    /// PostgreSQL connection URL. Without it user documents live in memory.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Redis connection URL. Without it TMDB responses are not cached.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Single origin allowed by CORS; any origin when unset
    #[serde(default)]
    pub cors_allowed_origin: Option<String>,

    /// Default number of recommendations returned
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_identity_api_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_recommendation_limit() -> usize {
    20
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the server could never serve requests with
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=MAX_RECOMMENDATION_LIMIT).contains(&self.recommendation_limit) {
            anyhow::bail!(
                "RECOMMENDATION_LIMIT must be between 1 and {}, got {}",
                MAX_RECOMMENDATION_LIMIT,
                self.recommendation_limit
            );
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

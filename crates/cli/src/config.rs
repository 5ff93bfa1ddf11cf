use poster_client::PosterClientConfig;
use serde::Deserialize;
use std::time::Duration;

/// Poster API settings loaded from environment variables (and `.env`)
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key; posters fall back to placeholders without it
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    #[serde(default = "default_api_url")]
    pub tmdb_api_url: String,

    #[serde(default = "default_image_url")]
    pub tmdb_image_url: String,

    #[serde(default = "default_timeout_secs")]
    pub poster_timeout_secs: u64,

    #[serde(default = "default_concurrency")]
    pub poster_concurrency: usize,

    #[serde(default = "default_cache_ttl_secs")]
    pub poster_cache_ttl_secs: u64,
}

fn default_api_url() -> String {
    "https://api.themoviedb.org".to_string()
}

fn default_image_url() -> String {
    "https://image.tmdb.org".to_string()
}

fn default_timeout_secs() -> u64 {
    12
}

fn default_concurrency() -> usize {
    8
}

fn default_cache_ttl_secs() -> u64 {
    24 * 3600
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// The API key, treating an empty value as unset
    pub fn api_key(&self) -> Option<&str> {
        self.tmdb_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn poster_client_config(&self) -> PosterClientConfig {
        PosterClientConfig {
            api_key: self.api_key().map(str::to_string),
            api_url: self.tmdb_api_url.clone(),
            image_url: self.tmdb_image_url.clone(),
            timeout: Duration::from_secs(self.poster_timeout_secs),
            concurrency: self.poster_concurrency.max(1),
            cache_ttl: Duration::from_secs(self.poster_cache_ttl_secs),
        }
    }
}

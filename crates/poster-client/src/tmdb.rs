//! TMDB-backed poster lookup.
//!
//! Request: `GET {api_url}/3/movie/{id}?api_key=..&language=en-US`
//! Poster:  `{image_url}/t/p/w500{poster_path}`

use crate::cache::PosterCache;
use crate::PosterLookup;
use async_trait::async_trait;
use data_loader::MovieId;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from a single poster request.
///
/// These never reach callers of [`PosterLookup`]; they are logged and the
/// lookup resolves to `None`.
#[derive(Error, Debug)]
pub enum PosterClientError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Poster API returned status {status} for movie {movie_id}")]
    Status { movie_id: MovieId, status: u16 },
}

/// Settings for [`TmdbPosterClient`]
#[derive(Debug, Clone)]
pub struct PosterClientConfig {
    /// Without a key no request is made and every lookup is `None`
    pub api_key: Option<String>,
    pub api_url: String,
    pub image_url: String,
    pub timeout: Duration,
    /// Maximum in-flight requests for a batch
    pub concurrency: usize,
    pub cache_ttl: Duration,
}

impl Default for PosterClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: "https://api.themoviedb.org".to_string(),
            image_url: "https://image.tmdb.org".to_string(),
            timeout: Duration::from_secs(12),
            concurrency: 8,
            cache_ttl: Duration::from_secs(24 * 3600),
        }
    }
}

#[derive(Deserialize)]
struct MovieDetails {
    #[serde(default)]
    poster_path: Option<String>,
}

/// Poster client for the TMDB movie details endpoint
pub struct TmdbPosterClient {
    http_client: reqwest::Client,
    config: PosterClientConfig,
    cache: PosterCache,
}

impl TmdbPosterClient {
    pub fn new(config: PosterClientConfig) -> Result<Self, PosterClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PosterClientError::ClientBuild(e.to_string()))?;

        let cache = PosterCache::new(config.cache_ttl);
        Ok(Self {
            http_client,
            config,
            cache,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    pub fn config(&self) -> &PosterClientConfig {
        &self.config
    }

    pub fn cache(&self) -> &PosterCache {
        &self.cache
    }

    /// Full image URL for a `poster_path` returned by the API
    pub fn poster_url(&self, poster_path: &str) -> String {
        let base = self.config.image_url.trim_end_matches('/');
        if poster_path.starts_with('/') {
            format!("{}/t/p/w500{}", base, poster_path)
        } else {
            format!("{}/t/p/w500/{}", base, poster_path)
        }
    }

    async fn request_poster(
        &self,
        api_key: &str,
        movie_id: MovieId,
    ) -> Result<Option<String>, PosterClientError> {
        let url = format!(
            "{}/3/movie/{}",
            self.config.api_url.trim_end_matches('/'),
            movie_id
        );

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", api_key), ("language", "en-US")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PosterClientError::Status {
                movie_id,
                status: response.status().as_u16(),
            });
        }

        let details: MovieDetails = response.json().await?;
        Ok(details
            .poster_path
            .filter(|p| !p.is_empty())
            .map(|p| self.poster_url(&p)))
    }
}

#[async_trait]
impl PosterLookup for TmdbPosterClient {
    fn is_enabled(&self) -> bool {
        self.has_api_key()
    }

    async fn fetch_poster(&self, movie_id: MovieId) -> Option<String> {
        let api_key = self.config.api_key.as_deref()?;

        if let Some(cached) = self.cache.get(movie_id) {
            debug!("Poster cache hit for movie {}", movie_id);
            return cached;
        }

        match self.request_poster(api_key, movie_id).await {
            Ok(poster) => {
                if poster.is_none() {
                    debug!("Movie {} has no poster", movie_id);
                }
                self.cache.insert(movie_id, poster.clone());
                poster
            }
            Err(PosterClientError::Request(e)) if e.is_timeout() => {
                warn!("Poster request for movie {} timed out", movie_id);
                None
            }
            Err(e) => {
                warn!("Poster lookup for movie {} failed: {}", movie_id, e);
                None
            }
        }
    }

    async fn fetch_posters(&self, movie_ids: &[MovieId]) -> Vec<Option<String>> {
        // buffered keeps output order equal to input order
        stream::iter(movie_ids.iter().copied())
            .map(|id| self.fetch_poster(id))
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await
    }
}

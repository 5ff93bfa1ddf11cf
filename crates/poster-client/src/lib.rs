//! Poster lookup client for the movie metadata API.
//!
//! Posters are decorative, so nothing here ever fails a recommendation:
//! every lookup resolves to `Some(url)` or `None`, and callers render
//! [`PLACEHOLDER_POSTER_URL`] for `None`.
//!
//! The client handles:
//! - Building the TMDB request for a movie id
//! - A per-call timeout
//! - An in-process TTL cache
//! - Fetching a batch of posters with bounded concurrency

use async_trait::async_trait;
use data_loader::MovieId;

pub mod cache;
pub mod tmdb;

pub use cache::PosterCache;
pub use tmdb::{PosterClientConfig, PosterClientError, TmdbPosterClient};

/// Image shown when no poster could be found
pub const PLACEHOLDER_POSTER_URL: &str = "https://via.placeholder.com/500x750.png?text=No+Image";

/// Anything that can turn a movie id into a poster URL.
///
/// `Send + Sync` so one lookup can be shared by every request handler.
#[async_trait]
pub trait PosterLookup: Send + Sync {
    /// False when every lookup is known to resolve to `None`
    fn is_enabled(&self) -> bool {
        true
    }

    /// Poster URL for one movie, or `None` if unavailable
    async fn fetch_poster(&self, movie_id: MovieId) -> Option<String>;

    /// Poster URLs for several movies, in the same order as `movie_ids`
    async fn fetch_posters(&self, movie_ids: &[MovieId]) -> Vec<Option<String>> {
        let mut posters = Vec::with_capacity(movie_ids.len());
        for &id in movie_ids {
            posters.push(self.fetch_poster(id).await);
        }
        posters
    }
}

/// Lookup that never finds a poster. Used when posters are turned off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPosters;

#[async_trait]
impl PosterLookup for NoPosters {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn fetch_poster(&self, _movie_id: MovieId) -> Option<String> {
        None
    }
}

/// Map a missing poster to the placeholder image
pub fn resolve_or_placeholder(poster: Option<String>) -> String {
    poster.unwrap_or_else(|| PLACEHOLDER_POSTER_URL.to_string())
}

//! In-process TTL cache for poster lookups.
//!
//! Caches the *answer* for a movie id, including "this movie has no
//! poster", so repeat selections don't hit the API again until the entry
//! expires.

use data_loader::MovieId;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry {
    poster: Option<String>,
    stored_at: Instant,
}

/// Thread-safe map of movie id -> poster answer with expiry
#[derive(Debug)]
pub struct PosterCache {
    ttl: Duration,
    entries: Mutex<HashMap<MovieId, CacheEntry>>,
}

impl PosterCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cached answer for a movie.
    ///
    /// Outer `None` means "not cached or expired"; inner `None` means
    /// "cached: no poster".
    pub fn get(&self, movie_id: MovieId) -> Option<Option<String>> {
        self.get_at(movie_id, Instant::now())
    }

    fn get_at(&self, movie_id: MovieId, now: Instant) -> Option<Option<String>> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(&movie_id) {
            Some(entry) if now.duration_since(entry.stored_at) < self.ttl => {
                Some(entry.poster.clone())
            }
            Some(_) => {
                entries.remove(&movie_id);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, movie_id: MovieId, poster: Option<String>) {
        self.insert_at(movie_id, poster, Instant::now());
    }

    fn insert_at(&self, movie_id: MovieId, poster: Option<String>, now: Instant) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            movie_id,
            CacheEntry {
                poster,
                stored_at: now,
            },
        );
    }

    /// Number of entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_and_negative_hit() {
        let cache = PosterCache::new(Duration::from_secs(60));
        cache.insert(1, Some("https://img/1.jpg".to_string()));
        cache.insert(2, None);

        assert_eq!(cache.get(1), Some(Some("https://img/1.jpg".to_string())));
        assert_eq!(cache.get(2), Some(None));
        assert_eq!(cache.get(3), None);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_expired_entry_is_dropped() {
        let cache = PosterCache::new(Duration::from_secs(10));
        let start = Instant::now();
        cache.insert_at(1, Some("a".to_string()), start);

        assert!(cache.get_at(1, start + Duration::from_secs(9)).is_some());
        assert!(cache.get_at(1, start + Duration::from_secs(10)).is_none());
        assert!(cache.is_empty());
    }
}

//! # Recommendation Orchestrator
//!
//! This module coordinates one recommendation request:
//! 1. Resolve the selected title to a catalog row
//! 2. Rank its neighbours (on a blocking thread)
//! 3. Fetch posters for the ranked movies concurrently
//! 4. Join ranks, stars and posters into the final result

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use data_loader::{DataIndex, MovieId, RowIndex};
use poster_client::{resolve_or_placeholder, NoPosters, PosterLookup};
use ranker::{RankError, Ranker, Recommendation, StarRounding};

/// Final recommendation handed to the UI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieRecommendation {
    /// 1-based position in the result list
    pub rank: usize,
    pub movie_id: MovieId,
    pub title: String,
    pub similarity: f32,
    /// Rounded 0..5 star score
    pub stars: f32,
    /// Filled width of the star strip, 0..100
    pub stars_pct: f32,
    /// Poster image, or the placeholder when none was found
    pub poster_url: String,
    pub has_poster: bool,
}

/// Main orchestrator for similar-movie requests
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    data_index: Arc<DataIndex>,
    ranker: Ranker,
    posters: Arc<dyn PosterLookup>,
}

impl RecommendationOrchestrator {
    /// Create a new orchestrator
    ///
    /// # Arguments
    /// * `data_index` - Shared, already loaded catalog and matrix
    /// * `posters` - Poster lookup used for every result
    pub fn new(data_index: Arc<DataIndex>, posters: Arc<dyn PosterLookup>) -> Self {
        let ranker = Ranker::new(data_index.clone());
        Self {
            data_index,
            ranker,
            posters,
        }
    }

    /// Orchestrator that renders every result with the placeholder poster
    pub fn without_posters(data_index: Arc<DataIndex>) -> Self {
        Self::new(data_index, Arc::new(NoPosters))
    }

    /// Configure star rounding (default: half stars)
    pub fn with_rounding(mut self, rounding: StarRounding) -> Self {
        self.ranker = self.ranker.with_rounding(rounding);
        self
    }

    /// Main entry point: movies similar to `title`
    ///
    /// # Arguments
    /// * `title` - Selected movie title (case-insensitive exact match)
    /// * `k` - Number of recommendations to return
    ///
    /// # Returns
    /// Recommendations ordered by similarity, highest first. An unknown
    /// title is an error whose root cause is `RankError::NotFound`.
    pub async fn get_recommendations(
        &self,
        title: &str,
        k: usize,
    ) -> Result<Vec<MovieRecommendation>> {
        let start_time = Instant::now();

        let selected = self.resolve_title(title)?;
        info!("Resolved '{}' to row {}", title, selected);

        let ranked = self.rank(selected, k).await?;
        info!("Ranked {} neighbours for '{}'", ranked.len(), title);

        let movie_ids: Vec<MovieId> = ranked.iter().map(|r| r.movie_id).collect();
        let posters = self.posters.fetch_posters(&movie_ids).await;
        let missing = posters.iter().filter(|p| p.is_none()).count();
        if missing > 0 && self.posters.is_enabled() {
            warn!("Posters missing for {} of {} recommendations", missing, posters.len());
        } else {
            debug!("{} of {} recommendations use the placeholder", missing, posters.len());
        }

        let recommendations = Self::assemble(ranked, posters);

        info!(
            "Total time to get recommendations for '{}': {:.2?}",
            title,
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    /// Ranking only, without posters. Used by the benchmark.
    pub async fn rank_only(&self, title: &str, k: usize) -> Result<Vec<Recommendation>> {
        let selected = self.resolve_title(title)?;
        self.rank(selected, k).await
    }

    fn resolve_title(&self, title: &str) -> Result<RowIndex> {
        self.data_index
            .find_by_title(title)
            .ok_or_else(|| RankError::NotFound(ranker::MovieRef::Title(title.to_string())))
            .context("Movie not found in database")
    }

    /// Rank on the blocking pool; a full matrix row is sorted per request
    async fn rank(&self, selected: RowIndex, k: usize) -> Result<Vec<Recommendation>> {
        let ranker = self.ranker.clone();
        let ranked = tokio::task::spawn_blocking(move || ranker.recommend(selected, k))
            .await
            .context("Ranking task panicked")??;
        Ok(ranked)
    }

    fn assemble(
        ranked: Vec<Recommendation>,
        posters: Vec<Option<String>>,
    ) -> Vec<MovieRecommendation> {
        ranked
            .into_iter()
            .zip(posters.into_iter().chain(std::iter::repeat(None)))
            .enumerate()
            .map(|(i, (rec, poster))| MovieRecommendation {
                rank: i + 1,
                movie_id: rec.movie_id,
                title: rec.title,
                similarity: rec.similarity,
                stars: rec.display_score,
                stars_pct: rec.fill_percent,
                has_poster: poster.is_some(),
                poster_url: resolve_or_placeholder(poster),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use data_loader::{Catalog, Movie, SimilarityMatrix};
    use poster_client::PLACEHOLDER_POSTER_URL;
    use std::sync::Mutex;

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    fn build_test_data_index() -> Arc<DataIndex> {
        let movies = vec![
            Movie { id: 19995, title: "Avatar".to_string() },
            Movie { id: 285, title: "Pirates of the Caribbean: At World's End".to_string() },
            Movie { id: 206647, title: "Spectre".to_string() },
            Movie { id: 49026, title: "The Dark Knight Rises".to_string() },
            Movie { id: 49529, title: "John Carter".to_string() },
        ];
        let matrix = SimilarityMatrix::from_rows(vec![
            vec![1.00, 0.10, 0.05, 0.08, 0.30],
            vec![0.10, 1.00, 0.12, 0.07, 0.20],
            vec![0.05, 0.12, 1.00, 0.25, 0.04],
            vec![0.08, 0.07, 0.25, 1.00, 0.09],
            vec![0.30, 0.20, 0.04, 0.09, 1.00],
        ])
        .unwrap();

        Arc::new(DataIndex::new(Catalog::new(movies).unwrap(), matrix).unwrap())
    }

    /// Mock lookup: posters only for even ids; records every batch
    #[derive(Default)]
    struct MockPosters {
        requested: Mutex<Vec<Vec<MovieId>>>,
    }

    #[async_trait]
    impl PosterLookup for MockPosters {
        async fn fetch_poster(&self, movie_id: MovieId) -> Option<String> {
            (movie_id % 2 == 0).then(|| format!("https://img.test/{}.jpg", movie_id))
        }

        async fn fetch_posters(&self, movie_ids: &[MovieId]) -> Vec<Option<String>> {
            self.requested.lock().unwrap().push(movie_ids.to_vec());
            let mut out = Vec::new();
            for &id in movie_ids {
                out.push(self.fetch_poster(id).await);
            }
            out
        }
    }

    // ============================================================================
    // Tests
    // ============================================================================

    #[tokio::test]
    async fn test_recommendations_ranked_with_posters() {
        let posters = Arc::new(MockPosters::default());
        let orchestrator =
            RecommendationOrchestrator::new(build_test_data_index(), posters.clone());

        let recs = orchestrator.get_recommendations("avatar", 3).await.unwrap();

        let titles: Vec<_> = recs.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "John Carter",
                "Pirates of the Caribbean: At World's End",
                "The Dark Knight Rises"
            ]
        );
        assert_eq!(recs[0].rank, 1);
        assert_eq!(recs[0].stars, 5.0);
        assert_eq!(recs[0].stars_pct, 100.0);
        assert_eq!(recs[2].stars, 0.0);

        // 49529 is odd -> placeholder; 285 odd -> placeholder; 49026 even -> poster
        assert!(!recs[0].has_poster);
        assert_eq!(recs[0].poster_url, PLACEHOLDER_POSTER_URL);
        assert!(recs[2].has_poster);
        assert_eq!(recs[2].poster_url, "https://img.test/49026.jpg");

        let requested = posters.requested.lock().unwrap();
        assert_eq!(*requested, vec![vec![49529, 285, 49026]]);
    }

    #[tokio::test]
    async fn test_unknown_title_is_not_found() {
        let orchestrator = RecommendationOrchestrator::without_posters(build_test_data_index());

        let err = orchestrator
            .get_recommendations("unknown_movie", 3)
            .await
            .unwrap_err();

        let rank_err = err.downcast_ref::<RankError>().expect("root cause is RankError");
        assert!(matches!(rank_err, RankError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_zero_k_is_invalid() {
        let orchestrator = RecommendationOrchestrator::without_posters(build_test_data_index());

        let err = orchestrator.get_recommendations("Spectre", 0).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RankError>(),
            Some(RankError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_without_posters_uses_placeholder() {
        let orchestrator = RecommendationOrchestrator::without_posters(build_test_data_index());

        assert!(!orchestrator.posters.is_enabled());
        let recs = orchestrator.get_recommendations("Spectre", 10).await.unwrap();

        assert_eq!(recs.len(), 4);
        assert_eq!(recs[0].title, "The Dark Knight Rises");
        assert!(recs.iter().all(|r| r.poster_url == PLACEHOLDER_POSTER_URL));
        assert!(recs.iter().all(|r| !r.has_poster));
    }

    #[tokio::test]
    async fn test_whole_star_rounding() {
        let orchestrator = RecommendationOrchestrator::without_posters(build_test_data_index())
            .with_rounding(StarRounding::Whole);

        let recs = orchestrator.get_recommendations("Avatar", 4).await.unwrap();
        for rec in recs {
            assert_eq!(rec.stars, rec.stars.round());
        }
    }

    #[tokio::test]
    async fn test_rank_only_matches_ranker() {
        let index = build_test_data_index();
        let orchestrator = RecommendationOrchestrator::without_posters(index.clone());

        let ranked = orchestrator.rank_only("John Carter", 2).await.unwrap();
        let direct = Ranker::new(index).recommend(4, 2).unwrap();
        assert_eq!(ranked, direct);
    }

    #[test]
    fn test_assemble_pads_missing_posters() {
        let ranked = vec![Recommendation {
            row: 1,
            movie_id: 7,
            title: "X".to_string(),
            similarity: 0.5,
            raw_score: 0.0,
            display_score: 0.0,
            fill_percent: 0.0,
        }];

        let recs = RecommendationOrchestrator::assemble(ranked, vec![]);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].poster_url, PLACEHOLDER_POSTER_URL);
    }
}

//! Nearest-neighbour ranking over a precomputed similarity row.
//!
//! ## Algorithm
//! 1. Read the selected movie's row from the matrix
//! 2. Pair every other movie's row index with its similarity
//! 3. Stable sort by similarity, highest first (ties keep catalog order)
//! 4. Keep the first k
//! 5. Rescale those k similarities to 0..5 and round to stars

use crate::error::{MovieRef, RankError, Result};
use crate::stars::{fill_percent, remap_scores, StarRounding};
use data_loader::{Catalog, DataIndex, MovieId, RowIndex, SimilarityMatrix};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Number of neighbours returned when the caller doesn't say
pub const DEFAULT_K: usize = 5;

/// One ranked neighbour of the selected movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub row: RowIndex,
    pub movie_id: MovieId,
    pub title: String,
    /// Raw value from the similarity matrix
    pub similarity: f32,
    /// Min-max rescaled similarity, unrounded, in [0, 5]
    pub raw_score: f32,
    /// `raw_score` rounded with the ranker's StarRounding
    pub display_score: f32,
    /// Filled width of a five-star strip, 0..100
    pub fill_percent: f32,
}

/// Top-k most similar movies to `selected`, with half-star display scores.
///
/// Returns `min(k, catalog.len() - 1)` entries. Fails with `NotFound` for a
/// row outside the catalog and `InvalidArgument` for `k == 0` or a catalog
/// and matrix of different sizes.
pub fn recommend(
    selected: RowIndex,
    catalog: &Catalog,
    matrix: &SimilarityMatrix,
    k: usize,
) -> Result<Vec<Recommendation>> {
    recommend_with(selected, catalog, matrix, k, StarRounding::default())
}

/// Same as [`recommend`], with an explicit rounding policy
pub fn recommend_with(
    selected: RowIndex,
    catalog: &Catalog,
    matrix: &SimilarityMatrix,
    k: usize,
    rounding: StarRounding,
) -> Result<Vec<Recommendation>> {
    if k == 0 {
        return Err(RankError::InvalidArgument("k must be at least 1".to_string()));
    }
    if catalog.len() != matrix.size() {
        return Err(RankError::InvalidArgument(format!(
            "catalog has {} movies but matrix is {}x{}",
            catalog.len(),
            matrix.size(),
            matrix.size()
        )));
    }

    let row = matrix
        .row(selected)
        .ok_or(RankError::NotFound(MovieRef::Row(selected)))?;

    let mut neighbours: Vec<(RowIndex, f32)> = row
        .iter()
        .copied()
        .enumerate()
        .filter(|&(idx, _)| idx != selected)
        .collect();

    // sort_by is stable, so equal similarities stay in catalog order.
    // Values are finite, and -0.0 must compare equal to 0.0.
    neighbours.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    neighbours.truncate(k);

    let similarities: Vec<f32> = neighbours.iter().map(|&(_, s)| s).collect();
    let scores = remap_scores(&similarities);

    let recommendations = neighbours
        .into_iter()
        .zip(scores)
        .filter_map(|((idx, similarity), raw_score)| {
            let movie = catalog.get(idx)?;
            let display_score = rounding.round(raw_score);
            Some(Recommendation {
                row: idx,
                movie_id: movie.id,
                title: movie.title.clone(),
                similarity,
                raw_score,
                display_score,
                fill_percent: fill_percent(raw_score),
            })
        })
        .collect();

    Ok(recommendations)
}

/// Ranker bound to a loaded DataIndex.
///
/// Cheap to clone; the index is shared.
#[derive(Debug, Clone)]
pub struct Ranker {
    data_index: Arc<DataIndex>,
    default_k: usize,
    rounding: StarRounding,
}

impl Ranker {
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        Self {
            data_index,
            default_k: DEFAULT_K,
            rounding: StarRounding::default(),
        }
    }

    /// Configure how many neighbours `recommend_default` returns (default: 5)
    pub fn with_k(mut self, k: usize) -> Self {
        self.default_k = k;
        self
    }

    /// Configure star rounding (default: half stars)
    pub fn with_rounding(mut self, rounding: StarRounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Rank neighbours of a catalog row
    #[instrument(skip(self))]
    pub fn recommend(&self, selected: RowIndex, k: usize) -> Result<Vec<Recommendation>> {
        let recs = recommend_with(
            selected,
            self.data_index.catalog(),
            self.data_index.matrix(),
            k,
            self.rounding,
        )?;
        debug!("Ranked {} neighbours for row {}", recs.len(), selected);
        Ok(recs)
    }

    /// Rank neighbours using the configured k
    pub fn recommend_default(&self, selected: RowIndex) -> Result<Vec<Recommendation>> {
        self.recommend(selected, self.default_k)
    }

    /// Rank neighbours of a movie given its external id
    pub fn recommend_by_id(&self, id: MovieId, k: usize) -> Result<Vec<Recommendation>> {
        let row = self
            .data_index
            .find_by_id(id)
            .ok_or(RankError::NotFound(MovieRef::Id(id)))?;
        self.recommend(row, k)
    }

    /// Rank neighbours of a movie given its title (case-insensitive)
    pub fn recommend_by_title(&self, title: &str, k: usize) -> Result<Vec<Recommendation>> {
        let row = self
            .data_index
            .find_by_title(title)
            .ok_or_else(|| RankError::NotFound(MovieRef::Title(title.to_string())))?;
        self.recommend(row, k)
    }
}

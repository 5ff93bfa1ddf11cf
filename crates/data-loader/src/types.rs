//! Core domain types: the movie catalog and the similarity matrix.
//!
//! Both are built once (offline artifacts, parsed at startup) and then only
//! read. Row `i` of the matrix always describes `catalog[i]`.

use crate::error::{DataLoadError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// External identifier for a movie (the TMDB id in the shipped artifacts)
pub type MovieId = u32;

/// Position of a movie in the catalog, and of its row/column in the matrix
pub type RowIndex = usize;

// =============================================================================
// Movie / Catalog
// =============================================================================

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
}

/// Ordered list of movies. The order is significant: it defines the
/// matrix indexing and breaks ties when ranking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    movies: Vec<Movie>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate movie ids
    pub fn new(movies: Vec<Movie>) -> Result<Self> {
        let mut seen: HashMap<MovieId, RowIndex> = HashMap::with_capacity(movies.len());
        for (row, movie) in movies.iter().enumerate() {
            if let Some(&first) = seen.get(&movie.id) {
                return Err(DataLoadError::DuplicateMovie {
                    id: movie.id,
                    first,
                    second: row,
                });
            }
            seen.insert(movie.id, row);
        }
        Ok(Self { movies })
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Get the movie stored at a row
    pub fn get(&self, row: RowIndex) -> Option<&Movie> {
        self.movies.get(row)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Movie> {
        self.movies.iter()
    }
}

// =============================================================================
// SimilarityMatrix
// =============================================================================

/// Square table of pairwise similarities, stored row-major.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    /// Build a matrix from its rows.
    ///
    /// Every row must have as many entries as there are rows, and every
    /// entry must be finite.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let size = rows.len();
        let mut values = Vec::with_capacity(size * size);

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(DataLoadError::DimensionMismatch {
                    what: format!("similarity row {} length", row_idx),
                    expected: size,
                    found: row.len(),
                });
            }
            if let Some(col) = row.iter().position(|v| !v.is_finite()) {
                return Err(DataLoadError::NonFiniteValue { row: row_idx, col });
            }
            values.extend(row);
        }

        Ok(Self { size, values })
    }

    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Borrow one row of the matrix
    pub fn row(&self, row: RowIndex) -> Option<&[f32]> {
        if row >= self.size {
            return None;
        }
        let start = row * self.size;
        Some(&self.values[start..start + self.size])
    }

    /// Similarity between two movies
    pub fn get(&self, row: RowIndex, col: RowIndex) -> Option<f32> {
        self.row(row).and_then(|r| r.get(col).copied())
    }
}

// =============================================================================
// DataIndex - catalog + matrix + title lookup
// =============================================================================

/// The loaded, validated pair of artifacts.
///
/// Shared across the process behind an `Arc`; nothing mutates it after
/// construction.
#[derive(Debug)]
pub struct DataIndex {
    pub(crate) catalog: Catalog,
    pub(crate) matrix: SimilarityMatrix,

    /// Lower-cased title -> first row carrying that title
    pub(crate) title_index: HashMap<String, RowIndex>,
    /// Movie id -> row
    pub(crate) id_index: HashMap<MovieId, RowIndex>,
}

impl DataIndex {
    /// Pair a catalog with its matrix, checking that their sizes agree
    pub fn new(catalog: Catalog, matrix: SimilarityMatrix) -> Result<Self> {
        if catalog.is_empty() {
            return Err(DataLoadError::ValidationError(
                "catalog contains no movies".to_string(),
            ));
        }
        if catalog.len() != matrix.size() {
            return Err(DataLoadError::DimensionMismatch {
                what: "similarity matrix size vs catalog length".to_string(),
                expected: catalog.len(),
                found: matrix.size(),
            });
        }

        let mut title_index = HashMap::with_capacity(catalog.len());
        let mut id_index = HashMap::with_capacity(catalog.len());
        for (row, movie) in catalog.iter().enumerate() {
            title_index
                .entry(movie.title.to_lowercase())
                .or_insert(row);
            id_index.insert(movie.id, row);
        }

        Ok(Self {
            catalog,
            matrix,
            title_index,
            id_index,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    /// Case-insensitive exact title lookup. Duplicate titles resolve to
    /// the first row.
    pub fn find_by_title(&self, title: &str) -> Option<RowIndex> {
        self.title_index.get(&title.trim().to_lowercase()).copied()
    }

    /// Row for an external movie id
    pub fn find_by_id(&self, id: MovieId) -> Option<RowIndex> {
        self.id_index.get(&id).copied()
    }

    /// Get a movie by row
    pub fn get_movie(&self, row: RowIndex) -> Option<&Movie> {
        self.catalog.get(row)
    }

    /// Case-insensitive substring search over titles.
    ///
    /// Exact matches come first, then substring matches in catalog order.
    pub fn search_titles(&self, query: &str) -> Vec<RowIndex> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut exact = Vec::new();
        let mut partial = Vec::new();
        for (row, movie) in self.catalog.iter().enumerate() {
            let title = movie.title.to_lowercase();
            if title == needle {
                exact.push(row);
            } else if title.contains(&needle) {
                partial.push(row);
            }
        }
        exact.extend(partial);
        exact
    }

    /// Number of movies
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}

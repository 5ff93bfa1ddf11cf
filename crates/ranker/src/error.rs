//! Errors returned by the ranker.

use data_loader::{MovieId, RowIndex};
use thiserror::Error;

/// Why a recommendation request could not be served
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankError {
    /// The selected movie is not in the catalog
    #[error("Movie not found: {0}")]
    NotFound(MovieRef),

    /// The request itself is malformed (e.g. k == 0)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// How the caller referred to the missing movie
#[derive(Debug, Clone, PartialEq)]
pub enum MovieRef {
    Row(RowIndex),
    Id(MovieId),
    Title(String),
}

impl std::fmt::Display for MovieRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovieRef::Row(row) => write!(f, "row {}", row),
            MovieRef::Id(id) => write!(f, "id {}", id),
            MovieRef::Title(title) => write!(f, "'{}'", title),
        }
    }
}

pub type Result<T> = std::result::Result<T, RankError>;

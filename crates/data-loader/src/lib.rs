//! # Data Loader Crate
//!
//! Loads the two precomputed artifacts the recommender runs on: the movie
//! catalog and the movie-by-movie similarity matrix.
//!
//! ## Main Components
//!
//! - **types**: Movie, Catalog, SimilarityMatrix and the DataIndex bundle
//! - **parser**: Parse the .dat artifacts
//! - **index**: Load a directory into a validated DataIndex
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_files(Path::new("data"))?;
//!
//! let row = index.find_by_title("Avatar").unwrap();
//! let row_values = index.matrix().row(row).unwrap();
//! println!("{} has {} neighbours", index.get_movie(row).unwrap().title, row_values.len() - 1);
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;

pub use error::{DataLoadError, Result};
pub use index::{MOVIES_FILE, SIMILARITY_FILE};
pub use types::{
    // Type aliases
    MovieId,
    RowIndex,
    // Core types
    Movie,
    Catalog,
    SimilarityMatrix,
    DataIndex,
};

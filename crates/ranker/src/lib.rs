//! # Ranker Crate
//!
//! Turns one row of the precomputed similarity matrix into a ranked list
//! of similar movies with a 0..5 star score.
//!
//! The star score is relative: the most similar movie in the returned set
//! gets 5 stars and the least similar gets 0. It says nothing about how
//! good a movie is.
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use ranker::Ranker;
//! use std::sync::Arc;
//!
//! let data_index = Arc::new(DataIndex::load_from_files("data".as_ref())?);
//! let ranker = Ranker::new(data_index);
//!
//! for rec in ranker.recommend_by_title("Avatar", 5)? {
//!     println!("{} {:.1}", rec.title, rec.display_score);
//! }
//! ```

pub mod error;
pub mod ranker;
pub mod stars;

pub use error::{MovieRef, RankError, Result};
pub use ranker::{recommend, recommend_with, Ranker, Recommendation, DEFAULT_K};
pub use stars::{fill_percent, remap_scores, StarRounding, MAX_STARS};

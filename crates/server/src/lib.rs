//! Server crate for the similar-movie recommender.
//!
//! This crate contains the orchestrator that ties ranking and poster
//! lookup together for one user selection.

pub mod orchestrator;

pub use orchestrator::{MovieRecommendation, RecommendationOrchestrator};

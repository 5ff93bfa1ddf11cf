//! Similarity -> star conversion.
//!
//! The 0..5 scale is relative to the values being displayed: the most
//! similar shown movie gets 5, the least similar gets 0.

use serde::{Deserialize, Serialize};

/// Top of the star scale
pub const MAX_STARS: f32 = 5.0;

/// Granularity used when turning a display score into stars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StarRounding {
    /// Nearest whole star
    Whole,
    /// Nearest half star
    #[default]
    Half,
}

impl StarRounding {
    pub fn round(self, score: f32) -> f32 {
        let rounded = match self {
            StarRounding::Whole => score.round(),
            StarRounding::Half => (score * 2.0).round() / 2.0,
        };
        rounded.clamp(0.0, MAX_STARS)
    }
}

/// Min-max rescale of `values` into [0, 5].
///
/// When every value is equal there is no spread to show and all scores
/// are 0.
pub fn remap_scores(values: &[f32]) -> Vec<f32> {
    let Some((min_sim, max_sim)) = min_max(values) else {
        return Vec::new();
    };

    values
        .iter()
        .map(|&s| {
            if max_sim == min_sim {
                0.0
            } else {
                (MAX_STARS * (s - min_sim) / (max_sim - min_sim)).clamp(0.0, MAX_STARS)
            }
        })
        .collect()
}

/// Width of the filled part of a five-star strip, 0..100
pub fn fill_percent(score: f32) -> f32 {
    (score / MAX_STARS * 100.0).clamp(0.0, 100.0)
}

fn min_max(values: &[f32]) -> Option<(f32, f32)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

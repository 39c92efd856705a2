// src/core/identity/matcher.rs
use tracing::{debug, warn};

use super::{
    gallery::Gallery,
    types::{FaceDetection, IdentityMatch},
};
use crate::utils::config::RecognitionConfig;

/// Euclidean distance between two embeddings, `None` when their lengths differ.
pub fn face_distance(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() {
        return None;
    }

    let sum: f32 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
    Some(sum.sqrt())
}

#[derive(Debug, Clone, Copy)]
pub struct IdentityMatcher {
    threshold: f32,
    tolerance: f32,
}

impl IdentityMatcher {
    /// `threshold` is the acceptance cutoff for the nearest identity; `tolerance`
    /// is the looser per-candidate cutoff that sets its match flag.
    pub fn new(threshold: f32, tolerance: f32) -> Self {
        Self {
            threshold,
            tolerance,
        }
    }

    pub fn from_config(config: &RecognitionConfig) -> Self {
        Self::new(config.threshold, config.tolerance)
    }

    /// Finds the nearest known identity. On equal distances the identity that
    /// comes first in the gallery wins. The nearest identity is accepted only
    /// when its own match flag is set and its distance is strictly below the
    /// threshold.
    pub fn best_match(&self, embedding: &[f32], gallery: &Gallery) -> IdentityMatch {
        let mut nearest: Option<(&str, f32)> = None;

        for identity in gallery.iter() {
            let Some(distance) = face_distance(embedding, &identity.embedding) else {
                warn!(
                    "Skipping {}: embedding length {} does not match probe length {}",
                    identity.name,
                    identity.embedding.len(),
                    embedding.len()
                );
                continue;
            };
            if distance.is_nan() {
                continue;
            }

            // Strictly closer only, so the earliest of equal minima is kept.
            if nearest.map_or(true, |(_, best)| distance < best) {
                nearest = Some((identity.name.as_str(), distance));
            }
        }

        let Some((name, distance)) = nearest else {
            return IdentityMatch::unknown();
        };

        let matched = distance <= self.tolerance;
        let accepted = matched && distance < self.threshold;

        debug!(
            "Nearest identity {} at distance {:.4} (matched: {}, accepted: {})",
            name, distance, matched, accepted
        );

        IdentityMatch {
            candidate: Some(name.to_string()),
            distance: Some(distance),
            accepted,
        }
    }

    /// Matches every detected face, preserving detection order.
    pub fn match_all(&self, faces: &[FaceDetection], gallery: &Gallery) -> Vec<IdentityMatch> {
        faces
            .iter()
            .map(|face| self.best_match(&face.embedding, gallery))
            .collect()
    }
}

impl Default for IdentityMatcher {
    fn default() -> Self {
        Self::from_config(&RecognitionConfig::default())
    }
}

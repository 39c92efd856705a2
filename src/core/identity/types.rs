// src/core/identity/types.rs
use serde::{Deserialize, Serialize};

/// Name reported for faces that match no known identity.
pub const UNKNOWN_IDENTITY: &str = "Unknown";

/// Face location in pixels, serialized as `[top, right, bottom, left]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 4]", into = "[u32; 4]")]
pub struct BoundingBox {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl From<[u32; 4]> for BoundingBox {
    fn from([top, right, bottom, left]: [u32; 4]) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

impl From<BoundingBox> for [u32; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.top, bbox.right, bbox.bottom, bbox.left]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceDetection {
    #[serde(rename = "box")]
    pub bounding_box: BoundingBox,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownIdentity {
    pub name: String,
    pub embedding: Vec<f32>,
}

impl KnownIdentity {
    pub fn new(name: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            embedding,
        }
    }
}

/// Outcome of matching one face against the gallery.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityMatch {
    /// Nearest known identity, whether or not it was accepted.
    pub candidate: Option<String>,
    pub distance: Option<f32>,
    pub accepted: bool,
}

impl IdentityMatch {
    pub fn unknown() -> Self {
        Self {
            candidate: None,
            distance: None,
            accepted: false,
        }
    }

    pub fn name(&self) -> &str {
        match (&self.candidate, self.accepted) {
            (Some(name), true) => name,
            _ => UNKNOWN_IDENTITY,
        }
    }

    /// An accepted match whose name is not the reserved unknown label.
    pub fn is_known(&self) -> bool {
        self.name() != UNKNOWN_IDENTITY
    }
}

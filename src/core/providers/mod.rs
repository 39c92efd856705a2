//! Capabilities backed by pretrained models.
//!
//! Face embedding, gaze classification and body-pose detection are not computed
//! in this crate. They sit behind the traits below so the scoring and ledger code
//! can be driven by the inference sidecar in production and by mocks in tests.

pub mod remote;

use std::io::Cursor;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

use crate::{
    core::{engagement::GazeDirection, identity::types::FaceDetection, posture::BodyLandmarks},
    utils::error::{MonitorError, Result},
};

pub use remote::RemoteModels;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },

    #[error("Invalid response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

/// A decoded video frame together with the bytes it was decoded from.
#[derive(Debug, Clone)]
pub struct Frame {
    image: DynamicImage,
    encoded: Vec<u8>,
}

impl Frame {
    pub fn decode(encoded: Vec<u8>) -> Result<Self> {
        let image = image::load_from_memory(&encoded)
            .map_err(|e| MonitorError::Frame(format!("Undecodable image: {}", e)))?;

        Ok(Self { image, encoded })
    }

    /// Accepts `data:image/<type>;base64,<payload>` or a bare base64 payload.
    pub fn from_data_url(data: &str) -> Result<Self> {
        let payload = match data.trim().split_once(',') {
            Some((header, payload)) if header.starts_with("data:") => payload,
            Some(_) => return Err(MonitorError::Frame("Malformed data URL".into())),
            None => data.trim(),
        };

        if payload.is_empty() {
            return Err(MonitorError::Frame("Empty frame payload".into()));
        }

        let encoded = BASE64
            .decode(payload)
            .map_err(|e| MonitorError::Frame(format!("Invalid base64 payload: {}", e)))?;

        Self::decode(encoded)
    }

    /// Encodes an in-memory image as PNG so it can travel like a camera frame.
    pub fn from_image(image: DynamicImage) -> Result<Self> {
        let mut encoded = Cursor::new(Vec::new());
        image
            .write_to(&mut encoded, ImageFormat::Png)
            .map_err(|e| MonitorError::Frame(format!("Failed to encode image: {}", e)))?;

        Ok(Self {
            image,
            encoded: encoded.into_inner(),
        })
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FaceEmbedder: Send + Sync {
    /// One entry per detected face, in detection order.
    async fn face_embeddings(
        &self,
        frame: &Frame,
    ) -> std::result::Result<Vec<FaceDetection>, ProviderError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GazeClassifier: Send + Sync {
    async fn classify_gaze(&self, frame: &Frame)
        -> std::result::Result<GazeDirection, ProviderError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoseEstimator: Send + Sync {
    /// `None` when no body was found in the frame.
    async fn body_landmarks(
        &self,
        frame: &Frame,
    ) -> std::result::Result<Option<BodyLandmarks>, ProviderError>;
}

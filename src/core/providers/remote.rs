// src/core/providers/remote.rs
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use super::{FaceEmbedder, Frame, GazeClassifier, PoseEstimator, ProviderError};
use crate::{
    core::{engagement::GazeDirection, identity::types::FaceDetection, posture::BodyLandmarks},
    utils::config::ProviderConfig,
};

/// Client for the inference sidecar that hosts the face, gaze and pose models.
pub struct RemoteModels {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct FrameRequest {
    image: String,
}

#[derive(Debug, Deserialize)]
struct FacesResponse {
    faces: Vec<FaceDetection>,
}

#[derive(Debug, Deserialize)]
struct GazeResponse {
    gaze: GazeDirection,
}

#[derive(Debug, Deserialize)]
struct PoseResponse {
    landmarks: Option<BodyLandmarks>,
}

impl RemoteModels {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ProviderError::Request {
                endpoint: config.endpoint.clone(),
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    async fn call<T: DeserializeOwned>(&self, path: &str, frame: &Frame) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        let request = FrameRequest {
            image: BASE64.encode(frame.encoded()),
        };

        debug!("Posting {} byte frame to {}", frame.encoded().len(), url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Request {
                endpoint: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                endpoint: url,
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| ProviderError::Decode {
            endpoint: url,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl FaceEmbedder for RemoteModels {
    async fn face_embeddings(&self, frame: &Frame) -> Result<Vec<FaceDetection>, ProviderError> {
        let response: FacesResponse = self.call("/faces", frame).await?;
        Ok(response.faces)
    }
}

#[async_trait]
impl GazeClassifier for RemoteModels {
    async fn classify_gaze(&self, frame: &Frame) -> Result<GazeDirection, ProviderError> {
        let response: GazeResponse = self.call("/gaze", frame).await?;
        Ok(response.gaze)
    }
}

#[async_trait]
impl PoseEstimator for RemoteModels {
    async fn body_landmarks(&self, frame: &Frame) -> Result<Option<BodyLandmarks>, ProviderError> {
        let response: PoseResponse = self.call("/pose", frame).await?;
        Ok(response.landmarks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = ProviderConfig {
            endpoint: "http://models.local:8500/".to_string(),
            timeout_secs: 5,
        };
        let models = RemoteModels::new(&config).unwrap();
        assert_eq!(models.base_url, "http://models.local:8500");
    }

    #[test]
    fn test_response_payloads_parse() {
        let faces: FacesResponse = serde_json::from_str(
            r#"{"faces": [{"box": [10, 60, 70, 5], "embedding": [0.1, -0.2, 0.3]}]}"#,
        )
        .unwrap();
        assert_eq!(faces.faces.len(), 1);
        assert_eq!(faces.faces[0].bounding_box.top, 10);
        assert_eq!(faces.faces[0].embedding, vec![0.1, -0.2, 0.3]);

        let gaze: GazeResponse = serde_json::from_str(r#"{"gaze": "looking_left"}"#).unwrap();
        assert_eq!(gaze.gaze, GazeDirection::LookingLeft);

        let pose: PoseResponse = serde_json::from_str(r#"{"landmarks": null}"#).unwrap();
        assert!(pose.landmarks.is_none());

        let pose: PoseResponse = serde_json::from_str(
            r#"{"landmarks": {"nose": {"x": 0.5, "y": 0.3}, "left_shoulder": {"x": 0.3, "y": 0.6}}}"#,
        )
        .unwrap();
        let landmarks = pose.landmarks.unwrap();
        assert!(landmarks.nose.is_some());
        assert!(landmarks.right_ear.is_none());
    }
}

// tests/common/mod.rs
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use classroom_monitor::{
    core::{
        engagement::GazeDirection,
        identity::{BoundingBox, FaceDetection, Gallery, IdentityMatcher, KnownIdentity},
        posture::{BodyLandmarks, Point},
        providers::{FaceEmbedder, Frame, GazeClassifier, PoseEstimator, ProviderError},
        services::MonitorService,
    },
    storage::{SharedLedger, SheetLedger},
};
use image::{DynamicImage, RgbImage};
use mockall::mock;
use parking_lot::Mutex;
use tempfile::TempDir;

mock! {
    pub Models {}

    #[async_trait]
    impl FaceEmbedder for Models {
        async fn face_embeddings(&self, frame: &Frame) -> Result<Vec<FaceDetection>, ProviderError>;
    }

    #[async_trait]
    impl GazeClassifier for Models {
        async fn classify_gaze(&self, frame: &Frame) -> Result<GazeDirection, ProviderError>;
    }

    #[async_trait]
    impl PoseEstimator for Models {
        async fn body_landmarks(&self, frame: &Frame) -> Result<Option<BodyLandmarks>, ProviderError>;
    }
}

pub struct TestContext {
    pub dir: TempDir,
    pub ledger: SharedLedger,
    pub service: Arc<MonitorService>,
}

impl TestContext {
    pub fn new(models: MockModels) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let ledger: SharedLedger = Arc::new(Mutex::new(
            SheetLedger::open(dir.path().join("attendance.json"), dir.path().join("archive"))
                .expect("failed to open ledger"),
        ));

        let models = Arc::new(models);
        let service = Arc::new(MonitorService::new(
            models.clone(),
            models.clone(),
            models,
            Arc::new(classroom()),
            IdentityMatcher::default(),
            ledger.clone(),
        ));

        Self {
            dir,
            ledger,
            service,
        }
    }
}

pub fn classroom() -> Gallery {
    Gallery::new(vec![
        KnownIdentity::new("alice", vec![0.0, 0.0, 0.0, 0.0]),
        KnownIdentity::new("bob", vec![1.0, 0.0, 0.0, 0.0]),
    ])
}

pub fn face(embedding: Vec<f32>) -> FaceDetection {
    FaceDetection {
        bounding_box: BoundingBox::from([10, 60, 70, 5]),
        embedding,
    }
}

pub fn upright_landmarks() -> BodyLandmarks {
    BodyLandmarks {
        nose: Some(Point::new(0.5, 0.3)),
        left_shoulder: Some(Point::new(0.35, 0.5)),
        right_shoulder: Some(Point::new(0.65, 0.5)),
        left_ear: Some(Point::new(0.42, 0.28)),
        right_ear: Some(Point::new(0.58, 0.28)),
    }
}

pub fn test_frame() -> Frame {
    Frame::from_image(DynamicImage::ImageRgb8(RgbImage::new(16, 12))).expect("failed to encode frame")
}

pub fn data_url() -> String {
    format!("data:image/png;base64,{}", BASE64.encode(test_frame().encoded()))
}

/// Models that see `faces`, report `gaze` and find `landmarks` in every frame.
pub fn models(
    faces: Vec<FaceDetection>,
    gaze: GazeDirection,
    landmarks: Option<BodyLandmarks>,
) -> MockModels {
    let mut models = MockModels::new();
    models
        .expect_face_embeddings()
        .returning(move |_| Ok(faces.clone()));
    models.expect_classify_gaze().returning(move |_| Ok(gaze));
    models
        .expect_body_landmarks()
        .returning(move |_| Ok(landmarks.clone()));
    models
}

use std::sync::Arc;

use chrono::Local;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::{
    core::{
        engagement::{score_gaze, Engagement, GazeDirection},
        identity::{Gallery, IdentityMatcher, UNKNOWN_IDENTITY},
        posture::{analyze_posture, Activity, PostureSample, PostureStatus},
        providers::{FaceEmbedder, Frame, GazeClassifier, PoseEstimator},
    },
    storage::{AttendanceRecord, SessionId, Session, SharedLedger},
    utils::error::Result,
};

/// Everything learned from one frame, flattened for the HTTP response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameAnalysis {
    /// Identity of the first detected face, `Unknown` when unmatched or absent.
    pub identity: String,
    /// One entry per detected face, in detection order.
    pub faces: Vec<String>,
    pub engagement: u8,
    pub remarks: String,
    pub gaze_status: GazeDirection,
    pub posture_status: PostureStatus,
    pub neck_angle: f64,
    pub left_bend: f64,
    pub right_bend: f64,
    pub posture_score: u8,
    pub activity_status: Activity,
    /// Whether an attendance record was written for this frame.
    pub recorded: bool,
}

impl FrameAnalysis {
    fn new(
        faces: Vec<String>,
        gaze: GazeDirection,
        engagement: Engagement,
        posture: PostureSample,
    ) -> Self {
        Self {
            identity: faces
                .first()
                .cloned()
                .unwrap_or_else(|| UNKNOWN_IDENTITY.to_string()),
            faces,
            engagement: engagement.score,
            remarks: engagement.remark.to_string(),
            gaze_status: gaze,
            posture_status: posture.status,
            neck_angle: posture.neck_angle,
            left_bend: posture.left_bend,
            right_bend: posture.right_bend,
            posture_score: posture.score,
            activity_status: posture.activity,
            recorded: false,
        }
    }
}

pub struct MonitorService {
    faces: Arc<dyn FaceEmbedder>,
    gaze: Arc<dyn GazeClassifier>,
    pose: Arc<dyn PoseEstimator>,
    gallery: Arc<Gallery>,
    matcher: IdentityMatcher,
    ledger: SharedLedger,
}

impl MonitorService {
    pub fn new(
        faces: Arc<dyn FaceEmbedder>,
        gaze: Arc<dyn GazeClassifier>,
        pose: Arc<dyn PoseEstimator>,
        gallery: Arc<Gallery>,
        matcher: IdentityMatcher,
        ledger: SharedLedger,
    ) -> Self {
        Self {
            faces,
            gaze,
            pose,
            gallery,
            matcher,
            ledger,
        }
    }

    /// Runs gaze, face and pose analysis on one frame and files attendance for
    /// the first face when it is recognized. Model failures fail the frame;
    /// ledger failures are logged and only clear `recorded`.
    pub async fn analyze(&self, frame: &Frame) -> Result<FrameAnalysis> {
        let gaze = self.gaze.classify_gaze(frame).await?;
        let engagement = score_gaze(gaze);

        let detections = self.faces.face_embeddings(frame).await?;
        let matches = self.matcher.match_all(&detections, &self.gallery);
        let names: Vec<String> = matches.iter().map(|m| m.name().to_string()).collect();
        debug!("Faces in frame: {:?}", names);

        let landmarks = self.pose.body_landmarks(frame).await?;
        let posture = analyze_posture(landmarks.as_ref());

        let mut analysis = FrameAnalysis::new(names, gaze, engagement, posture);

        if let Some(first) = matches.first().filter(|m| m.is_known()) {
            analysis.recorded = self.record_attendance(first.name(), &analysis).await;
        }

        Ok(analysis)
    }

    /// Appends on the blocking pool; the ledger lock and file I/O never run on
    /// an async worker.
    async fn record_attendance(&self, name: &str, analysis: &FrameAnalysis) -> bool {
        let ledger = self.ledger.clone();
        let owner = name.to_string();
        let engagement = analysis.engagement;
        let remarks = analysis.remarks.clone();
        let posture = analysis.posture_status.as_str();

        let appended = tokio::task::spawn_blocking(move || {
            let mut ledger = ledger.lock();
            let record = AttendanceRecord::present(
                Local::now().date_naive(),
                ledger.current_session().id.clone(),
                owner.as_str(),
                engagement,
                remarks.as_str(),
                posture,
            );
            ledger.append(record)
        })
        .await;

        match appended {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                error!("Error updating attendance for {}: {}", name, e);
                false
            }
            Err(e) => {
                error!("Attendance task for {} failed: {}", name, e);
                false
            }
        }
    }

    pub fn attendance(&self, session_id: Option<&SessionId>) -> Result<Vec<AttendanceRecord>> {
        Ok(self.ledger.lock().query(session_id)?)
    }

    pub fn current_session(&self) -> Session {
        self.ledger.lock().current_session().clone()
    }

    pub fn reset_session(&self) -> Result<Session> {
        let mut ledger = self.ledger.lock();
        let session_id = ledger.reset()?;
        info!("Attendance session reset; now recording under {}", session_id);
        Ok(ledger.current_session().clone())
    }

    pub fn export_attendance(&self) -> Result<Vec<u8>> {
        Ok(self.ledger.lock().export()?)
    }
}

// src/core/posture/mod.rs
mod geometry;
mod types;

use tracing::{debug, warn};

pub use geometry::angle_at;
pub use types::{Activity, BodyLandmarks, Point, PostureSample, PostureStatus};

pub const IDEAL_NECK_ANGLE: f64 = 70.0;
pub const IDEAL_BEND_ANGLE: f64 = 20.0;
pub const MIN_BAD_POSTURE_SCORE: f64 = 20.0;

const NECK_RANGE_EXCLUSIVE: (f64, f64) = (50.0, 90.0);
const MAX_BEND_EXCLUSIVE: f64 = 40.0;

/// Classifies raw joint angles. Good posture always scores 100; bad posture
/// loses one point per degree of deviation from the ideal angles but never
/// drops below 20.
pub fn classify(neck_angle: f64, left_bend: f64, right_bend: f64) -> (PostureStatus, f64) {
    let (neck_min, neck_max) = NECK_RANGE_EXCLUSIVE;
    let good = neck_min < neck_angle
        && neck_angle < neck_max
        && left_bend < MAX_BEND_EXCLUSIVE
        && right_bend < MAX_BEND_EXCLUSIVE;

    if good {
        return (PostureStatus::Good, 100.0);
    }

    let deviation = (IDEAL_NECK_ANGLE - neck_angle).abs()
        + (IDEAL_BEND_ANGLE - left_bend).abs()
        + (IDEAL_BEND_ANGLE - right_bend).abs();
    let score = (100.0 - deviation).max(0.0).max(MIN_BAD_POSTURE_SCORE);

    (PostureStatus::Bad, score)
}

/// Scores the posture in a frame from whatever landmarks the pose model found.
///
/// No landmarks at all means nobody is in view. Missing individual points keep
/// the not-detected defaults and mark the frame as partially active.
pub fn analyze_posture(landmarks: Option<&BodyLandmarks>) -> PostureSample {
    let Some(landmarks) = landmarks else {
        debug!("No body landmarks detected");
        return PostureSample::not_detected(Activity::Inactive);
    };

    let required = (
        usable(landmarks.left_shoulder),
        usable(landmarks.right_shoulder),
        usable(landmarks.left_ear),
        usable(landmarks.right_ear),
        usable(landmarks.nose),
    );

    let (Some(left_shoulder), Some(right_shoulder), Some(left_ear), Some(right_ear), Some(nose)) =
        required
    else {
        warn!("Body detected but posture landmarks are incomplete: {:?}", landmarks);
        return PostureSample::not_detected(Activity::PartiallyActive);
    };

    let neck_angle = angle_at(left_shoulder, nose, right_shoulder);
    let left_bend = angle_at(left_ear, left_shoulder, nose);
    let right_bend = angle_at(right_ear, right_shoulder, nose);

    let (status, score) = classify(neck_angle, left_bend, right_bend);

    let sample = PostureSample {
        neck_angle: round_tenth(neck_angle),
        left_bend: round_tenth(left_bend),
        right_bend: round_tenth(right_bend),
        status,
        score: round_score(score),
        activity: Activity::Active,
    };

    debug!(
        "Posture analysis - status: {}, neck: {}, left bend: {}, right bend: {}, score: {}",
        sample.status, sample.neck_angle, sample.left_bend, sample.right_bend, sample.score
    );

    sample
}

fn usable(point: Option<Point>) -> Option<Point> {
    point.filter(Point::is_finite)
}

/// Halves round to the even neighbour, so 54.5 reports as 54.
fn round_score(score: f64) -> u8 {
    score.round_ties_even() as u8
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

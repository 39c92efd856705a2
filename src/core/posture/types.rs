// src/core/posture/types.rs
use std::fmt;

use serde::{Deserialize, Serialize};

/// A 2D landmark in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Body landmarks used for posture analysis. The pose model may omit any of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyLandmarks {
    pub nose: Option<Point>,
    pub left_shoulder: Option<Point>,
    pub right_shoulder: Option<Point>,
    pub left_ear: Option<Point>,
    pub right_ear: Option<Point>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostureStatus {
    #[serde(rename = "Not detected")]
    NotDetected,
    #[serde(rename = "Good Posture")]
    Good,
    #[serde(rename = "Bad Posture")]
    Bad,
}

impl PostureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostureStatus::NotDetected => "Not detected",
            PostureStatus::Good => "Good Posture",
            PostureStatus::Bad => "Bad Posture",
        }
    }
}

impl fmt::Display for PostureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activity {
    Inactive,
    #[serde(rename = "Partially Active")]
    PartiallyActive,
    Active,
}

impl Activity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Activity::Inactive => "Inactive",
            Activity::PartiallyActive => "Partially Active",
            Activity::Active => "Active",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-frame posture reading. Angles are in degrees, rounded to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostureSample {
    pub neck_angle: f64,
    pub left_bend: f64,
    pub right_bend: f64,
    pub status: PostureStatus,
    pub score: u8,
    pub activity: Activity,
}

impl PostureSample {
    pub fn not_detected(activity: Activity) -> Self {
        Self {
            neck_angle: 0.0,
            left_bend: 0.0,
            right_bend: 0.0,
            status: PostureStatus::NotDetected,
            score: 0,
            activity,
        }
    }
}

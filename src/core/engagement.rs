// src/core/engagement.rs
use std::fmt;

use serde::{Deserialize, Serialize};

pub const BASE_SCORE: u8 = 100;
pub const BLINKING_PENALTY: u8 = 30;
pub const DISTRACTED_PENALTY: u8 = 20;

pub const REMARK_SLEEPING: &str = "Student appears to be sleeping";
pub const REMARK_DISTRACTED: &str = "Student is distracted";
pub const REMARK_PARTICIPATING: &str = "Actively participating";

/// Gaze classification reported by the gaze model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GazeDirection {
    Blinking,
    LookingLeft,
    LookingRight,
    LookingCenter,
    #[serde(other)]
    Unknown,
}

impl GazeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            GazeDirection::Blinking => "blinking",
            GazeDirection::LookingLeft => "looking_left",
            GazeDirection::LookingRight => "looking_right",
            GazeDirection::LookingCenter => "looking_center",
            GazeDirection::Unknown => "unknown",
        }
    }
}

impl fmt::Display for GazeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Engagement {
    pub score: u8,
    pub remark: &'static str,
}

/// Blinking outranks looking sideways; everything else counts as participating.
pub fn score_gaze(gaze: GazeDirection) -> Engagement {
    match gaze {
        GazeDirection::Blinking => Engagement {
            score: BASE_SCORE - BLINKING_PENALTY,
            remark: REMARK_SLEEPING,
        },
        GazeDirection::LookingLeft | GazeDirection::LookingRight => Engagement {
            score: BASE_SCORE - DISTRACTED_PENALTY,
            remark: REMARK_DISTRACTED,
        },
        GazeDirection::LookingCenter | GazeDirection::Unknown => Engagement {
            score: BASE_SCORE,
            remark: REMARK_PARTICIPATING,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blinking_reads_as_sleeping() {
        let engagement = score_gaze(GazeDirection::Blinking);
        assert_eq!(engagement.score, 70);
        assert_eq!(engagement.remark, "Student appears to be sleeping");
    }

    #[test]
    fn test_sideways_gaze_is_distracted() {
        for gaze in [GazeDirection::LookingLeft, GazeDirection::LookingRight] {
            let engagement = score_gaze(gaze);
            assert_eq!(engagement.score, 80);
            assert_eq!(engagement.remark, "Student is distracted");
        }
    }

    #[test]
    fn test_center_and_unknown_are_participating() {
        for gaze in [GazeDirection::LookingCenter, GazeDirection::Unknown] {
            let engagement = score_gaze(gaze);
            assert_eq!(engagement.score, 100);
            assert_eq!(engagement.remark, "Actively participating");
        }
    }

    #[test]
    fn test_unrecognized_labels_deserialize_as_unknown() {
        let gaze: GazeDirection = serde_json::from_str("\"looking_up\"").unwrap();
        assert_eq!(gaze, GazeDirection::Unknown);

        let gaze: GazeDirection = serde_json::from_str("\"blinking\"").unwrap();
        assert_eq!(gaze, GazeDirection::Blinking);
        assert_eq!(gaze.to_string(), "blinking");
    }
}

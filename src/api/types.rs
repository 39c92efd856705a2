// src/api/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{Session, SessionId};

#[derive(Debug, Deserialize)]
pub struct ProcessFrameRequest {
    /// Data URL (`data:image/jpeg;base64,...`) or bare base64 image.
    pub frame: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AttendanceQuery {
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            session_id: session.id,
            created_at: session.created_at,
        }
    }
}

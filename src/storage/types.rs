// src/storage/types.rs
use std::{
    fmt,
    sync::atomic::{AtomicI64, Ordering},
};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub const SESSION_ID_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";

static LAST_SESSION_MILLIS: AtomicI64 = AtomicI64::new(i64::MIN);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives an id from `now`, bumped past the last id issued in this process
    /// so ids keep increasing even when two sessions start in the same millisecond.
    fn generate(now: DateTime<Utc>) -> Self {
        let wanted = now.timestamp_millis();
        let previous = LAST_SESSION_MILLIS
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(wanted.max(last.saturating_add(1)))
            })
            .unwrap_or(wanted);
        let millis = wanted.max(previous.saturating_add(1));

        let stamp = Utc
            .timestamp_millis_opt(millis)
            .single()
            .unwrap_or(now);
        Self(stamp.format(SESSION_ID_FORMAT).to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The attendance-taking period that new records are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn start() -> Self {
        let created_at = Utc::now();
        Self {
            id: SessionId::generate(created_at),
            created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceStatus::Present => f.write_str("Present"),
        }
    }
}

/// One sighting of a recognized person. Never edited after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub date: NaiveDate,
    pub session_id: SessionId,
    pub name: String,
    pub status: AttendanceStatus,
    pub engagement: u8,
    pub remarks: String,
    pub posture: String,
}

impl AttendanceRecord {
    pub fn present(
        date: NaiveDate,
        session_id: SessionId,
        name: impl Into<String>,
        engagement: u8,
        remarks: impl Into<String>,
        posture: impl Into<String>,
    ) -> Self {
        Self {
            date,
            session_id,
            name: name.into(),
            status: AttendanceStatus::Present,
            engagement,
            remarks: remarks.into(),
            posture: posture.into(),
        }
    }
}

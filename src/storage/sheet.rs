//! On-disk layout of an attendance sheet.
//!
//! A sheet is a JSON document holding a fixed header row and one array per
//! record, in header order, so archived sheets stay readable column by column.

use std::{
    fs::{self, File},
    io::{BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{
    errors::{Result, StorageError},
    types::{AttendanceRecord, AttendanceStatus, Session, SessionId},
};

pub const SHEET_TITLE: &str = "Attendance";
pub const COLUMNS: [&str; 7] = [
    "Date",
    "SessionId",
    "Name",
    "Status",
    "Engagement",
    "Remarks",
    "Posture",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub title: String,
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
    pub columns: Vec<String>,
    pub rows: Vec<SheetRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetRow(
    NaiveDate,
    SessionId,
    String,
    AttendanceStatus,
    u8,
    String,
    String,
);

impl From<AttendanceRecord> for SheetRow {
    fn from(record: AttendanceRecord) -> Self {
        Self(
            record.date,
            record.session_id,
            record.name,
            record.status,
            record.engagement,
            record.remarks,
            record.posture,
        )
    }
}

impl From<SheetRow> for AttendanceRecord {
    fn from(row: SheetRow) -> Self {
        let SheetRow(date, session_id, name, status, engagement, remarks, posture) = row;
        Self {
            date,
            session_id,
            name,
            status,
            engagement,
            remarks,
            posture,
        }
    }
}

impl SheetRow {
    pub fn session_id(&self) -> &SessionId {
        &self.1
    }
}

impl Sheet {
    pub fn new(session: &Session) -> Self {
        Self {
            title: SHEET_TITLE.to_string(),
            session_id: session.id.clone(),
            created_at: session.created_at,
            columns: COLUMNS.iter().map(|column| column.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, record: AttendanceRecord) {
        self.rows.push(record.into());
    }

    /// Records filed under `session_id`, in append order.
    pub fn records_for(self, session_id: &SessionId) -> Vec<AttendanceRecord> {
        self.rows
            .into_iter()
            .filter(|row| row.session_id() == session_id)
            .map(AttendanceRecord::from)
            .collect()
    }

    pub fn from_slice(path: &Path, bytes: &[u8]) -> Result<Self> {
        let sheet: Sheet = serde_json::from_slice(bytes).map_err(|e| StorageError::Corrupted {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if sheet.columns.iter().map(String::as_str).ne(COLUMNS.iter().copied()) {
            return Err(StorageError::Corrupted {
                path: path.to_path_buf(),
                reason: format!("unexpected header {:?}", sheet.columns),
            });
        }

        Ok(sheet)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| StorageError::InvalidFormat(e.to_string()))
    }
}

/// Reads the sheet at `path`; a missing file is `Ok(None)`.
pub fn read_sheet(path: &Path) -> Result<Option<Sheet>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    Sheet::from_slice(path, &bytes).map(Some)
}

/// Replaces the sheet at `path` through a synced temporary sibling so a crash
/// mid-write never leaves a truncated sheet behind.
pub fn write_sheet(path: &Path, sheet: &Sheet) -> Result<()> {
    let bytes = sheet.to_bytes()?;
    let temp_path = temp_path_for(path);

    let written = (|| -> std::io::Result<()> {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&bytes)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    })();

    if let Err(e) = written.and_then(|_| fs::rename(&temp_path, path)) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

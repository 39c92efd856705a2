// src/storage/ledger.rs
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{error, info, warn};

use super::{
    errors::{Result, StorageError},
    sheet::{read_sheet, write_sheet, Sheet},
    types::{AttendanceRecord, Session, SessionId},
};
use crate::utils::config::Config;

const RECOVERY_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";

/// Append-only attendance storage partitioned by session.
///
/// Implementations are not internally synchronized; share them through
/// [`SharedLedger`] so appends and resets never interleave.
pub trait RecordStore: Send {
    fn current_session(&self) -> &Session;

    /// Files `record` under the current session. An unreadable store is set
    /// aside and replaced before the record is written.
    fn append(&mut self, record: AttendanceRecord) -> Result<()>;

    /// Records of `session_id` (the current session when `None`) in append order.
    fn query(&self, session_id: Option<&SessionId>) -> Result<Vec<AttendanceRecord>>;

    /// Archives the current session and starts a new, empty one.
    fn reset(&mut self) -> Result<SessionId>;

    /// Serialized form of the live store, for download.
    fn export(&self) -> Result<Vec<u8>>;
}

pub type SharedLedger = Arc<Mutex<dyn RecordStore>>;

/// Flat-file ledger: one live sheet plus one archived sheet per finished session.
#[derive(Debug)]
pub struct SheetLedger {
    path: PathBuf,
    archive_dir: PathBuf,
    session: Session,
}

impl SheetLedger {
    /// Opens the ledger at `path` and starts a new session. A sheet left over
    /// from an earlier run is archived under its own session first; an
    /// unreadable one is backed up.
    pub fn open(path: impl Into<PathBuf>, archive_dir: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let archive_dir = archive_dir.into();

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::create_dir_all(&archive_dir)?;

        let ledger = Self {
            path,
            archive_dir,
            session: Session::start(),
        };

        match read_sheet(&ledger.path) {
            Ok(Some(previous)) if !previous.rows.is_empty() => {
                let archived = ledger.archive_sheet_file(&previous.session_id)?;
                info!(
                    "Archived {} records from session {} to {}",
                    previous.rows.len(),
                    previous.session_id,
                    archived.display()
                );
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Ledger at {} is unreadable: {}", ledger.path.display(), e);
                ledger.backup_unreadable()?;
            }
        }

        write_sheet(&ledger.path, &Sheet::new(&ledger.session))?;
        info!(
            "Attendance ledger ready at {} (session {})",
            ledger.path.display(),
            ledger.session.id
        );

        Ok(ledger)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::open(config.ledger_path(), config.archive_dir())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn archive_path(&self, session_id: &SessionId) -> PathBuf {
        self.archive_dir
            .join(format!("{}_{}.json", self.file_stem(), session_id))
    }

    fn file_stem(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attendance".to_string())
    }

    /// Copies the live sheet to the archive of `session_id`. The live file stays
    /// in place until the caller replaces it.
    fn archive_sheet_file(&self, session_id: &SessionId) -> Result<PathBuf> {
        let target = self.archive_path(session_id);
        fs::copy(&self.path, &target)?;
        Ok(target)
    }

    /// Moves the live sheet aside under a recovery-stamped name, keeping its bytes.
    fn backup_unreadable(&self) -> Result<PathBuf> {
        let stamp = Utc::now().format(RECOVERY_STAMP_FORMAT).to_string();
        let stem = self.file_stem();

        let mut backup = self.path.with_file_name(format!("{}.corrupted_{}.json", stem, stamp));
        let mut attempt = 1;
        while backup.exists() {
            backup = self
                .path
                .with_file_name(format!("{}.corrupted_{}_{}.json", stem, stamp, attempt));
            attempt += 1;
        }

        fs::rename(&self.path, &backup)?;
        warn!(
            "Backed up unreadable ledger {} to {}",
            self.path.display(),
            backup.display()
        );
        Ok(backup)
    }

    /// Loads the live sheet for writing, replacing it with an empty one when it
    /// is missing or cannot be read.
    fn load_for_append(&self) -> Result<Sheet> {
        match read_sheet(&self.path) {
            Ok(Some(sheet)) => Ok(sheet),
            Ok(None) => Ok(Sheet::new(&self.session)),
            Err(e) => {
                warn!("Recovering ledger {}: {}", self.path.display(), e);
                self.backup_unreadable()?;
                Ok(Sheet::new(&self.session))
            }
        }
    }

    fn read_for_query(&self, path: &Path) -> Result<Option<Sheet>> {
        match read_sheet(path) {
            Err(StorageError::Corrupted { path, reason }) => {
                warn!(
                    "Ignoring unreadable sheet {} on read: {}",
                    path.display(),
                    reason
                );
                Ok(None)
            }
            other => other,
        }
    }
}

impl RecordStore for SheetLedger {
    fn current_session(&self) -> &Session {
        &self.session
    }

    fn append(&mut self, record: AttendanceRecord) -> Result<()> {
        if record.session_id != self.session.id {
            return Err(StorageError::SessionMismatch {
                expected: self.session.id.clone(),
                found: record.session_id,
            });
        }

        let mut sheet = self.load_for_append()?;
        let name = record.name.clone();
        sheet.push(record);

        write_sheet(&self.path, &sheet).map_err(|e| {
            error!("Failed to save attendance for {}: {}", name, e);
            e
        })?;

        info!(
            "Recorded {} in session {} ({} records)",
            name,
            self.session.id,
            sheet.rows.len()
        );
        Ok(())
    }

    fn query(&self, session_id: Option<&SessionId>) -> Result<Vec<AttendanceRecord>> {
        let target = session_id.unwrap_or(&self.session.id);

        let sheet = if *target == self.session.id {
            self.read_for_query(&self.path)?
        } else {
            self.read_for_query(&self.archive_path(target))?
        };

        Ok(sheet
            .map(|sheet| sheet.records_for(target))
            .unwrap_or_default())
    }

    fn reset(&mut self) -> Result<SessionId> {
        let previous = self.session.id.clone();

        match self.archive_sheet_file(&previous) {
            Ok(archived) => info!("Archived session {} to {}", previous, archived.display()),
            Err(StorageError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                info!("No ledger for session {}; nothing to archive", previous)
            }
            Err(e) => return Err(e),
        }

        let next = Session::start();
        write_sheet(&self.path, &Sheet::new(&next))?;
        self.session = next;

        info!("Started session {} (previous: {})", self.session.id, previous);
        Ok(self.session.id.clone())
    }

    fn export(&self) -> Result<Vec<u8>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let sheet = Sheet::new(&self.session);
                write_sheet(&self.path, &sheet)?;
                sheet.to_bytes()
            }
            Err(e) => Err(e.into()),
        }
    }
}

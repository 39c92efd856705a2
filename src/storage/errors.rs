// src/storage/errors.rs
use std::path::PathBuf;

use thiserror::Error;

use super::types::SessionId;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Corrupted store {}: {reason}", .path.display())]
    Corrupted { path: PathBuf, reason: String },

    #[error("Record belongs to session {found}, current session is {expected}")]
    SessionMismatch { expected: SessionId, found: SessionId },
}

pub type Result<T> = std::result::Result<T, StorageError>;

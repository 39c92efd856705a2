use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::{info, warn};

use super::types::{KnownIdentity, UNKNOWN_IDENTITY};
use crate::{
    core::providers::{FaceEmbedder, Frame},
    utils::error::{MonitorError, Result},
};

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// The enrolled identities, in a fixed order. Read-only once loaded.
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    identities: Vec<KnownIdentity>,
}

impl Gallery {
    pub fn new(identities: Vec<KnownIdentity>) -> Self {
        Self { identities }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Enrolls one identity per reference photo in `dir`, named after the file
    /// stem. Photos are visited in file-name order; unreadable photos, photos
    /// without a face and photos named after the unknown label are skipped.
    pub async fn load(dir: &Path, embedder: &dyn FaceEmbedder) -> Result<Self> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Gallery directory {} does not exist; no identities enrolled", dir.display());
                return Ok(Self::empty());
            }
            Err(e) => {
                return Err(MonitorError::Identity(format!(
                    "Failed to read gallery directory {}: {}",
                    dir.display(),
                    e
                )))
            }
        };

        let mut photos: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.is_file() && is_reference_photo(path))
            .collect();
        photos.sort();

        let mut identities = Vec::with_capacity(photos.len());
        for path in photos {
            match enroll(&path, embedder).await {
                Ok(Some(identity)) => identities.push(identity),
                Ok(None) => warn!("No face found in {}; skipping", path.display()),
                Err(e) => warn!("Error processing {}: {}", path.display(), e),
            }
        }

        info!("Loaded {} known identities from {}", identities.len(), dir.display());
        Ok(Self::new(identities))
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KnownIdentity> {
        self.identities.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.identities.iter().map(|identity| identity.name.as_str()).collect()
    }
}

fn is_reference_photo(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

async fn enroll(path: &Path, embedder: &dyn FaceEmbedder) -> Result<Option<KnownIdentity>> {
    let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
        return Err(MonitorError::Identity(
            "File name is not valid UTF-8".to_string(),
        ));
    };
    if name == UNKNOWN_IDENTITY {
        return Err(MonitorError::Identity(format!(
            "'{}' is reserved for unmatched faces",
            UNKNOWN_IDENTITY
        )));
    }

    let bytes = fs::read(path)
        .map_err(|e| MonitorError::Identity(format!("Failed to read photo: {}", e)))?;
    let frame = Frame::decode(bytes)?;

    let faces = embedder.face_embeddings(&frame).await?;
    Ok(faces
        .into_iter()
        .next()
        .map(|face| KnownIdentity::new(name, face.embedding)))
}

//! Session persistence for Flagdeck.
//!
//! Overrides live for one session. Between CLI invocations the session is
//! carried in a KDL file under the user's data directory:
//!
//! `~/.local/share/flagdeck/<project-hash>/session.kdl`
//!
//! `FLAGDECK_DATA_DIR` replaces `~/.local/share/flagdeck`. Ending a session
//! deletes the file; nothing here outlives it.

pub mod schema;

pub use schema::SessionSnapshot;

use crate::{Error, Result};
use kdl::KdlDocument;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "FLAGDECK_DATA_DIR";

/// File name of the session file inside a project's storage directory.
pub const SESSION_FILE: &str = "session.kdl";

/// Session file for a single project.
#[derive(Debug, Clone)]
pub struct SessionFile {
    /// Storage directory for this project
    pub root: PathBuf,
}

impl SessionFile {
    /// Session file for a project, honoring `FLAGDECK_DATA_DIR`.
    pub fn for_project(project_root: &Path) -> Result<Self> {
        Self::with_data_dir(project_root, &get_data_dir()?)
    }

    /// Session file for a project under an explicit data directory.
    pub fn with_data_dir(project_root: &Path, data_dir: &Path) -> Result<Self> {
        Ok(Self {
            root: data_dir.join(project_hash(project_root)?),
        })
    }

    /// Path of the session file.
    pub fn path(&self) -> PathBuf {
        self.root.join(SESSION_FILE)
    }

    /// Whether a session is active.
    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    /// Load the active session, or `None` if no session has started.
    pub fn load(&self) -> Result<Option<SessionSnapshot>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let doc: KdlDocument = content.parse()?;
        Ok(Some(SessionSnapshot::from_kdl(&doc)))
    }

    /// Write the session, creating the storage directory if needed.
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let path = self.path();
        fs::write(&path, snapshot.to_kdl().to_string())?;
        tracing::debug!(path = %path.display(), overrides = snapshot.overrides.len(), "session saved");
        Ok(())
    }

    /// End the session. Returns `true` if a session file was removed.
    pub fn end(&self) -> Result<bool> {
        let path = self.path();
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        tracing::debug!(path = %path.display(), "session ended");
        Ok(true)
    }
}

/// Base data directory: `FLAGDECK_DATA_DIR`, else `<data dir>/flagdeck`.
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;
    Ok(data_dir.join("flagdeck"))
}

/// Short hash naming a project's storage directory.
///
/// Uses the canonical project path so any spelling of the same directory maps
/// to the same session.
pub fn project_hash(project_root: &Path) -> Result<String> {
    let canonical = project_root
        .canonicalize()
        .map_err(|e| Error::Other(format!("Could not canonicalize project path: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(canonical.to_string_lossy().as_bytes());
    let hash = hasher.finalize();
    let hash_hex = format!("{:x}", hash);
    Ok(hash_hex[..12].to_string())
}

//! File-backed token persistence

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use pulseboard_core::{DashboardError, TokenStorage};

/// Keeps the session token in a single file across runs
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The token file is readable by its owner only
    fn write_private(&self, token: &str) -> std::io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        // mode only applies on creation
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(token.as_bytes())
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Failed to read token file {:?}: {}", self.path, e);
                None
            }
        }
    }

    fn store(&self, token: &str) -> pulseboard_core::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DashboardError::Storage(format!("Creating {:?}: {}", parent, e))
            })?;
        }
        self.write_private(token)
            .map_err(|e| DashboardError::Storage(format!("Writing {:?}: {}", self.path, e)))
    }

    fn clear(&self) -> pulseboard_core::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DashboardError::Storage(format!(
                "Removing {:?}: {}",
                self.path, e
            ))),
        }
    }
}

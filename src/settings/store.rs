use super::document::SettingsDocument;
use crate::fs::FileSystem;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings from {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("Failed to write settings to {}: {message}", path.display())]
    Write { path: PathBuf, message: String },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Loads and saves one settings file.
///
/// Each run reads the file once and writes it once. There is no locking, so
/// when two runs overlap the last write wins.
pub struct SettingsStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file loads as an empty document and unparsable content as
    /// a malformed one. Only I/O failures are errors.
    pub fn load(&self) -> Result<SettingsDocument, SettingsError> {
        if !self.fs.exists(&self.path) {
            debug!("No settings at {}, starting fresh", self.path.display());
            return Ok(SettingsDocument::new());
        }

        if !self.fs.is_file(&self.path) {
            return Err(SettingsError::Read {
                path: self.path.clone(),
                message: "not a regular file".to_string(),
            });
        }

        let bytes = self
            .fs
            .read(&self.path)
            .map_err(|e| SettingsError::Read {
                path: self.path.clone(),
                message: format!("{:#}", e),
            })?;

        debug!("Loaded settings from {}", self.path.display());
        Ok(SettingsDocument::parse_bytes(&bytes))
    }

    /// Writes `doc`, creating the parent directory first.
    pub fn save(&self, doc: &SettingsDocument) -> Result<(), SettingsError> {
        let text = doc.to_json_pretty()?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                self.fs
                    .create_dir_all(parent)
                    .map_err(|e| self.write_error(e))?;
            }
        }

        self.fs
            .write(&self.path, &text)
            .map_err(|e| self.write_error(e))?;

        info!("Permissions written to {}", self.path.display());
        Ok(())
    }

    fn write_error(&self, e: anyhow::Error) -> SettingsError {
        SettingsError::Write {
            path: self.path.clone(),
            message: format!("{:#}", e),
        }
    }
}

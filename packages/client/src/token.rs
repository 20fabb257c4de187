use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::ClientError;

const APP_DIR: &str = "terrains";
const TOKEN_FILE: &str = "token";

/// Bearer token persisted on disk between CLI invocations.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/terrains/token`, falling back to the working directory
    /// when the platform has no config dir.
    pub fn default_location() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join(APP_DIR).join(TOKEN_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored token, or `None` if none was saved or it is blank.
    pub fn load(&self) -> Result<Option<String>, ClientError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, token: &str) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

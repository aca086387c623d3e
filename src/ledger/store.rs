use std::path::{Path, PathBuf};

use thiserror::Error;

use super::Ledger;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON file holding the ledger's flat name -> record mapping.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the ledger; a missing file is an empty ledger.
    pub fn load(&self) -> Result<Ledger, StoreError> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "no saved ledger, starting empty");
            return Ok(Ledger::new());
        }

        let raw = std::fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let ledger: Ledger = serde_json::from_str(&raw)?;
        tracing::info!(path = %self.path.display(), points = ledger.len(), "ledger loaded");
        Ok(ledger)
    }

    pub fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(ledger)?;
        std::fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(path = %self.path.display(), points = ledger.len(), "ledger saved");
        Ok(())
    }
}

//! JSON document store for the agenda.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::data_dir;
use crate::agenda::Agenda;
use crate::error::Result;

/// Reads and writes the agenda document at a fixed path.
#[derive(Debug, Clone)]
pub struct AgendaStore {
    path: PathBuf,
}

impl AgendaStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<data dir>/agenda.json`.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(data_dir()?.join("agenda.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the agenda. A missing file is an empty agenda.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid
    /// agenda document.
    pub fn load(&self) -> Result<Agenda> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let agenda = Agenda::from_json(&content)?;
                debug!(path = %self.path.display(), items = agenda.len(), "agenda loaded");
                Ok(agenda)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no agenda file, starting empty");
                Ok(Agenda::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Write the agenda as pretty-printed JSON, creating parent
    /// directories as needed.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, agenda: &Agenda) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, agenda.to_json_pretty()?)?;
        debug!(path = %self.path.display(), items = agenda.len(), "agenda saved");
        Ok(())
    }
}

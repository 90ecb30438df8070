use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::reminder::ReminderData;

/// TOML file holding every user's reminders
pub struct Storage {
    file_path: PathBuf,
}

impl Storage {
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Load the collection; a missing or empty file is an empty collection
    pub fn load(&self) -> Result<ReminderData> {
        if !self.file_path.exists() {
            return Ok(ReminderData::new());
        }

        let content = fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))?;
        if content.trim().is_empty() {
            return Ok(ReminderData::new());
        }

        let data: ReminderData = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.file_path.display()))?;
        Ok(data)
    }

    pub fn save(&self, data: &ReminderData) -> Result<()> {
        let content = toml::to_string_pretty(data).context("Failed to serialize reminders")?;
        fs::write(&self.file_path, content)
            .with_context(|| format!("Failed to write {}", self.file_path.display()))?;
        Ok(())
    }
}

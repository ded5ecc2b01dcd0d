use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::prefs::Settings;

/// Owns the persisted settings blob. Readers get an immutable snapshot;
/// writers go through `update`, which persists before swapping the new
/// value in.
pub struct SettingsStore {
    path: PathBuf,
    current: Settings,
}

impl SettingsStore {
    /// Load the blob at `path`, merged over defaults. A missing file is a
    /// first run; an unreadable or corrupt one is logged and replaced by
    /// defaults on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = match std::fs::read_to_string(&path) {
            Ok(content) => match Self::parse(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("[Settings] Ignoring corrupt {:?}: {:#}", path, e);
                    Settings::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
            Err(e) => {
                log::warn!("[Settings] Could not read {:?}: {}", path, e);
                Settings::default()
            }
        };
        Self { path, current }
    }

    /// Every key missing from `content` takes its default; present keys win.
    pub fn parse(content: &str) -> Result<Settings> {
        serde_json::from_str(content).context("Parsing settings blob")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> &Settings {
        &self.current
    }

    pub fn update<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Settings),
    {
        let mut next = self.current.clone();
        f(&mut next);
        if next == self.current {
            return Ok(());
        }
        self.write(&next)?;
        self.current = next;
        Ok(())
    }

    pub fn reset(&mut self) -> Result<()> {
        let defaults = Settings::default();
        self.write(&defaults)?;
        self.current = defaults;
        Ok(())
    }

    fn write(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(settings).context("Serializing settings")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Writing {:?}", self.path))?;
        Ok(())
    }
}

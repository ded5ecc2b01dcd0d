use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_city() -> String {
    "Sheffield".to_string()
}
fn default_country() -> String {
    "UK".to_string()
}
fn default_base_url() -> String {
    "https://api.aladhan.com/v1".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_volume() -> f32 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default = "default_country")]
    pub country: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            city: default_city(),
            country: default_country(),
        }
    }
}

impl LocationConfig {
    pub fn label(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// Arm automatic adhan playback at startup without pressing `a`.
    #[serde(default)]
    pub auto_arm: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            auto_arm: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub audio: AudioConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "waqt").context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn settings_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("settings.json"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(&path).with_context(|| format!("Reading {:?}", path))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Parsing config.toml")
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(&path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.location.city, "Sheffield");
        assert_eq!(config.api.base_url, "https://api.aladhan.com/v1");
        assert!(!config.audio.auto_arm);
    }

    #[test]
    fn partial_sections_fill_missing_keys() {
        let config = AppConfig::from_toml(
            r#"
            [location]
            city = "Bradford"

            [audio]
            auto_arm = true
            "#,
        )
        .unwrap();
        assert_eq!(config.location.city, "Bradford");
        assert_eq!(config.location.country, "UK");
        assert!(config.audio.auto_arm);
        assert_eq!(config.audio.volume, 1.0);
        assert_eq!(config.api.timeout_secs, 10);
    }
}

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "frame-gallery";
const CONFIG_FILE_NAME: &str = "config.json";
const CROP_FILE_NAME: &str = "crop-config.json";

/// Paths remembered between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub last_used_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery_path: Option<PathBuf>,
}

/// Application-private directory holding the config and crop documents.
///
/// The two documents have independent lifecycles: saving one never touches
/// the other.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn default_location() -> Self {
        let dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME);
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    pub fn crop_path(&self) -> PathBuf {
        self.dir.join(CROP_FILE_NAME)
    }

    /// Missing or unreadable documents load as `None`.
    pub fn load_config(&self) -> Option<AppConfig> {
        let config_path = self.config_path();
        let value = read_json(&config_path)?;
        match serde_json::from_value::<AppConfig>(value) {
            Ok(config) => {
                log::info!(
                    "Loaded config from {} (gallery: {:?})",
                    config_path.display(),
                    config.gallery_path
                );
                Some(config)
            }
            Err(e) => {
                log::warn!("Config file {} has issues ({}), ignoring it", config_path.display(), e);
                None
            }
        }
    }

    pub fn save_config(&self, config: &AppConfig) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(config)?;
        self.write_document(&self.config_path(), &content)?;
        log::debug!("Config saved with gallery path {:?}", config.gallery_path);
        Ok(())
    }

    /// The crop rectangle is opaque here; it is stored and returned verbatim.
    pub fn load_crop_area(&self) -> Option<serde_json::Value> {
        read_json(&self.crop_path())
    }

    pub fn save_crop_area(&self, crop_area: &serde_json::Value) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(crop_area)?;
        self.write_document(&self.crop_path(), &content)
    }

    fn write_document(&self, path: &Path, content: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| anyhow::anyhow!("Failed to create config directory {}: {}", self.dir.display(), e))?;
        std::fs::write(path, content)
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?;
        Ok(())
    }
}

fn read_json(path: &Path) -> Option<serde_json::Value> {
    if !path.exists() {
        return None;
    }
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            log::error!("Failed to read {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("Failed to parse {}: {}", path.display(), e);
            None
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ipc::{encode_error, map_read_error, map_write_error, ApiError};
use crate::paths;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Json,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default = "paths::default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_namespace")]
    pub namespace: String, // prefix of the persisted keys, e.g. "lm.links"
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: paths::default_data_dir(),
            backend: StorageBackend::default(),
            namespace: default_namespace(),
            log_level: default_log_level(),
        }
    }
}

fn default_namespace() -> String {
    "lm".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    pub fn snapshot_path(&self) -> PathBuf {
        paths::snapshot_path(&self.data_dir, self.backend)
    }
}

/// Missing file means defaults; a file that exists but does not parse is
/// reported.
pub fn load_config(path: &Path) -> Result<AppConfig, ApiError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let content = fs::read_to_string(path).map_err(map_read_error)?;
    serde_json::from_str(&content).map_err(|err| ApiError {
        code: "DecodeFailed".to_string(),
        message: format!("Failed to decode {}", paths::CONFIG_FILENAME),
        details: Some(serde_json::json!({
            "path": path.to_string_lossy().to_string(),
            "error": err.to_string()
        })),
    })
}

pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), ApiError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|err| map_write_error("Failed to create config directory", err))?;
    }
    let data = serde_json::to_string_pretty(config)
        .map_err(|err| encode_error("Failed to encode config", err))?;
    fs::write(path, data).map_err(|err| map_write_error("Failed to write config", err))?;
    Ok(())
}

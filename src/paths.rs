use std::path::{Path, PathBuf};

use crate::config::StorageBackend;
use crate::repo::json_repo::SNAPSHOT_FILENAME;
use crate::repo::sqlite_repo::DB_FILENAME;

pub const DATA_DIR_ENV: &str = "LINK_MANAGER_DATA_DIR";
pub const CONFIG_ENV: &str = "LINK_MANAGER_CONFIG";
pub const DEFAULT_DATA_DIR: &str = ".link-manager";
pub const CONFIG_FILENAME: &str = "link-manager.json";

pub fn default_data_dir() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| default_data_dir().join(CONFIG_FILENAME))
}

pub fn snapshot_path(data_dir: &Path, backend: StorageBackend) -> PathBuf {
    match backend {
        StorageBackend::Sqlite => data_dir.join(DB_FILENAME),
        StorageBackend::Json => data_dir.join(SNAPSHOT_FILENAME),
    }
}

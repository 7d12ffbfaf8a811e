use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::bookmarks::Snapshot;
use crate::ipc::{encode_error, map_read_error, map_write_error, write_error_with_context, ApiError};
use crate::repo::snapshot_repo::SnapshotRepo;

pub const SNAPSHOT_FILENAME: &str = "bookmarks.json";

/// Stores the snapshot as one combined JSON record. Writes go to a temp file
/// in the same directory first and are renamed over the target.
pub struct JsonFileSnapshotRepo {
    path: PathBuf,
}

impl JsonFileSnapshotRepo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_snapshot(&self) -> Result<Option<Snapshot>, ApiError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(map_read_error(err)),
        };
        serde_json::from_str(&content).map(Some).map_err(|err| ApiError {
            code: "DecodeFailed".to_string(),
            message: "Failed to decode snapshot file".to_string(),
            details: Some(serde_json::json!({ "error": err.to_string() })),
        })
    }
}

impl SnapshotRepo for JsonFileSnapshotRepo {
    fn load(&self) -> Snapshot {
        match self.read_snapshot() {
            Ok(snapshot) => snapshot.unwrap_or_default(),
            Err(err) => {
                log::warn!(
                    "Falling back to empty snapshot: path={}, error_code={}, error_message={}",
                    self.path.display(),
                    err.code,
                    err.message
                );
                Snapshot::default()
            }
        }
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), ApiError> {
        let parent = self.path.parent().ok_or_else(|| ApiError {
            code: "WriteFailed".to_string(),
            message: "Invalid snapshot path".to_string(),
            details: None,
        })?;
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|err| map_write_error("Failed to create data directory", err))?;
        }

        let data = serde_json::to_string_pretty(snapshot)
            .map_err(|err| encode_error("Failed to encode snapshot", err))?;

        let temp_name = format!(
            ".tmp-{}-{}",
            std::process::id(),
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );
        let temp_path = parent.join(temp_name);

        if let Err(err) = fs::write(&temp_path, data) {
            return Err(write_error_with_context(
                "Failed to write temp file",
                err,
                "temp_write",
                &temp_path,
            ));
        }

        if let Err(err) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(write_error_with_context(
                "Failed to replace snapshot file",
                err,
                "replace",
                &self.path,
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bookmarks::{Category, CategoryId, Selection};

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileSnapshotRepo::new(dir.path().join(SNAPSHOT_FILENAME));
        assert_eq!(repo.load(), Snapshot::default());
    }

    #[test]
    fn malformed_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SNAPSHOT_FILENAME);
        fs::write(&path, "{\"categories\": 7}").unwrap();
        assert_eq!(JsonFileSnapshotRepo::new(path).load(), Snapshot::default());
    }

    #[test]
    fn save_replaces_file_and_leaves_no_temp_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SNAPSHOT_FILENAME);
        let mut repo = JsonFileSnapshotRepo::new(&path);
        let snapshot = Snapshot {
            categories: vec![Category {
                id: CategoryId::new("c1"),
                name: "Dev".to_string(),
            }],
            links: vec![],
            selected_category_id: Selection::from("c1"),
        };
        repo.save(&Snapshot::default()).unwrap();
        repo.save(&snapshot).unwrap();
        assert_eq!(repo.load(), snapshot);

        let entries: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(entries, vec![SNAPSHOT_FILENAME.to_string()]);
    }

    #[test]
    fn file_uses_camel_case_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SNAPSHOT_FILENAME);
        let mut repo = JsonFileSnapshotRepo::new(&path);
        repo.save(&Snapshot::default()).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"selectedCategoryId\": \"all\""));
    }
}

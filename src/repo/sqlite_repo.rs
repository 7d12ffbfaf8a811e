use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::domain::bookmarks::{Selection, Snapshot};
use crate::ipc::{encode_error, ApiError};
use crate::repo::snapshot_repo::SnapshotRepo;

pub const DB_FILENAME: &str = "link-manager.db";

/// Keys of the three persisted entries under an application namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub categories: String,
    pub links: String,
    pub selected_category_id: String,
}

impl StorageKeys {
    pub fn new(namespace: &str) -> Self {
        Self {
            categories: format!("{namespace}.categories"),
            links: format!("{namespace}.links"),
            selected_category_id: format!("{namespace}.selectedCategoryId"),
        }
    }
}

// Key-value snapshot storage backed by SQLite
pub struct SqliteSnapshotRepo {
    conn: Connection,
    keys: StorageKeys,
}

impl SqliteSnapshotRepo {
    // Open (or create) the database file
    pub fn new(db_path: &Path, namespace: &str) -> Result<Self, ApiError> {
        let conn = Connection::open(db_path).map_err(|e| ApiError {
            code: "DatabaseError".to_string(),
            message: format!("Failed to open database: {}", e),
            details: Some(serde_json::json!({ "path": db_path.to_string_lossy().to_string() })),
        })?;
        Self::with_connection(conn, namespace)
    }

    pub fn open_in_memory(namespace: &str) -> Result<Self, ApiError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, namespace)
    }

    fn with_connection(conn: Connection, namespace: &str) -> Result<Self, ApiError> {
        let repo = Self {
            conn,
            keys: StorageKeys::new(namespace),
        };
        repo.init()?;
        Ok(repo)
    }

    fn init(&self) -> Result<(), ApiError> {
        self.conn
            .execute(
                r#"CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )"#,
                [],
            )
            .map_err(|e| ApiError {
                code: "DatabaseError".to_string(),
                message: format!("Failed to create kv_store table: {}", e),
                details: None,
            })?;
        Ok(())
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Raw stored text for one key.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, ApiError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Overwrites one key outside of a snapshot save.
    pub fn put_raw(&self, key: &str, value: &str) -> Result<(), ApiError> {
        upsert(&self.conn, key, value, &Utc::now().to_rfc3339())?;
        Ok(())
    }

    fn read_entry<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ApiError> {
        let Some(raw) = self.get_raw(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw).map(Some).map_err(|err| ApiError {
            code: "DecodeFailed".to_string(),
            message: format!("Failed to decode {}", key),
            details: Some(serde_json::json!({ "error": err.to_string() })),
        })
    }

    fn read_snapshot(&self) -> Result<Snapshot, ApiError> {
        let categories = self.read_entry(&self.keys.categories)?.unwrap_or_default();
        let links = self.read_entry(&self.keys.links)?.unwrap_or_default();
        let selected_category_id = self
            .read_entry::<Selection>(&self.keys.selected_category_id)?
            .unwrap_or_default();
        Ok(Snapshot {
            categories,
            links,
            selected_category_id,
        })
    }
}

fn upsert(conn: &Connection, key: &str, value: &str, updated_at: &str) -> rusqlite::Result<usize> {
    conn.execute(
        r#"INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        params![key, value, updated_at],
    )
}

impl SnapshotRepo for SqliteSnapshotRepo {
    fn load(&self) -> Snapshot {
        match self.read_snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                log::warn!(
                    "Falling back to empty snapshot: error_code={}, error_message={}",
                    err.code,
                    err.message
                );
                Snapshot::default()
            }
        }
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), ApiError> {
        let categories = serde_json::to_string(&snapshot.categories)
            .map_err(|err| encode_error("Failed to encode categories", err))?;
        let links = serde_json::to_string(&snapshot.links)
            .map_err(|err| encode_error("Failed to encode links", err))?;
        let selected = serde_json::to_string(&snapshot.selected_category_id)
            .map_err(|err| encode_error("Failed to encode selection", err))?;

        let updated_at = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        upsert(&tx, &self.keys.categories, &categories, &updated_at)?;
        upsert(&tx, &self.keys.links, &links, &updated_at)?;
        upsert(&tx, &self.keys.selected_category_id, &selected, &updated_at)?;
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bookmarks::{Category, CategoryId, Link, LinkId};

    fn sample() -> Snapshot {
        Snapshot {
            categories: vec![
                Category {
                    id: CategoryId::new("c1"),
                    name: "Dev".to_string(),
                },
                Category {
                    id: CategoryId::new("c2"),
                    name: "News".to_string(),
                },
            ],
            links: vec![Link {
                id: LinkId::new("l1"),
                category_id: CategoryId::new("c2"),
                name: "HN".to_string(),
                url: "https://news.ycombinator.com/".to_string(),
                desc: "Tech news".to_string(),
                created_at: 1_700_000_000_000,
            }],
            selected_category_id: Selection::from("c2"),
        }
    }

    #[test]
    fn empty_database_loads_default_snapshot() {
        let repo = SqliteSnapshotRepo::open_in_memory("lm").unwrap();
        assert_eq!(repo.load(), Snapshot::default());
    }

    #[test]
    fn round_trips_through_three_keyed_entries() {
        let mut repo = SqliteSnapshotRepo::open_in_memory("lm").unwrap();
        repo.save(&sample()).unwrap();
        assert_eq!(repo.load(), sample());
        assert_eq!(repo.get_raw("lm.selectedCategoryId").unwrap().as_deref(), Some("\"c2\""));
        assert!(repo.get_raw("lm.links").unwrap().unwrap().contains("\"categoryId\":\"c2\""));
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let mut repo = SqliteSnapshotRepo::open_in_memory("lm").unwrap();
        repo.save(&sample()).unwrap();
        repo.save(&Snapshot::default()).unwrap();
        assert_eq!(repo.load(), Snapshot::default());
    }

    #[test]
    fn corrupt_entry_loads_as_empty() {
        let mut repo = SqliteSnapshotRepo::open_in_memory("lm").unwrap();
        repo.save(&sample()).unwrap();
        repo.put_raw("lm.links", "[{broken").unwrap();
        assert_eq!(repo.load(), Snapshot::default());
    }

    #[test]
    fn namespaces_do_not_see_each_other() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DB_FILENAME);
        let mut first = SqliteSnapshotRepo::new(&path, "lm").unwrap();
        first.save(&sample()).unwrap();
        let other = SqliteSnapshotRepo::new(&path, "other").unwrap();
        assert_eq!(other.load(), Snapshot::default());
        let reopened = SqliteSnapshotRepo::new(&path, "lm").unwrap();
        assert_eq!(reopened.load(), sample());
    }
}

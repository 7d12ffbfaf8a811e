pub mod json_repo;
pub mod snapshot_repo;
pub mod sqlite_repo;

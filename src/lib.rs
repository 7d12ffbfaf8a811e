pub mod bootstrap;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod ipc;
pub mod paths;
pub mod repo;
pub mod services;
pub mod state;
pub mod view;

pub use commands::controller::{BookmarkController, Outcome};
pub use commands::prompt::{Prompt, PromptBusy, PromptGate};
pub use domain::bookmarks::{
    normalize_url, Category, CategoryId, Link, LinkDraft, LinkId, Selection, Snapshot,
    ALL_CATEGORIES,
};
pub use domain::clock::{Clock, FixedClock, SystemClock};
pub use domain::ids::{IdGenerator, SequentialIds, UuidGenerator};
pub use error::StoreError;
pub use repo::json_repo::JsonFileSnapshotRepo;
pub use repo::snapshot_repo::{MemorySnapshotRepo, SnapshotRepo};
pub use repo::sqlite_repo::SqliteSnapshotRepo;
pub use services::bookmark_store::{BookmarkStore, CategoryRemoval};
pub use view::page::{render_page, PageView, ViewSink};

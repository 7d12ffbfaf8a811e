use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Context};
use tracing::Level;

use crate::config::{load_config, save_config, AppConfig, StorageBackend};
use crate::domain::clock::SystemClock;
use crate::domain::ids::UuidGenerator;
use crate::paths;
use crate::repo::json_repo::JsonFileSnapshotRepo;
use crate::repo::snapshot_repo::SnapshotRepo;
use crate::repo::sqlite_repo::SqliteSnapshotRepo;
use crate::services::bookmark_store::BookmarkStore;

pub type AppStore = BookmarkStore<Box<dyn SnapshotRepo + Send>, UuidGenerator, SystemClock>;

/// Installs the fmt subscriber and routes `log` records into it.
pub fn init_tracing(level: &str) -> anyhow::Result<()> {
    let level = Level::from_str(level).unwrap_or(Level::INFO);
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;
    tracing_log::LogTracer::init_with_filter(log_filter(level))
        .map_err(|err| anyhow!("failed to bridge log records: {err}"))?;
    Ok(())
}

fn log_filter(level: Level) -> log::LevelFilter {
    match level {
        Level::TRACE => log::LevelFilter::Trace,
        Level::DEBUG => log::LevelFilter::Debug,
        Level::INFO => log::LevelFilter::Info,
        Level::WARN => log::LevelFilter::Warn,
        Level::ERROR => log::LevelFilter::Error,
    }
}

pub fn open_repo(config: &AppConfig) -> anyhow::Result<Box<dyn SnapshotRepo + Send>> {
    fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("failed to create data dir {}", config.data_dir.display()))?;
    let path = config.snapshot_path();
    let repo: Box<dyn SnapshotRepo + Send> = match config.backend {
        StorageBackend::Sqlite => Box::new(SqliteSnapshotRepo::new(&path, &config.namespace)?),
        StorageBackend::Json => Box::new(JsonFileSnapshotRepo::new(path)),
    };
    Ok(repo)
}

/// Opens the store described by `config`, seeding it on first run.
pub fn open_store(config: &AppConfig) -> anyhow::Result<AppStore> {
    let repo = open_repo(config)?;
    let store = BookmarkStore::open(repo, UuidGenerator, SystemClock)?;
    Ok(store)
}

/// Loads the config at `path`, writing the defaults there on first run so
/// the file exists to be edited.
pub fn load_or_init_config(path: &Path) -> anyhow::Result<AppConfig> {
    let config =
        load_config(path).with_context(|| format!("failed to load {}", path.display()))?;
    if !path.exists() {
        save_config(path, &config)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(config)
}

/// Reads the config from its default location, installs logging and opens
/// the store.
pub fn open_app() -> anyhow::Result<(AppConfig, AppStore)> {
    let config = load_or_init_config(&paths::config_path())?;
    init_tracing(&config.log_level)?;
    tracing::info!(
        "opening bookmark store: backend={:?}, data_dir={}",
        config.backend,
        config.data_dir.display()
    );
    let store = open_store(&config)?;
    Ok((config, store))
}

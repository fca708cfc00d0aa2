//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the `.env` file outside production
//! - Build the configured todo store
//!
//! # Design Decisions
//! - Fail fast: a malformed `.env` or an unreachable store is fatal
//! - A missing `.env` file is normal and only reported

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{Environment, StoreBackend, StoreConfig};
use crate::store::{MemoryStore, MongoStore, StoreError, TodoStore};

/// Outcome of looking for a `.env` file.
#[derive(Debug, PartialEq, Eq)]
pub enum EnvFile {
    Loaded(PathBuf),
    Missing,
    /// Production mode never reads `.env`.
    Skipped,
}

/// Load `.env` from the working directory unless `ENV=production`.
///
/// Variables already present in the process environment are not overwritten.
pub fn load_env_file() -> Result<EnvFile, dotenvy::Error> {
    let production = std::env::var("ENV")
        .map(|v| Environment::from_env_value(&v).is_production())
        .unwrap_or(false);
    if production {
        return Ok(EnvFile::Skipped);
    }
    load_env_file_from(Path::new(".env"))
}

pub fn load_env_file_from(path: &Path) -> Result<EnvFile, dotenvy::Error> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(EnvFile::Loaded(path.to_path_buf())),
        Err(e) if e.not_found() => Ok(EnvFile::Missing),
        Err(e) => Err(e),
    }
}

/// Build the store selected by the configuration.
pub async fn connect_store(config: &StoreConfig) -> Result<Arc<dyn TodoStore>, StoreError> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory todo store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Mongo => {
            let store = MongoStore::connect(config).await?;
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_env_file_is_not_an_error() {
        let status = load_env_file_from(Path::new("/definitely/not/here/.env")).unwrap();
        assert_eq!(status, EnvFile::Missing);
    }

    #[test]
    fn test_env_file_is_loaded() {
        let path = std::env::temp_dir().join(format!("todo-service-{}.env", std::process::id()));
        std::fs::write(&path, "TODO_SERVICE_STARTUP_TEST=loaded\n").unwrap();

        let status = load_env_file_from(&path).unwrap();
        assert_eq!(status, EnvFile::Loaded(path.clone()));
        assert_eq!(std::env::var("TODO_SERVICE_STARTUP_TEST").unwrap(), "loaded");

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[tokio::test]
    async fn test_memory_backend_needs_no_connection() {
        let store = connect_store(&StoreConfig::default()).await.unwrap();
        assert_eq!(store.backend(), "memory");
        assert!(store.list().await.unwrap().is_empty());
    }
}

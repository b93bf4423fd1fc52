//! Local persistence: validated key-value storage, export and retry.

mod export;
mod gateway;
mod retry;

pub use export::{check_version, ExportBundle, ExportData, EXPORT_VERSION};
pub use gateway::{StorageGateway, StoreKey, WriteOutcome};
pub use retry::{retry, RetryPolicy, RetryingStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/nishwas[-dev]/` based on NISHWAS_ENV.
///
/// Set NISHWAS_ENV=dev to use the development data directory.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("NISHWAS_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("nishwas-dev")
    } else {
        base_dir.join("nishwas")
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDir(e.to_string()))?;
    Ok(dir)
}

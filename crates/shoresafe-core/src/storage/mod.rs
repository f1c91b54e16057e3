mod config;
pub mod database;
pub mod pass_db;
pub mod trip_store;

pub use config::{AlertsConfig, Config, TimerConfig, TripConfig};
pub use database::Database;
pub use pass_db::PassLedger;
pub use trip_store::{TimerStore, TripStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns the data directory, creating it if needed.
///
/// `SHORESAFE_DATA_DIR` wins when set. Otherwise this is
/// `~/.config/shoresafe/`, or `~/.config/shoresafe-dev/` when
/// `SHORESAFE_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("SHORESAFE_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("SHORESAFE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("shoresafe-dev")
            } else {
                base_dir.join("shoresafe")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

//! Persistence of the date history and of the configuration.
//!
//! The estimator never touches storage. Callers load a [`History`] through a
//! [`DateStore`], run the estimator on it, and write mutations back.
//!
//! [`History`]: crate::history::History

mod config;
pub mod database;
pub mod history;
mod memory;
pub mod migrations;

pub use config::{Config, DisplayConfig};
pub use database::SqliteStore;
pub use memory::MemoryStore;

use chrono::NaiveDate;
use std::path::PathBuf;

use crate::error::StoreError;

/// Backing store of logged dates.
pub trait DateStore {
    /// Load every logged date, ascending.
    ///
    /// # Errors
    /// [`StoreError::Unavailable`] when the store cannot be read.
    fn load_dates(&self) -> Result<Vec<NaiveDate>, StoreError>;

    /// Replace the stored dates with `dates`.
    ///
    /// # Errors
    /// [`StoreError::Unavailable`] when the store cannot be written, and
    /// [`StoreError::Conflict`] when someone else saved since the last
    /// [`DateStore::load_dates`] on this handle.
    fn save_dates(&self, dates: &[NaiveDate]) -> Result<(), StoreError>;
}

/// Returns the data directory, creating it if needed.
///
/// `CYCLETRACK_DATA_DIR` overrides the location. Otherwise this is
/// `~/.config/cycletrack/`, or `~/.config/cycletrack-dev/` when
/// `CYCLETRACK_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("CYCLETRACK_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("CYCLETRACK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("cycletrack-dev")
            } else {
                base_dir.join("cycletrack")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

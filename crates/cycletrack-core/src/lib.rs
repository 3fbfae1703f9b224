//! # Cycletrack Core Library
//!
//! This library logs the dates of a recurring event and predicts the next
//! occurrence window from the gaps between past dates. The `cycletrack`
//! CLI is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Estimator**: pure, stateless prediction over an ascending date list
//!   (IQR outlier filter with fixed-bound fallback, recency-weighted mean,
//!   capped window, reliability label)
//! - **History**: the sorted list of logged dates
//! - **Storage**: SQLite date store behind the [`DateStore`] trait and
//!   TOML-based configuration
//! - **Dates**: day-first parsing and the sheet export format
//!
//! ## Key Components
//!
//! - [`CycleEstimator`]: gaps → filtered gaps → [`Prediction`]
//! - [`History`]: sorted dates with append / delete-last / wipe
//! - [`SqliteStore`]: persistent [`DateStore`]
//! - [`Config`]: estimator constants and display preferences

pub mod dates;
pub mod error;
pub mod estimator;
pub mod history;
pub mod storage;

pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use estimator::{CycleEstimator, EstimatorParams, InsufficientData, Prediction, Reliability};
pub use history::History;
pub use storage::{Config, DateStore, MemoryStore, SqliteStore};

/// Predict with the default estimator constants.
pub fn predict(history: &History) -> Result<Prediction, InsufficientData> {
    history.predict(&CycleEstimator::default())
}

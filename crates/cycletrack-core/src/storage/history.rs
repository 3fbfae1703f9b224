//! History mutations on top of a [`DateStore`].
//!
//! Each operation loads the current dates, applies one change and saves the
//! result, so a concurrent writer surfaces as [`StoreError::Conflict`].

use chrono::NaiveDate;
use tracing::info;

use super::DateStore;
use crate::error::StoreError;
use crate::history::History;

/// Load the history, sorted.
pub fn load_history(store: &impl DateStore) -> Result<History, StoreError> {
    Ok(History::from_dates(store.load_dates()?))
}

/// Append `date` and return the updated history.
pub fn log_date(store: &impl DateStore, date: NaiveDate) -> Result<History, StoreError> {
    let mut history = load_history(store)?;
    history.push(date);
    store.save_dates(history.as_slice())?;
    info!(%date, total = history.len(), "logged date");
    Ok(history)
}

/// Append several dates at once.
pub fn log_dates(
    store: &impl DateStore,
    dates: impl IntoIterator<Item = NaiveDate>,
) -> Result<History, StoreError> {
    let mut history = load_history(store)?;
    for date in dates {
        history.push(date);
    }
    store.save_dates(history.as_slice())?;
    Ok(history)
}

/// Remove the chronologically last date, returning it.
///
/// Nothing is written when the history is already empty.
pub fn delete_last(store: &impl DateStore) -> Result<Option<NaiveDate>, StoreError> {
    let mut history = load_history(store)?;
    let removed = history.pop_last();
    if let Some(date) = removed {
        store.save_dates(history.as_slice())?;
        info!(%date, remaining = history.len(), "deleted last entry");
    }
    Ok(removed)
}

/// Delete every logged date, returning how many were removed.
pub fn wipe(store: &impl DateStore) -> Result<usize, StoreError> {
    let history = load_history(store)?;
    store.save_dates(&[])?;
    info!(removed = history.len(), "wiped history");
    Ok(history.len())
}

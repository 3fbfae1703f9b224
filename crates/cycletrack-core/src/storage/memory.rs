//! In-process date store.

use chrono::NaiveDate;
use std::cell::{Cell, RefCell};

use super::DateStore;
use crate::error::StoreError;

/// [`DateStore`] kept in memory, with the same revision semantics as
/// [`super::SqliteStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    dates: RefCell<Vec<NaiveDate>>,
    revision: Cell<i64>,
    loaded_revision: Cell<Option<i64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `dates`.
    pub fn with_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        let mut dates: Vec<NaiveDate> = dates.into_iter().collect();
        dates.sort();
        Self {
            dates: RefCell::new(dates),
            ..Self::default()
        }
    }

    pub fn revision(&self) -> i64 {
        self.revision.get()
    }

    /// Simulate a write by another process.
    pub fn bump_revision(&self) {
        self.revision.set(self.revision.get() + 1);
    }
}

impl DateStore for MemoryStore {
    fn load_dates(&self) -> Result<Vec<NaiveDate>, StoreError> {
        self.loaded_revision.set(Some(self.revision.get()));
        Ok(self.dates.borrow().clone())
    }

    fn save_dates(&self, dates: &[NaiveDate]) -> Result<(), StoreError> {
        let current = self.revision.get();
        if let Some(expected) = self.loaded_revision.get() {
            if expected != current {
                return Err(StoreError::Conflict {
                    expected,
                    found: current,
                });
            }
        }

        let mut sorted = dates.to_vec();
        sorted.sort();
        *self.dates.borrow_mut() = sorted;
        self.revision.set(current + 1);
        self.loaded_revision.set(Some(current + 1));
        Ok(())
    }
}

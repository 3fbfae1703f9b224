//! Logged event dates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::estimator::{CycleEstimator, InsufficientData, Prediction};

/// Ascending list of logged dates.
///
/// Duplicates are allowed; they only degrade the statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<NaiveDate>", into = "Vec<NaiveDate>")]
pub struct History {
    dates: Vec<NaiveDate>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history from dates in any order.
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        let mut dates: Vec<NaiveDate> = dates.into_iter().collect();
        dates.sort();
        Self { dates }
    }

    /// Insert a date at its chronological position.
    ///
    /// An equal date is inserted after the existing ones.
    pub fn push(&mut self, date: NaiveDate) {
        let idx = self.dates.partition_point(|d| *d <= date);
        self.dates.insert(idx, date);
    }

    /// Remove the chronologically last date.
    pub fn pop_last(&mut self) -> Option<NaiveDate> {
        self.dates.pop()
    }

    pub fn clear(&mut self) {
        self.dates.clear();
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn as_slice(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Newest first, the order used for display.
    pub fn iter_desc(&self) -> impl Iterator<Item = &NaiveDate> {
        self.dates.iter().rev()
    }

    /// Predict the next window with `estimator`.
    pub fn predict(&self, estimator: &CycleEstimator) -> Result<Prediction, InsufficientData> {
        estimator.predict(&self.dates)
    }

    pub fn into_vec(self) -> Vec<NaiveDate> {
        self.dates
    }
}

impl From<Vec<NaiveDate>> for History {
    fn from(dates: Vec<NaiveDate>) -> Self {
        Self::from_dates(dates)
    }
}

impl From<History> for Vec<NaiveDate> {
    fn from(history: History) -> Self {
        history.dates
    }
}

impl FromIterator<NaiveDate> for History {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self::from_dates(iter)
    }
}

//! Estimator output types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse confidence label derived from the unclamped dispersion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reliability {
    High,
    Moderate,
    Variable,
}

impl Reliability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reliability::High => "High",
            Reliability::Moderate => "Moderate",
            Reliability::Variable => "Variable",
        }
    }
}

impl std::fmt::Display for Reliability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predicted next-occurrence window and the statistics behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    /// Recency-weighted mean gap in days
    pub average_cycle: f64,
    /// Half-width of the window, capped for display
    pub variation: f64,
    /// Unclamped dispersion of the surviving gaps
    pub dispersion: f64,
    pub reliability: Reliability,
    /// Date the window is anchored to
    pub last_date: NaiveDate,
    /// Gaps that survived outlier filtering
    pub gaps_used: usize,
    /// All gaps computed from the history
    pub gaps_total: usize,
    /// Whether the fixed-bound fallback filter was applied
    pub fallback_used: bool,
}

/// Why no prediction could be made.
///
/// None of these are fatal: callers show guidance to log more dates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InsufficientData {
    #[error("at least 2 dates are needed, {logged} logged")]
    TooFewDates { logged: usize },

    #[error("none of the {total_gaps} gaps passed outlier filtering")]
    NoReliableGaps { total_gaps: usize },

    #[error("predicted window falls outside the supported calendar range")]
    WindowOutOfRange,
}

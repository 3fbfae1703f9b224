//! Cycle prediction.
//!
//! Turns a chronologically sorted list of dates into a predicted window for
//! the next occurrence:
//!
//! 1. gaps between adjacent dates
//! 2. IQR outlier filter, with a fixed-bound fallback for tiny samples
//! 3. recency-weighted mean of the surviving gaps
//! 4. population standard deviation as dispersion
//! 5. window = last date ± capped dispersion around the mean
//!
//! The estimator is a pure value: it keeps no state between calls and never
//! caches, so identical input always yields identical output.

mod params;
mod prediction;
pub mod stats;

pub use params::{
    EstimatorParams, FALLBACK_MAX_GAP_DAYS, FALLBACK_MIN_GAP_DAYS, HIGH_RELIABILITY_BELOW,
    IQR_FENCE_MULTIPLIER, MIN_IQR_SURVIVORS, MODERATE_RELIABILITY_BELOW, RECENT_WEIGHT,
    RECENT_WINDOW, SINGLE_GAP_DISPERSION, VARIATION_CAP_DAYS,
};
pub use prediction::{InsufficientData, Prediction, Reliability};

use chrono::{Duration, NaiveDate};
use tracing::debug;

use stats::{population_std_dev, quantile_linear, round_half_up};

/// Gaps left after outlier filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredGaps {
    /// Surviving gaps, in their original order
    pub gaps: Vec<i64>,
    /// True when the IQR filter kept too few gaps and the fixed bounds were used
    pub fallback_used: bool,
}

/// Predicted window before it is wrapped into a [`Prediction`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub variation: f64,
}

/// Cycle estimator.
#[derive(Debug, Clone, Default)]
pub struct CycleEstimator {
    params: EstimatorParams,
}

impl CycleEstimator {
    /// Create an estimator with the default constants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an estimator with custom parameters.
    pub fn with_params(params: EstimatorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &EstimatorParams {
        &self.params
    }

    /// Day differences between adjacent dates.
    ///
    /// Empty when fewer than 2 dates are given. Unsorted or duplicate input
    /// produces negative or zero gaps rather than an error.
    pub fn compute_gaps(&self, dates: &[NaiveDate]) -> Vec<i64> {
        dates
            .windows(2)
            .map(|pair| pair[1].signed_duration_since(pair[0]).num_days())
            .collect()
    }

    /// Drop outlying gaps.
    ///
    /// Keeps gaps inside the Tukey fences `[Q1 - k*IQR, Q3 + k*IQR]`. If fewer
    /// than `min_iqr_survivors` remain, the fixed open interval
    /// `(fallback_min_gap_days, fallback_max_gap_days)` is applied to the
    /// original gaps instead.
    pub fn filter_outliers(&self, gaps: &[i64]) -> FilteredGaps {
        let p = &self.params;

        let mut sorted: Vec<f64> = gaps.iter().map(|&g| g as f64).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let kept: Vec<i64> = match (quantile_linear(&sorted, 0.25), quantile_linear(&sorted, 0.75)) {
            (Some(q1), Some(q3)) => {
                let iqr = q3 - q1;
                let lower = q1 - p.iqr_fence_multiplier * iqr;
                let upper = q3 + p.iqr_fence_multiplier * iqr;
                debug!(q1, q3, iqr, lower, upper, "IQR fences");
                gaps.iter()
                    .copied()
                    .filter(|&g| (g as f64) >= lower && (g as f64) <= upper)
                    .collect()
            }
            _ => Vec::new(),
        };

        if kept.len() >= p.min_iqr_survivors {
            return FilteredGaps {
                gaps: kept,
                fallback_used: false,
            };
        }

        let fallback: Vec<i64> = gaps
            .iter()
            .copied()
            .filter(|&g| g > p.fallback_min_gap_days && g < p.fallback_max_gap_days)
            .collect();
        debug!(
            iqr_kept = kept.len(),
            fallback_kept = fallback.len(),
            "IQR filter kept too few gaps, using fixed bounds"
        );
        FilteredGaps {
            gaps: fallback,
            fallback_used: true,
        }
    }

    /// Recency-weighted mean.
    ///
    /// When at least `recent_window` gaps exist, the last `recent_window` of
    /// them weigh `recent_weight`; every other gap weighs 1.0.
    pub fn weighted_average(&self, gaps: &[i64]) -> Option<f64> {
        if gaps.is_empty() {
            return None;
        }
        let p = &self.params;
        let n = gaps.len();
        let boosted_from = if n >= p.recent_window {
            n - p.recent_window
        } else {
            n
        };

        let (sum, total_weight) = gaps.iter().enumerate().fold((0.0, 0.0), |(sum, tw), (i, &g)| {
            let w = if i >= boosted_from { p.recent_weight } else { 1.0 };
            (sum + g as f64 * w, tw + w)
        });

        if total_weight <= 0.0 {
            return None;
        }
        Some(sum / total_weight)
    }

    /// Population standard deviation of the gaps.
    ///
    /// A single gap has no spread, so `single_gap_dispersion` is used instead.
    pub fn dispersion(&self, gaps: &[i64]) -> Option<f64> {
        match gaps.len() {
            0 => None,
            1 => Some(self.params.single_gap_dispersion),
            _ => {
                let values: Vec<f64> = gaps.iter().map(|&g| g as f64).collect();
                population_std_dev(&values)
            }
        }
    }

    /// Window around `last_date + average`.
    ///
    /// The half-width is the dispersion capped at `variation_cap_days`. Both
    /// offsets are rounded half-up before being added. Returns `None` if the
    /// window leaves the representable calendar.
    pub fn build_window(
        &self,
        last_date: NaiveDate,
        average: f64,
        dispersion: f64,
    ) -> Option<PredictionWindow> {
        let variation = dispersion.min(self.params.variation_cap_days);
        let start_offset = round_half_up(average - variation);
        let end_offset = round_half_up(average + variation);

        let start = last_date.checked_add_signed(Duration::try_days(start_offset)?)?;
        let end = last_date.checked_add_signed(Duration::try_days(end_offset)?)?;
        Some(PredictionWindow {
            start,
            end,
            variation,
        })
    }

    /// Label the unclamped dispersion.
    pub fn reliability(&self, dispersion: f64) -> Reliability {
        if dispersion < self.params.high_reliability_below {
            Reliability::High
        } else if dispersion < self.params.moderate_reliability_below {
            Reliability::Moderate
        } else {
            Reliability::Variable
        }
    }

    /// Run the whole pipeline over ascending `dates`.
    ///
    /// # Errors
    /// Returns [`InsufficientData`] when fewer than 2 dates are given, when
    /// no gap survives filtering, or when the window cannot be represented.
    pub fn predict(&self, dates: &[NaiveDate]) -> Result<Prediction, InsufficientData> {
        let last_date = match dates {
            [.., _, last] => *last,
            _ => return Err(InsufficientData::TooFewDates { logged: dates.len() }),
        };

        let gaps = self.compute_gaps(dates);
        let filtered = self.filter_outliers(&gaps);
        debug!(gaps = ?gaps, kept = ?filtered.gaps, "filtered gaps");

        let no_gaps = || InsufficientData::NoReliableGaps {
            total_gaps: gaps.len(),
        };
        let average = self.weighted_average(&filtered.gaps).ok_or_else(no_gaps)?;
        let dispersion = self.dispersion(&filtered.gaps).ok_or_else(no_gaps)?;

        let window = self
            .build_window(last_date, average, dispersion)
            .ok_or(InsufficientData::WindowOutOfRange)?;

        Ok(Prediction {
            window_start: window.start,
            window_end: window.end,
            average_cycle: average,
            variation: window.variation,
            dispersion,
            reliability: self.reliability(dispersion),
            last_date,
            gaps_used: filtered.gaps.len(),
            gaps_total: gaps.len(),
            fallback_used: filtered.fallback_used,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// Dates starting at 2024-01-01 separated by `gaps`.
    fn dates_from_gaps(gaps: &[i64]) -> Vec<NaiveDate> {
        let mut current = date("2024-01-01");
        let mut out = vec![current];
        for &g in gaps {
            current += Duration::days(g);
            out.push(current);
        }
        out
    }

    #[test]
    fn gaps_are_adjacent_differences() {
        let est = CycleEstimator::new();
        let dates = [date("2024-01-01"), date("2024-01-29"), date("2024-02-27")];
        assert_eq!(est.compute_gaps(&dates), vec![28, 29]);
        assert!(est.compute_gaps(&dates[..1]).is_empty());
        assert!(est.compute_gaps(&[]).is_empty());
    }

    #[test]
    fn gaps_of_unsorted_input_go_negative() {
        let est = CycleEstimator::new();
        let dates = [date("2024-02-01"), date("2024-01-01"), date("2024-01-01")];
        assert_eq!(est.compute_gaps(&dates), vec![-31, 0]);
    }

    #[test]
    fn iqr_filter_drops_long_outlier() {
        let est = CycleEstimator::new();
        let filtered = est.filter_outliers(&[28, 29, 30, 31, 90]);
        assert_eq!(filtered.gaps, vec![28, 29, 30, 31]);
        assert!(!filtered.fallback_used);
    }

    #[test]
    fn two_gaps_survive_iqr() {
        let est = CycleEstimator::new();
        let filtered = est.filter_outliers(&[20, 45]);
        assert_eq!(filtered.gaps, vec![20, 45]);
    }

    #[test]
    fn single_gap_uses_fallback_bounds() {
        let est = CycleEstimator::new();

        let kept = est.filter_outliers(&[28]);
        assert_eq!(kept.gaps, vec![28]);
        assert!(kept.fallback_used);

        let dropped = est.filter_outliers(&[10]);
        assert!(dropped.gaps.is_empty());
        assert!(dropped.fallback_used);
    }

    #[test]
    fn fallback_bounds_are_exclusive() {
        let est = CycleEstimator::new();
        assert!(est.filter_outliers(&[15]).gaps.is_empty());
        assert!(est.filter_outliers(&[50]).gaps.is_empty());
        assert_eq!(est.filter_outliers(&[16]).gaps, vec![16]);
        assert_eq!(est.filter_outliers(&[49]).gaps, vec![49]);
    }

    #[test]
    fn fallback_triggers_when_survivor_floor_is_raised() {
        let est = CycleEstimator::with_params(EstimatorParams {
            min_iqr_survivors: 10,
            ..Default::default()
        });
        let filtered = est.filter_outliers(&[5, 28, 30, 60]);
        assert!(filtered.fallback_used);
        assert_eq!(filtered.gaps, vec![28, 30]);
    }

    #[test]
    fn recent_gaps_weigh_double() {
        let est = CycleEstimator::new();
        let gaps = [20, 20, 20, 20, 30, 30, 30];
        let weighted = est.weighted_average(&gaps).unwrap();
        let plain = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;
        assert!(weighted > plain);
        assert!((weighted - 26.0).abs() < 1e-9);
    }

    #[test]
    fn short_series_is_unweighted() {
        let est = CycleEstimator::new();
        assert_eq!(est.weighted_average(&[28, 29]), Some(28.5));
        assert_eq!(est.weighted_average(&[]), None);
    }

    #[test]
    fn exactly_three_gaps_are_all_boosted() {
        let est = CycleEstimator::new();
        assert_eq!(est.weighted_average(&[27, 28, 32]), Some(29.0));
    }

    #[test]
    fn dispersion_edge_sizes() {
        let est = CycleEstimator::new();
        assert_eq!(est.dispersion(&[]), None);
        assert_eq!(est.dispersion(&[30]), Some(SINGLE_GAP_DISPERSION));
        assert_eq!(est.dispersion(&[28, 28, 28]), Some(0.0));
    }

    #[test]
    fn window_caps_variation_but_not_reliability() {
        let est = CycleEstimator::new();
        let last = date("2024-03-01");
        let window = est.build_window(last, 30.0, 10.0).unwrap();
        assert_eq!(window.variation, VARIATION_CAP_DAYS);
        assert_eq!(window.start, date("2024-03-27"));
        assert_eq!(window.end, date("2024-04-04"));
        assert_eq!(est.reliability(10.0), Reliability::Variable);
    }

    #[test]
    fn window_rounds_half_up() {
        let est = CycleEstimator::new();
        let last = date("2024-01-01");
        let window = est.build_window(last, 28.5, 0.0).unwrap();
        assert_eq!(window.start, date("2024-01-30"));
        assert_eq!(window.end, date("2024-01-30"));
    }

    #[test]
    fn window_out_of_range_is_none() {
        let est = CycleEstimator::new();
        assert!(est.build_window(NaiveDate::MAX, 30.0, 1.0).is_none());
    }

    #[test]
    fn reliability_thresholds() {
        let est = CycleEstimator::new();
        assert_eq!(est.reliability(0.0), Reliability::High);
        assert_eq!(est.reliability(2.99), Reliability::High);
        assert_eq!(est.reliability(3.0), Reliability::Moderate);
        assert_eq!(est.reliability(4.99), Reliability::Moderate);
        assert_eq!(est.reliability(5.0), Reliability::Variable);
    }

    #[test]
    fn predict_needs_two_dates() {
        let est = CycleEstimator::new();
        assert_eq!(
            est.predict(&[]),
            Err(InsufficientData::TooFewDates { logged: 0 })
        );
        assert_eq!(
            est.predict(&[date("2024-01-01")]),
            Err(InsufficientData::TooFewDates { logged: 1 })
        );
    }

    #[test]
    fn predict_end_to_end() {
        let est = CycleEstimator::new();
        let dates = [date("2024-01-01"), date("2024-01-29"), date("2024-02-27")];
        let p = est.predict(&dates).unwrap();

        assert_eq!(p.average_cycle, 28.5);
        assert!((p.dispersion - 0.5).abs() < 1e-12);
        assert!((p.variation - 0.5).abs() < 1e-12);
        assert_eq!(p.reliability, Reliability::High);
        // 2024-02-27 + 28 and + 29 days (leap year)
        assert_eq!(p.window_start, date("2024-03-26"));
        assert_eq!(p.window_end, date("2024-03-27"));
        assert_eq!(p.gaps_used, 2);
        assert_eq!(p.gaps_total, 2);
        assert!(!p.fallback_used);
    }

    #[test]
    fn predict_ignores_outlier() {
        let est = CycleEstimator::new();
        let p = est.predict(&dates_from_gaps(&[28, 29, 30, 31, 90])).unwrap();
        assert!(p.average_cycle >= 28.0 && p.average_cycle <= 31.0);
        assert_eq!(p.gaps_used, 4);
        assert_eq!(p.gaps_total, 5);
    }

    #[test]
    fn predict_two_wide_gaps() {
        let est = CycleEstimator::new();
        let p = est.predict(&dates_from_gaps(&[20, 45])).unwrap();
        assert!((p.average_cycle - 32.5).abs() < 1e-9);
        assert_eq!(p.reliability, Reliability::Variable);
        assert_eq!(p.variation, VARIATION_CAP_DAYS);
    }

    #[test]
    fn predict_single_gap_uses_default_dispersion() {
        let est = CycleEstimator::new();
        let p = est.predict(&dates_from_gaps(&[28])).unwrap();
        assert_eq!(p.average_cycle, 28.0);
        assert_eq!(p.variation, SINGLE_GAP_DISPERSION);
        assert_eq!(p.reliability, Reliability::High);
        assert!(p.fallback_used);
    }

    #[test]
    fn predict_rejects_implausible_single_gap() {
        let est = CycleEstimator::new();
        assert_eq!(
            est.predict(&dates_from_gaps(&[3])),
            Err(InsufficientData::NoReliableGaps { total_gaps: 1 })
        );
    }

    #[test]
    fn predict_survives_duplicates() {
        let est = CycleEstimator::new();
        let d = date("2024-01-01");
        assert_eq!(
            est.predict(&[d, d]),
            Err(InsufficientData::NoReliableGaps { total_gaps: 1 })
        );

        let p = est.predict(&dates_from_gaps(&[28, 0, 29, 28, 30])).unwrap();
        assert!(p.gaps_used < p.gaps_total);
        assert!(p.average_cycle > 27.0);
    }

    #[test]
    fn same_day_entries_predict_the_same_day() {
        let est = CycleEstimator::new();
        let d = date("2024-01-01");
        assert_eq!(est.compute_gaps(&[d, d, d]), vec![0, 0]);

        let p = est.predict(&[d, d, d]).unwrap();
        assert_eq!(p.gaps_used, 2);
        assert!(!p.fallback_used);
        assert_eq!(p.average_cycle, 0.0);
        assert_eq!(p.dispersion, 0.0);
        assert_eq!(p.reliability, Reliability::High);
        assert_eq!(p.window_start, d);
        assert_eq!(p.window_end, d);
    }
}

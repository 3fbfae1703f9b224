//! Tunable constants of the cycle estimator.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Lower fallback bound; gaps must be strictly greater.
pub const FALLBACK_MIN_GAP_DAYS: i64 = 15;
/// Upper fallback bound; gaps must be strictly smaller.
pub const FALLBACK_MAX_GAP_DAYS: i64 = 50;
/// Tukey fence multiplier applied to the IQR.
pub const IQR_FENCE_MULTIPLIER: f64 = 1.5;
/// Fewer IQR survivors than this triggers the fixed-bound fallback.
pub const MIN_IQR_SURVIVORS: usize = 2;
/// Number of most recent gaps that receive the recency weight.
pub const RECENT_WINDOW: usize = 3;
/// Weight of each recent gap; older gaps weigh 1.0.
pub const RECENT_WEIGHT: f64 = 2.0;
/// Dispersion used when only one gap survives filtering.
pub const SINGLE_GAP_DISPERSION: f64 = 2.0;
/// Display cap on the half-width of the predicted window.
///
/// This keeps the window tight for the user; it does not make the
/// prediction more accurate.
pub const VARIATION_CAP_DAYS: f64 = 4.0;
/// Dispersion below this is labelled High reliability.
pub const HIGH_RELIABILITY_BELOW: f64 = 3.0;
/// Dispersion below this (and not High) is labelled Moderate.
pub const MODERATE_RELIABILITY_BELOW: f64 = 5.0;

/// Parameters of [`super::CycleEstimator`].
///
/// Defaults are the named constants of this module. Serialized as the
/// `[estimator]` table of the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorParams {
    pub fallback_min_gap_days: i64,
    pub fallback_max_gap_days: i64,
    pub iqr_fence_multiplier: f64,
    pub min_iqr_survivors: usize,
    pub recent_window: usize,
    pub recent_weight: f64,
    pub single_gap_dispersion: f64,
    pub variation_cap_days: f64,
    pub high_reliability_below: f64,
    pub moderate_reliability_below: f64,
}

impl Default for EstimatorParams {
    fn default() -> Self {
        Self {
            fallback_min_gap_days: FALLBACK_MIN_GAP_DAYS,
            fallback_max_gap_days: FALLBACK_MAX_GAP_DAYS,
            iqr_fence_multiplier: IQR_FENCE_MULTIPLIER,
            min_iqr_survivors: MIN_IQR_SURVIVORS,
            recent_window: RECENT_WINDOW,
            recent_weight: RECENT_WEIGHT,
            single_gap_dispersion: SINGLE_GAP_DISPERSION,
            variation_cap_days: VARIATION_CAP_DAYS,
            high_reliability_below: HIGH_RELIABILITY_BELOW,
            moderate_reliability_below: MODERATE_RELIABILITY_BELOW,
        }
    }
}

impl EstimatorParams {
    /// Check that the parameters describe a usable estimator.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(key: &str, message: &str) -> ConfigError {
            ConfigError::InvalidValue {
                key: format!("estimator.{key}"),
                message: message.to_string(),
            }
        }

        let floats = [
            ("iqr_fence_multiplier", self.iqr_fence_multiplier),
            ("recent_weight", self.recent_weight),
            ("single_gap_dispersion", self.single_gap_dispersion),
            ("variation_cap_days", self.variation_cap_days),
            ("high_reliability_below", self.high_reliability_below),
            ("moderate_reliability_below", self.moderate_reliability_below),
        ];
        for (key, value) in floats {
            if !value.is_finite() {
                return Err(invalid(key, "must be a finite number"));
            }
        }

        if self.fallback_min_gap_days >= self.fallback_max_gap_days {
            return Err(invalid(
                "fallback_min_gap_days",
                "must be smaller than fallback_max_gap_days",
            ));
        }
        if self.iqr_fence_multiplier < 0.0 {
            return Err(invalid("iqr_fence_multiplier", "must not be negative"));
        }
        if self.recent_weight <= 0.0 {
            return Err(invalid("recent_weight", "must be positive"));
        }
        if self.single_gap_dispersion < 0.0 {
            return Err(invalid("single_gap_dispersion", "must not be negative"));
        }
        if self.variation_cap_days < 0.0 {
            return Err(invalid("variation_cap_days", "must not be negative"));
        }
        if self.high_reliability_below > self.moderate_reliability_below {
            return Err(invalid(
                "high_reliability_below",
                "must not exceed moderate_reliability_below",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(EstimatorParams::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_fallback_bounds() {
        let params = EstimatorParams {
            fallback_min_gap_days: 50,
            fallback_max_gap_days: 15,
            ..Default::default()
        };
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("estimator.fallback_min_gap_days"));
    }

    #[test]
    fn rejects_out_of_order_thresholds() {
        let params = EstimatorParams {
            high_reliability_below: 6.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_non_finite_cap() {
        let params = EstimatorParams {
            variation_cap_days: f64::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let params: EstimatorParams = toml::from_str("variation_cap_days = 3.0").unwrap();
        assert_eq!(params.variation_cap_days, 3.0);
        assert_eq!(params.recent_window, RECENT_WINDOW);
    }
}

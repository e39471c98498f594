use serde::{Deserialize, Serialize};

use super::domain::Gender;

/// Inclusive `[min, max]` band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InclusiveRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> InclusiveRange<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Gender-conditioned RBC bands, with a fallback for `other`/`unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RbcBands {
    pub male: InclusiveRange<f64>,
    pub female: InclusiveRange<f64>,
    pub unspecified: InclusiveRange<f64>,
}

impl RbcBands {
    pub fn for_gender(&self, gender: Gender) -> InclusiveRange<f64> {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
            Gender::Other | Gender::Unknown => self.unspecified,
        }
    }
}

/// How absent measurements are read by the numeric criteria.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuePolicy {
    /// Absent values are compared as `0` and fail their range check.
    #[default]
    TreatAsZero,
    /// Absent values are reported as indeterminate (still not eligible).
    FlagIndeterminate,
}

/// Threshold set applied by the eligibility evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EligibilityThresholds {
    pub age: InclusiveRange<u32>,
    pub minimum_weight_kg: f64,
    pub minimum_hemoglobin_g_dl: f64,
    pub rbc: RbcBands,
    pub systolic_bp: InclusiveRange<u32>,
    pub diastolic_bp: InclusiveRange<u32>,
    pub pulse_bpm: InclusiveRange<u32>,
    pub donation_interval_days: u32,
    pub tattoo_lookback_days: u32,
    pub missing_values: MissingValuePolicy,
}

impl EligibilityThresholds {
    pub fn standard() -> Self {
        Self {
            age: InclusiveRange::new(18, 65),
            minimum_weight_kg: 50.0,
            minimum_hemoglobin_g_dl: 12.5,
            rbc: RbcBands {
                male: InclusiveRange::new(4.5, 5.5),
                female: InclusiveRange::new(4.0, 5.0),
                unspecified: InclusiveRange::new(4.0, 5.5),
            },
            systolic_bp: InclusiveRange::new(120, 180),
            diastolic_bp: InclusiveRange::new(70, 100),
            pulse_bpm: InclusiveRange::new(50, 100),
            donation_interval_days: 90,
            tattoo_lookback_days: 90,
            missing_values: MissingValuePolicy::TreatAsZero,
        }
    }

    pub fn validate(&self) -> Result<(), ThresholdError> {
        check_ordered("age", self.age)?;
        check_ordered("systolicBp", self.systolic_bp)?;
        check_ordered("diastolicBp", self.diastolic_bp)?;
        check_ordered("pulseBpm", self.pulse_bpm)?;

        check_window("donationIntervalDays", self.donation_interval_days)?;
        check_window("tattooLookbackDays", self.tattoo_lookback_days)?;

        check_measure("minimumWeightKg", self.minimum_weight_kg)?;
        check_measure("minimumHemoglobinGDl", self.minimum_hemoglobin_g_dl)?;

        for (field, band) in [
            ("rbc.male", self.rbc.male),
            ("rbc.female", self.rbc.female),
            ("rbc.unspecified", self.rbc.unspecified),
        ] {
            check_measure(field, band.min)?;
            check_measure(field, band.max)?;
            check_ordered(field, band)?;
        }

        Ok(())
    }
}

impl Default for EligibilityThresholds {
    fn default() -> Self {
        Self::standard()
    }
}

fn check_ordered<T>(field: &'static str, range: InclusiveRange<T>) -> Result<(), ThresholdError>
where
    T: PartialOrd + Copy + std::fmt::Display,
{
    if range.min > range.max {
        return Err(ThresholdError::InvertedRange {
            field,
            min: range.min.to_string(),
            max: range.max.to_string(),
        });
    }
    Ok(())
}

/// Longest deferral or look-back window a rules file may configure (ten years).
pub const MAX_WINDOW_DAYS: u32 = 3650;

fn check_window(field: &'static str, days: u32) -> Result<(), ThresholdError> {
    if days > MAX_WINDOW_DAYS {
        return Err(ThresholdError::WindowTooLong {
            field,
            days,
            max: MAX_WINDOW_DAYS,
        });
    }
    Ok(())
}

fn check_measure(field: &'static str, value: f64) -> Result<(), ThresholdError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ThresholdError::InvalidMeasure { field, value });
    }
    Ok(())
}

/// Rejected threshold configuration.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ThresholdError {
    #[error("{field} range is inverted (min {min} > max {max})")]
    InvertedRange {
        field: &'static str,
        min: String,
        max: String,
    },
    #[error("{field} must be a finite, non-negative number (found {value})")]
    InvalidMeasure { field: &'static str, value: f64 },
    #[error("{field} of {days} days exceeds the {max}-day limit")]
    WindowTooLong {
        field: &'static str,
        days: u32,
        max: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_thresholds_validate() {
        assert_eq!(EligibilityThresholds::standard().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_inverted_pulse_band() {
        let mut thresholds = EligibilityThresholds::standard();
        thresholds.pulse_bpm = InclusiveRange::new(110, 60);

        match thresholds.validate() {
            Err(ThresholdError::InvertedRange { field, .. }) => assert_eq!(field, "pulseBpm"),
            other => panic!("expected inverted range, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_nan_hemoglobin() {
        let mut thresholds = EligibilityThresholds::standard();
        thresholds.minimum_hemoglobin_g_dl = f64::NAN;

        assert!(matches!(
            thresholds.validate(),
            Err(ThresholdError::InvalidMeasure {
                field: "minimumHemoglobinGDl",
                ..
            })
        ));
    }

    #[test]
    fn validate_bounds_day_windows() {
        let mut thresholds = EligibilityThresholds::standard();
        thresholds.donation_interval_days = MAX_WINDOW_DAYS;
        assert_eq!(thresholds.validate(), Ok(()));

        thresholds.donation_interval_days = u32::MAX;
        assert_eq!(
            thresholds.validate(),
            Err(ThresholdError::WindowTooLong {
                field: "donationIntervalDays",
                days: u32::MAX,
                max: MAX_WINDOW_DAYS,
            })
        );

        let mut thresholds = EligibilityThresholds::standard();
        thresholds.tattoo_lookback_days = MAX_WINDOW_DAYS + 1;
        assert!(matches!(
            thresholds.validate(),
            Err(ThresholdError::WindowTooLong {
                field: "tattooLookbackDays",
                ..
            })
        ));
    }

    #[test]
    fn partial_json_overrides_keep_remaining_defaults() {
        let raw = r#"{
            "diastolicBp": { "min": 60, "max": 100 },
            "missingValues": "flag_indeterminate"
        }"#;

        let thresholds: EligibilityThresholds =
            serde_json::from_str(raw).expect("partial override parses");

        assert_eq!(thresholds.diastolic_bp, InclusiveRange::new(60, 100));
        assert_eq!(thresholds.missing_values, MissingValuePolicy::FlagIndeterminate);
        assert_eq!(thresholds.age, InclusiveRange::new(18, 65));
        assert_eq!(thresholds.donation_interval_days, 90);
    }

    #[test]
    fn unmapped_genders_use_unspecified_band() {
        let bands = EligibilityThresholds::standard().rbc;
        assert_eq!(bands.for_gender(Gender::Other), bands.unspecified);
        assert_eq!(bands.for_gender(Gender::Unknown), bands.unspecified);
        assert_eq!(bands.for_gender(Gender::Female), bands.female);
    }
}

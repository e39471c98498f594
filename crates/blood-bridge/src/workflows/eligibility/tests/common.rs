use chrono::{Duration, NaiveDate};

use crate::workflows::eligibility::{
    DonorAssessmentInput, EligibilityEvaluator, EligibilityThresholds, EligibilityVerdict, Gender,
    MissingValuePolicy,
};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 15).expect("valid date")
}

pub(super) fn days_ago(days: i64) -> NaiveDate {
    today() - Duration::days(days)
}

pub(super) fn healthy_male() -> DonorAssessmentInput {
    DonorAssessmentInput {
        age: Some(30),
        gender: Gender::Male,
        weight_kg: Some(70.0),
        height_cm: Some(178),
        hemoglobin_g_dl: Some(14.0),
        rbc_count_million_per_ul: Some(5.0),
        systolic_bp_mm_hg: Some(120),
        diastolic_bp_mm_hg: Some(80),
        pulse_rate_bpm: Some(72),
        last_donation_date: None,
        consent_given: true,
        ..DonorAssessmentInput::default()
    }
}

pub(super) fn evaluator() -> EligibilityEvaluator {
    EligibilityEvaluator::default()
}

pub(super) fn strict_evaluator() -> EligibilityEvaluator {
    EligibilityEvaluator::new(EligibilityThresholds {
        missing_values: MissingValuePolicy::FlagIndeterminate,
        ..EligibilityThresholds::standard()
    })
}

pub(super) fn evaluate(input: &DonorAssessmentInput) -> EligibilityVerdict {
    evaluator().evaluate_on(input, today())
}

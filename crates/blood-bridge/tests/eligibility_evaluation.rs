//! End-to-end eligibility scenarios exercised through the public evaluator API.

use blood_bridge::workflows::eligibility::{
    CriterionKind, DonorAssessmentInput, EligibilityEvaluator, EligibilityThresholds, Gender,
    InclusiveRange,
};
use chrono::{Duration, NaiveDate};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 1).expect("valid date")
}

fn reference_donor() -> DonorAssessmentInput {
    DonorAssessmentInput {
        age: Some(30),
        gender: Gender::Male,
        weight_kg: Some(70.0),
        hemoglobin_g_dl: Some(14.0),
        rbc_count_million_per_ul: Some(5.0),
        systolic_bp_mm_hg: Some(120),
        diastolic_bp_mm_hg: Some(80),
        pulse_rate_bpm: Some(72),
        last_donation_date: None,
        ..DonorAssessmentInput::default()
    }
}

#[test]
fn reference_donor_is_eligible_on_all_nine_criteria() {
    let verdict = EligibilityEvaluator::default().evaluate_on(&reference_donor(), today());

    assert!(verdict.overall_eligible);
    assert_eq!(verdict.criteria.len(), 9);
    assert!(verdict.criteria.iter().all(|criterion| criterion.passed));
}

#[test]
fn sixteen_year_old_fails_only_age() {
    let input = DonorAssessmentInput {
        age: Some(16),
        ..reference_donor()
    };

    let verdict = EligibilityEvaluator::default().evaluate_on(&input, today());

    assert!(!verdict.overall_eligible);
    let failures: Vec<_> = verdict.failed_criteria().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].criterion, CriterionKind::Age);
    assert_eq!(failures[0].observed_value_display, "16 years");
}

#[test]
fn injected_thresholds_change_the_outcome() {
    let input = DonorAssessmentInput {
        systolic_bp_mm_hg: Some(110),
        diastolic_bp_mm_hg: Some(65),
        last_donation_date: Some(today() - Duration::days(60)),
        ..reference_donor()
    };

    let standard = EligibilityEvaluator::default().evaluate_on(&input, today());
    let relaxed = EligibilityEvaluator::new(EligibilityThresholds {
        systolic_bp: InclusiveRange::new(100, 180),
        diastolic_bp: InclusiveRange::new(60, 100),
        donation_interval_days: 56,
        ..EligibilityThresholds::standard()
    })
    .evaluate_on(&input, today());

    assert!(!standard.overall_eligible);
    assert!(relaxed.overall_eligible);
}

#[test]
fn evaluator_is_shareable_across_threads() {
    let evaluator = std::sync::Arc::new(EligibilityEvaluator::default());
    let handles: Vec<_> = (18..=24)
        .map(|age| {
            let evaluator = evaluator.clone();
            std::thread::spawn(move || {
                let input = DonorAssessmentInput {
                    age: Some(age),
                    ..reference_donor()
                };
                evaluator.evaluate_on(&input, today()).overall_eligible
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().expect("thread completes"));
    }
}

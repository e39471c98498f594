use super::common::*;
use crate::workflows::eligibility::{
    CriterionKind, CriterionStatus, DonorAssessmentInput, Gender,
};

#[test]
fn healthy_donor_passes_every_criterion() {
    let verdict = evaluate(&healthy_male());

    assert!(verdict.overall_eligible);
    assert_eq!(verdict.criteria.len(), 9);
    assert!(verdict.criteria.iter().all(|result| result.passed));
    assert_eq!(verdict.evaluated_on, today());
    assert_eq!(verdict.summary(), "eligible to donate");
}

#[test]
fn criteria_follow_the_fixed_evaluation_order() {
    let verdict = evaluate(&healthy_male());
    let order: Vec<CriterionKind> = verdict.criteria.iter().map(|r| r.criterion).collect();

    assert_eq!(order, CriterionKind::ALL.to_vec());
}

#[test]
fn underage_donor_fails_only_the_age_check() {
    let input = DonorAssessmentInput {
        age: Some(16),
        ..healthy_male()
    };

    let verdict = evaluate(&input);
    let failed: Vec<CriterionKind> = verdict.failed_criteria().map(|r| r.criterion).collect();

    assert!(!verdict.overall_eligible);
    assert_eq!(failed, vec![CriterionKind::Age]);
    assert_eq!(verdict.criteria.iter().filter(|r| r.passed).count(), 8);
    assert_eq!(verdict.summary(), "not eligible: age");
}

#[test]
fn chronic_condition_does_not_short_circuit_evaluation() {
    let input = DonorAssessmentInput {
        has_chronic_medical_conditions: true,
        ..healthy_male()
    };

    let verdict = evaluate(&input);

    assert!(!verdict.overall_eligible);
    assert_eq!(verdict.criteria.len(), 9);
    for result in &verdict.criteria {
        let expected = result.criterion != CriterionKind::HealthConditions;
        assert_eq!(result.passed, expected, "{}", result.name());
    }
}

#[test]
fn overall_flag_matches_conjunction_of_criteria() {
    let inputs = [
        healthy_male(),
        DonorAssessmentInput::default(),
        DonorAssessmentInput {
            gender: Gender::Female,
            rbc_count_million_per_ul: Some(5.3),
            ..healthy_male()
        },
        DonorAssessmentInput {
            last_donation_date: Some(days_ago(10)),
            recent_illness: true,
            ..healthy_male()
        },
    ];

    for input in &inputs {
        let verdict = evaluate(input);
        let all_passed = verdict.criteria.iter().all(|result| result.passed);
        assert_eq!(verdict.overall_eligible, all_passed);
    }
}

#[test]
fn evaluation_is_deterministic_and_leaves_input_untouched() {
    let input = DonorAssessmentInput {
        last_donation_date: Some(days_ago(45)),
        ..healthy_male()
    };
    let snapshot = input.clone();

    let first = evaluate(&input);
    let second = evaluate(&input);

    assert_eq!(first, second);
    assert_eq!(input, snapshot);
}

#[test]
fn interval_deferral_reports_next_eligible_date() {
    let input = DonorAssessmentInput {
        last_donation_date: Some(days_ago(60)),
        ..healthy_male()
    };

    let verdict = evaluate(&input);

    assert!(!verdict.overall_eligible);
    assert_eq!(verdict.next_eligible_date, Some(days_ago(60) + chrono::Duration::days(90)));
    assert!(verdict.summary().starts_with("deferred until"));
}

#[test]
fn strict_policy_flags_unrecorded_measurements() {
    let input = DonorAssessmentInput {
        hemoglobin_g_dl: None,
        systolic_bp_mm_hg: None,
        ..healthy_male()
    };

    let verdict = strict_evaluator().evaluate_on(&input, today());
    let hemoglobin = verdict
        .criterion(CriterionKind::Hemoglobin)
        .expect("hemoglobin criterion");
    let pressure = verdict
        .criterion(CriterionKind::BloodPressure)
        .expect("pressure criterion");

    assert_eq!(hemoglobin.status, CriterionStatus::Indeterminate);
    assert!(!hemoglobin.passed);
    assert!(hemoglobin.message.contains("not recorded"));
    assert_eq!(pressure.status, CriterionStatus::Indeterminate);
    assert!(verdict.has_indeterminate());
    assert!(!verdict.overall_eligible);
}

#[test]
fn verdict_serializes_with_camel_case_fields() {
    let verdict = evaluate(&healthy_male());
    let json = serde_json::to_value(&verdict).expect("verdict serializes");

    assert_eq!(json["overallEligible"], serde_json::Value::Bool(true));
    assert_eq!(json["criteria"][0]["criterionName"], "age");
    assert_eq!(json["criteria"][0]["observedValueDisplay"], "30 years");
    assert_eq!(json["criteria"][3]["criterionName"], "rbc_count");
    assert!(json.get("nextEligibleDate").is_none());
}

#[test]
fn assessment_input_accepts_wire_field_names() {
    let raw = r#"{
        "age": 30,
        "gender": "Female",
        "weightKg": 61.5,
        "hemoglobinGDl": 13.1,
        "rbcCountMillionPerUL": 4.4,
        "systolicBpMmHg": 124,
        "diastolicBpMmHg": 78,
        "pulseRateBpm": 70,
        "lastDonationDate": "2024-11-02",
        "takingMedications": false
    }"#;

    let input: DonorAssessmentInput = serde_json::from_str(raw).expect("input parses");

    assert_eq!(input.gender, Gender::Female);
    assert_eq!(input.rbc_count_million_per_ul, Some(4.4));
    assert_eq!(input.height_cm, None);
    assert!(!input.recent_surgery);
    assert!(evaluate(&input).overall_eligible);
}

#[test]
fn null_or_missing_gender_reads_as_unknown() {
    for raw in [r#"{ "age": 30, "gender": null }"#, r#"{ "age": 30 }"#] {
        let input: DonorAssessmentInput = serde_json::from_str(raw).expect("input parses");
        assert_eq!(input.gender, Gender::Unknown, "{raw}");
    }

    let input: DonorAssessmentInput =
        serde_json::from_str(r#"{ "gender": "m" }"#).expect("input parses");
    assert_eq!(input.gender, Gender::Male);
}

use chrono::{Duration, NaiveDate};

use super::config::{EligibilityThresholds, MissingValuePolicy};
use super::domain::{CriterionKind, CriterionResult, DonorAssessmentInput};

/// Facts gathered while running the checks that the policy needs later.
pub(crate) struct CriterionSignals {
    pub next_eligible_date: Option<NaiveDate>,
}

pub(crate) fn run_criteria(
    input: &DonorAssessmentInput,
    thresholds: &EligibilityThresholds,
    today: NaiveDate,
) -> (Vec<CriterionResult>, CriterionSignals) {
    let policy = thresholds.missing_values;
    let (interval, next_eligible_date) = check_donation_interval(input, thresholds, today);

    let criteria = vec![
        check_age(input, thresholds, policy),
        check_weight(input, thresholds, policy),
        check_hemoglobin(input, thresholds, policy),
        check_rbc(input, thresholds, policy),
        check_blood_pressure(input, thresholds, policy),
        check_pulse(input, thresholds, policy),
        check_health_conditions(input),
        check_tattoo(input, thresholds),
        interval,
    ];

    (criteria, CriterionSignals { next_eligible_date })
}

/// `None` means the criterion should be reported as indeterminate.
fn observe<T: Default>(value: Option<T>, policy: MissingValuePolicy) -> Option<T> {
    match (value, policy) {
        (Some(value), _) => Some(value),
        (None, MissingValuePolicy::TreatAsZero) => Some(T::default()),
        (None, MissingValuePolicy::FlagIndeterminate) => None,
    }
}

fn not_recorded(kind: CriterionKind, what: &str) -> CriterionResult {
    CriterionResult::indeterminate(kind, format!("{what} was not recorded; assess before donating"))
}

fn check_age(
    input: &DonorAssessmentInput,
    thresholds: &EligibilityThresholds,
    policy: MissingValuePolicy,
) -> CriterionResult {
    let kind = CriterionKind::Age;
    let Some(age) = observe(input.age, policy) else {
        return not_recorded(kind, "age");
    };

    let band = thresholds.age;
    let observed = format!("{age} years");
    if band.contains(age) {
        CriterionResult::pass(
            kind,
            observed,
            format!("age {age} within permitted range {}-{}", band.min, band.max),
        )
    } else {
        CriterionResult::fail(
            kind,
            observed,
            format!("age {age} outside permitted range {}-{}", band.min, band.max),
        )
    }
}

fn check_weight(
    input: &DonorAssessmentInput,
    thresholds: &EligibilityThresholds,
    policy: MissingValuePolicy,
) -> CriterionResult {
    let kind = CriterionKind::Weight;
    let Some(weight) = observe(input.weight_kg, policy) else {
        return not_recorded(kind, "weight");
    };

    let minimum = thresholds.minimum_weight_kg;
    let observed = format!("{weight:.1} kg");
    if weight >= minimum {
        CriterionResult::pass(
            kind,
            observed,
            format!("weight {weight:.1} kg meets minimum {minimum:.1} kg"),
        )
    } else {
        CriterionResult::fail(
            kind,
            observed,
            format!("weight {weight:.1} kg below minimum {minimum:.1} kg"),
        )
    }
}

fn check_hemoglobin(
    input: &DonorAssessmentInput,
    thresholds: &EligibilityThresholds,
    policy: MissingValuePolicy,
) -> CriterionResult {
    let kind = CriterionKind::Hemoglobin;
    let Some(level) = observe(input.hemoglobin_g_dl, policy) else {
        return not_recorded(kind, "hemoglobin");
    };

    let minimum = thresholds.minimum_hemoglobin_g_dl;
    let observed = format!("{level:.1} g/dL");
    if level >= minimum {
        CriterionResult::pass(
            kind,
            observed,
            format!("hemoglobin {level:.1} g/dL meets minimum {minimum:.1} g/dL"),
        )
    } else {
        CriterionResult::fail(
            kind,
            observed,
            format!("hemoglobin {level:.1} g/dL below minimum {minimum:.1} g/dL"),
        )
    }
}

fn check_rbc(
    input: &DonorAssessmentInput,
    thresholds: &EligibilityThresholds,
    policy: MissingValuePolicy,
) -> CriterionResult {
    let kind = CriterionKind::RbcCount;
    let Some(count) = observe(input.rbc_count_million_per_ul, policy) else {
        return not_recorded(kind, "RBC count");
    };

    let band = thresholds.rbc.for_gender(input.gender);
    let observed = format!("{count:.2} million/uL");
    let reference = format!(
        "{:.1}-{:.1} million/uL ({} reference)",
        band.min,
        band.max,
        input.gender.label()
    );
    if band.contains(count) {
        CriterionResult::pass(
            kind,
            observed,
            format!("RBC count {count:.2} within {reference}"),
        )
    } else {
        CriterionResult::fail(
            kind,
            observed,
            format!("RBC count {count:.2} outside {reference}"),
        )
    }
}

fn check_blood_pressure(
    input: &DonorAssessmentInput,
    thresholds: &EligibilityThresholds,
    policy: MissingValuePolicy,
) -> CriterionResult {
    let kind = CriterionKind::BloodPressure;
    let (Some(systolic), Some(diastolic)) = (
        observe(input.systolic_bp_mm_hg, policy),
        observe(input.diastolic_bp_mm_hg, policy),
    ) else {
        return not_recorded(kind, "blood pressure");
    };

    let systolic_band = thresholds.systolic_bp;
    let diastolic_band = thresholds.diastolic_bp;
    let observed = format!("{systolic}/{diastolic} mmHg");

    let mut problems = Vec::new();
    if !systolic_band.contains(systolic) {
        problems.push(format!(
            "systolic {systolic} outside {}-{}",
            systolic_band.min, systolic_band.max
        ));
    }
    if !diastolic_band.contains(diastolic) {
        problems.push(format!(
            "diastolic {diastolic} outside {}-{}",
            diastolic_band.min, diastolic_band.max
        ));
    }

    if problems.is_empty() {
        CriterionResult::pass(
            kind,
            observed,
            format!(
                "blood pressure {systolic}/{diastolic} within {}-{}/{}-{} mmHg",
                systolic_band.min, systolic_band.max, diastolic_band.min, diastolic_band.max
            ),
        )
    } else {
        CriterionResult::fail(kind, observed, problems.join("; "))
    }
}

fn check_pulse(
    input: &DonorAssessmentInput,
    thresholds: &EligibilityThresholds,
    policy: MissingValuePolicy,
) -> CriterionResult {
    let kind = CriterionKind::PulseRate;
    let Some(pulse) = observe(input.pulse_rate_bpm, policy) else {
        return not_recorded(kind, "pulse rate");
    };

    let band = thresholds.pulse_bpm;
    let observed = format!("{pulse} bpm");
    if band.contains(pulse) {
        CriterionResult::pass(
            kind,
            observed,
            format!("pulse {pulse} bpm within {}-{} bpm", band.min, band.max),
        )
    } else {
        CriterionResult::fail(
            kind,
            observed,
            format!("pulse {pulse} bpm outside {}-{} bpm", band.min, band.max),
        )
    }
}

fn check_health_conditions(input: &DonorAssessmentInput) -> CriterionResult {
    let kind = CriterionKind::HealthConditions;
    let reported: Vec<&str> = [
        (input.has_chronic_medical_conditions, "chronic medical condition"),
        (input.taking_medications, "current medication"),
        (input.recent_illness, "recent illness"),
        (input.recent_surgery, "recent surgery"),
    ]
    .into_iter()
    .filter_map(|(flag, label)| flag.then_some(label))
    .collect();

    if reported.is_empty() {
        CriterionResult::pass(kind, "none reported", "no disqualifying health conditions")
    } else {
        let observed = reported.join(", ");
        let message = format!("reported {observed}; medical review required");
        CriterionResult::fail(kind, observed, message)
    }
}

fn check_tattoo(
    input: &DonorAssessmentInput,
    thresholds: &EligibilityThresholds,
) -> CriterionResult {
    let kind = CriterionKind::TattooPiercing;
    let window = thresholds.tattoo_lookback_days;
    if input.has_recent_tattoo_or_piercing {
        CriterionResult::fail(
            kind,
            "yes",
            format!("tattoo or piercing within the last {window} days"),
        )
    } else {
        CriterionResult::pass(
            kind,
            "no",
            format!("no tattoo or piercing within the last {window} days"),
        )
    }
}

fn check_donation_interval(
    input: &DonorAssessmentInput,
    thresholds: &EligibilityThresholds,
    today: NaiveDate,
) -> (CriterionResult, Option<NaiveDate>) {
    let kind = CriterionKind::DonationInterval;
    let Some(last) = input.last_donation_date else {
        return (
            CriterionResult::pass(kind, "never donated", "first-time donor"),
            None,
        );
    };

    let required = i64::from(thresholds.donation_interval_days);
    // NaiveDate subtraction counts whole calendar days.
    let days_since = (today - last).num_days();
    let observed = format!("{last} ({days_since} days ago)");

    if days_since >= required {
        let result = CriterionResult::pass(
            kind,
            observed,
            format!("{days_since} days since last donation (minimum {required})"),
        );
        (result, None)
    } else {
        // Dates near the end of the calendar have no representable successor.
        let next = last.checked_add_signed(Duration::days(required));
        let message = match next {
            Some(next) => {
                format!("only {days_since} days since last donation; eligible again on {next}")
            }
            None => format!("only {days_since} days since last donation (minimum {required})"),
        };
        (CriterionResult::fail(kind, observed, message), next)
    }
}

//! Blood-donation eligibility screening.
//!
//! The evaluator runs every gating criterion against a donor's measurements
//! and declarations and reduces the checklist to a single eligibility flag.
//! It is pure: no I/O, no shared state, safe to call from any thread.

mod config;
mod domain;
mod policy;
mod rules;

#[cfg(test)]
mod tests;

pub use config::{
    EligibilityThresholds, InclusiveRange, MissingValuePolicy, RbcBands, ThresholdError,
    MAX_WINDOW_DAYS,
};
pub use domain::{
    CriterionKind, CriterionResult, CriterionStatus, DonorAssessmentInput, EligibilityVerdict,
    Gender,
};

use chrono::{Local, NaiveDate};
use policy::decide_verdict;

/// Stateless evaluator that applies a threshold set to donor assessments.
#[derive(Debug, Clone, Default)]
pub struct EligibilityEvaluator {
    thresholds: EligibilityThresholds,
}

impl EligibilityEvaluator {
    pub fn new(thresholds: EligibilityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &EligibilityThresholds {
        &self.thresholds
    }

    /// Evaluate against the local calendar date.
    pub fn evaluate(&self, input: &DonorAssessmentInput) -> EligibilityVerdict {
        self.evaluate_on(input, Local::now().date_naive())
    }

    pub fn evaluate_on(&self, input: &DonorAssessmentInput, today: NaiveDate) -> EligibilityVerdict {
        let (criteria, signals) = rules::run_criteria(input, &self.thresholds, today);
        decide_verdict(criteria, signals, today)
    }
}

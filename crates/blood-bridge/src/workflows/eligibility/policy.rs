use chrono::NaiveDate;

use super::domain::{CriterionResult, EligibilityVerdict};
use super::rules::CriterionSignals;

/// Folds the per-criterion checklist into a verdict.
///
/// Every result counts toward the overall flag; indeterminate results carry
/// `passed = false` so a donor with missing measurements is never cleared.
pub(crate) fn decide_verdict(
    criteria: Vec<CriterionResult>,
    signals: CriterionSignals,
    today: NaiveDate,
) -> EligibilityVerdict {
    let overall_eligible = criteria.iter().all(|result| result.passed);

    EligibilityVerdict {
        overall_eligible,
        criteria,
        evaluated_on: today,
        next_eligible_date: signals.next_eligible_date,
    }
}
